//! Projections over decoded character files.

mod player;

pub use player::*;
