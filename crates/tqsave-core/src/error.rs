use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not a character file: expected marker byte {expected:#04x}, found {}", found_byte(.found))]
    InvalidFormat { expected: u8, found: Option<u8> },

    #[error("Read of {wanted} bytes at offset {position} exceeds buffer length {len}")]
    OutOfRange {
        position: usize,
        wanted: usize,
        len: usize,
    },

    #[error("Unknown key {key:?} at offset {position}")]
    UnknownKey { key: String, position: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True when the input is not a character file at all.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::InvalidFormat { .. })
    }

    /// True when decoding ran off the end of the buffer (truncated or corrupt file).
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }

    /// Buffer offset the error refers to, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::InvalidFormat { .. } => Some(0),
            Self::OutOfRange { position, .. } | Self::UnknownKey { position, .. } => {
                Some(*position)
            }
            Self::Io(_) | Self::Json(_) => None,
        }
    }
}

fn found_byte(found: &Option<u8>) -> String {
    match found {
        Some(b) => format!("{:#04x}", b),
        None => "end of input".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
