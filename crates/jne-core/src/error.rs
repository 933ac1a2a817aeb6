use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditError {
    /// Malformed JSON text, either a whole document or a draft value.
    #[error("{0}")]
    Parse(String),

    #[error("cannot descend into {path}: not a container")]
    NotAContainer { path: String },

    #[error("invalid JSON pointer {0:?}: must be empty or start with '/'")]
    InvalidPointer(String),

    #[error("index {index} at {path} is too far past the end of the array")]
    IndexOutOfRange { path: String, index: usize },

    #[error("session is not editing")]
    NotEditing,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for EditError {
    fn from(e: serde_json::Error) -> Self {
        EditError::Parse(e.to_string())
    }
}
