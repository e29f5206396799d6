use thiserror::Error;

/// Failure raised by a caller-supplied option/cell renderer.
///
/// List and table renderers catch this per row and substitute fallback content;
/// one bad row never blanks the whole list.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("renderer failed: {message}")]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
