use eyre::Report;

pub use super::record::ReplyStateError;

#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    #[error(transparent)]
    InvalidState(#[from] ReplyStateError),
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
    #[error(transparent)]
    Report(#[from] Report),
}
