use thiserror::Error;

/// Failures at the backend payload boundary. The engine itself has no
/// error paths; malformed JSON is the only thing that can go wrong before
/// a snapshot exists.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("malformed group payload: {0}")]
    Malformed(#[from] serde_json::Error),
}
