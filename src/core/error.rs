use thiserror::Error;

/// Failure at the remote call boundary. Domain rejections (insufficient
/// credits, AI-side errors) are data in `SendOutcome`, not errors; the
/// controller recovers every `RpcError` locally and reports it through the
/// notifier, so nothing above this boundary returns `Result`.
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backend error: {0}")]
    Backend(String),
}
