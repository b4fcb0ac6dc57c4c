use std::time::Duration;

/// Ошибка одного вызова через транспорт.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("grpc status: {0}")]
    Status(#[from] tonic::Status),

    #[error("grpc transport: {0}")]
    Grpc(#[from] tonic::transport::Error),

    #[error("{0}")]
    Format(#[from] echo_api::FormatError),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("{transport} call failed: {source}")]
    CallFailed {
        transport: String,
        source: TransportError,
    },

    #[error("{transport} not ready after {waited:?}: {source}")]
    NotReady {
        transport: String,
        waited: Duration,
        source: TransportError,
    },

    #[error("worker: {0}")]
    Join(#[from] tokio::task::JoinError),
}
