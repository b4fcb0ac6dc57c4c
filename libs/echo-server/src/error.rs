use std::net::SocketAddr;

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: std::io::Error },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("grpc incoming: {0}")]
    Incoming(String),

    #[error("grpc: {0}")]
    Grpc(#[from] tonic::transport::Error),
}
