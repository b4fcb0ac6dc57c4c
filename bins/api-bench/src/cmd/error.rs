#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Serve(#[from] echo_server::ServeError),

    #[error("{0}")]
    Bench(#[from] bench_runner::BenchError),

    #[error("transport: {0}")]
    Transport(#[from] bench_runner::TransportError),

    #[error("payload probe: {0}")]
    Format(#[from] echo_api::FormatError),
}
