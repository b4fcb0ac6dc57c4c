#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("protobuf decode: {0}")]
    Protobuf(#[from] prost::DecodeError),
}
