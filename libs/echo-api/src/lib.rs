pub mod error;
pub mod format;
pub mod probe;
pub mod proto;
pub mod record;
pub mod rpc;

pub use error::FormatError;
pub use format::{JsonFormat, ProtobufFormat, WireFormat};
pub use probe::{probe, PayloadSize};
pub use record::Record;
