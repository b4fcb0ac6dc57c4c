pub mod error;
pub mod policy;
pub mod report;
pub mod transport;
mod concurrent;
mod ready;
mod sequential;

pub use concurrent::run_concurrent;
pub use error::{BenchError, TransportError};
pub use policy::FailurePolicy;
pub use ready::wait_ready;
pub use report::{Mode, Report};
pub use sequential::run_sequential;
pub use transport::{Exchange, GrpcTransport, RestTransport, Transport};
