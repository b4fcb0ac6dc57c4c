pub mod error;
pub mod grpc;
pub mod rest;
mod services;

pub use error::ServeError;
pub use services::EchoServices;
