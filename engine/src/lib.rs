pub mod credentials;
pub mod error;
pub mod fusion_api;
pub mod generator;
pub mod job;
pub mod materialize;
pub mod poll;
pub mod submit;
pub mod transport;

#[cfg(test)]
mod testing;

pub use credentials::Credentials;
pub use generator::Generator;
pub use materialize::{FileSink, Materialized, Sink};
pub use poll::PollPolicy;
pub use transport::{HttpTransport, Transport};

