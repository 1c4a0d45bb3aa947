pub mod http;
pub mod transport;

#[cfg(test)]
pub(crate) mod fake;

pub use http::HttpTransport;
pub use transport::{Method, Transport};
