pub mod connection;
pub mod endpoints;

pub use connection::{ApiClient, ApiConnectionError};
