// shelfy-api: Async Rust client for the shelfy book-collection REST API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::ShelfClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
