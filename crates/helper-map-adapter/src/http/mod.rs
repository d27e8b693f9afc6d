/*
[INPUT]:  HTTP client configuration and marketplace endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod location;
pub mod tasks;

pub use error::{HelperError, Result};

pub use client::{AcceptAck, ClientConfig, HelperClient};
