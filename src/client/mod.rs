//! Request layer for the catalog API
//!
//! This module contains the transport and resilience policy, with no
//! knowledge of catalog semantics:
//! - A shared rate gate spacing every outbound request
//! - A retrying GET client with exponential backoff

mod fetcher;
mod gate;

pub use fetcher::{build_http_client, RequestClient, RetryPolicy};
pub use gate::RateGate;
