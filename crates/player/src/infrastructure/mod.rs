//! Infrastructure adapters - Concrete implementations of the outbound ports

pub mod clock;
pub mod http_client;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use clock::{FixedClock, SystemClock};
pub use http_client::ApiAdapter;
