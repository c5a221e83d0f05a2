//! Outbound ports - Interfaces for external services
//!
//! Application services talk to the theatre backend and the wall clock only
//! through these traits, so tests can swap in mocks or scripted doubles.

pub mod api_error;
pub mod clock_port;
pub mod raw_api_port;

pub use api_error::ApiError;
pub use clock_port::ClockPort;
pub use raw_api_port::{RawApiPort, UploadForm};

#[cfg(any(test, feature = "testing"))]
pub use clock_port::MockClockPort;
#[cfg(any(test, feature = "testing"))]
pub use raw_api_port::MockRawApiPort;
