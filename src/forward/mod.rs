//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Raw JSON payload
//!     → types.rs (decode request description)
//!     → forwarder.rs (resolve URL, build outbound call, dispatch)
//!     → origin response (read fully, flatten headers)
//!     → store (record exchange under minted id)
//!     → shaped response back to the HTTP boundary
//! ```

pub mod error;
pub mod forwarder;
pub mod types;

pub use error::{ForwardError, ForwardResult};
pub use forwarder::Forwarder;
pub use types::{Exchange, ProxyRequest, ProxyResponse};
