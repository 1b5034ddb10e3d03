//! JSON-described HTTP forwarding proxy.
//!
//! Accepts a JSON description of an HTTP call on `POST /proxy`, replays it
//! against the named origin, and returns the origin's response as JSON
//! tagged with a minted exchange identifier.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │               FORWARDING PROXY                │
//!                      │                                               │
//!  POST /proxy (JSON)  │  ┌────────┐    ┌─────────┐    ┌───────────┐  │
//!  ────────────────────┼─▶│  http  │───▶│ forward │───▶│  outbound │──┼──▶ Origin
//!                      │  │ server │    │ (types, │    │  client   │  │
//!                      │  └────────┘    │ dispatch)│   └─────┬─────┘  │
//!                      │                └────┬─────┘         │        │
//!                      │                     │               │        │
//!                      │                     ▼               ▼        │
//!  JSON response       │  ┌────────┐    ┌─────────┐    ┌───────────┐  │
//!  ◀───────────────────┼──│response│◀───│ exchange│◀───│  response │◀─┼─── Origin
//!                      │  │ shaping│    │  store  │    │   read    │  │
//!                      │  └────────┘    └─────────┘    └───────────┘  │
//!                      │                                               │
//!                      │  ┌─────────────────────────────────────────┐ │
//!                      │  │          Cross-Cutting Concerns          │ │
//!                      │  │  ┌────────┐ ┌────────────┐ ┌──────────┐ │ │
//!                      │  │  │ config │ │observability│ │lifecycle │ │ │
//!                      │  │  └────────┘ └────────────┘ └──────────┘ │ │
//!                      │  └─────────────────────────────────────────┘ │
//!                      └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod forward;
pub mod http;
pub mod store;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ProxyConfig;
pub use forward::{Forwarder, ProxyRequest, ProxyResponse};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::ExchangeStore;
