//! Wire types for the forwarding contract.
//!
//! This module defines the JSON shapes exchanged with clients.
//! All types derive Serde traits for (de)serialization at the boundary.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A client's description of the HTTP call to replay.
///
/// The verb is passed through verbatim; it is not validated against a known
/// set here. An empty `body` means no outbound body is sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyRequest {
    /// HTTP verb for the outbound call (e.g. "GET", "POST").
    pub method: String,

    /// Absolute target URL. Host and scheme may be rewritten by the
    /// configured upstream override before dispatch.
    pub url: String,

    /// Headers to copy onto the outbound call, one value per name.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Outbound body. Optional on the wire; empty means no body.
    #[serde(default)]
    pub body: String,
}

/// The origin's response, shaped for the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyResponse {
    /// Identifier minted for this exchange (UUID v4).
    pub id: String,

    /// Origin HTTP status code.
    pub status: u16,

    /// Origin headers, multi-value names joined with ", ".
    pub headers: HashMap<String, String>,

    /// Byte length of `body`.
    pub length: usize,

    /// Raw response body as received.
    pub body: String,
}

/// One completed request/response pair, as recorded in the exchange ledger.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub request: ProxyRequest,
    pub response: ProxyResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_deserializes_without_body() {
        let raw = r#"{"method":"GET","url":"http://example.com","headers":{"Accept":"*/*"}}"#;
        let req: ProxyRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(req.method, "GET");
        assert_eq!(req.url, "http://example.com");
        assert_eq!(req.headers.get("Accept").map(String::as_str), Some("*/*"));
        assert!(req.body.is_empty());
    }

    #[test]
    fn request_deserializes_without_headers() {
        let raw = r#"{"method":"DELETE","url":"http://example.com/item/1"}"#;
        let req: ProxyRequest = serde_json::from_str(raw).unwrap();
        assert!(req.headers.is_empty());
    }

    #[test]
    fn response_serializes_all_fields() {
        let resp = ProxyResponse {
            id: "abc".into(),
            status: 200,
            headers: HashMap::new(),
            length: 2,
            body: "ok".into(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["status"], 200);
        assert_eq!(json["length"], 2);
        assert_eq!(json["body"], "ok");
    }
}
