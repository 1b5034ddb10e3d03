//! Translation and dispatch of one exchange.
//!
//! # Responsibilities
//! - Decode the client's request description
//! - Resolve the target URL (configured host/scheme override)
//! - Replay the call against the origin, exactly once
//! - Shape the origin response and record the exchange in the ledger
//!
//! # Design Decisions
//! - One shared reqwest client, reused across all concurrent exchanges
//! - No explicit timeout and no retry on the outbound call; a transport
//!   failure is terminal for the exchange
//! - Response bodies are read fully into memory (no streaming)

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use std::collections::HashMap;
use url::Url;
use uuid::Uuid;

use crate::config::UpstreamConfig;
use crate::forward::error::{ForwardError, ForwardResult};
use crate::forward::types::{ProxyRequest, ProxyResponse};
use crate::store::ExchangeStore;

/// Translates inbound request descriptions into outbound HTTP calls.
#[derive(Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    upstream: UpstreamConfig,
    store: ExchangeStore,
}

impl Forwarder {
    /// Create a forwarder with the given upstream override and ledger.
    pub fn new(upstream: UpstreamConfig, store: ExchangeStore) -> Self {
        Self {
            client: reqwest::Client::new(),
            upstream,
            store,
        }
    }

    /// Decode a raw payload and forward the described call.
    pub async fn forward_raw(&self, payload: &[u8]) -> ForwardResult<ProxyResponse> {
        let request: ProxyRequest =
            serde_json::from_slice(payload).map_err(ForwardError::MalformedPayload)?;
        self.forward(request).await
    }

    /// Replay one described call against the origin.
    ///
    /// On success the exchange is recorded in the ledger under the minted
    /// identifier before the response is returned.
    pub async fn forward(&self, request: ProxyRequest) -> ForwardResult<ProxyResponse> {
        let url = self.resolve_url(&request.url)?;
        let method = parse_method(&request.method)?;
        let headers = build_headers(&request.headers)?;

        tracing::debug!(
            method = %method,
            url = %url,
            header_count = headers.len(),
            "Forwarding request to origin"
        );

        let mut builder = self.client.request(method, url).headers(headers);
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder.send().await.map_err(ForwardError::Upstream)?;

        let status = response.status().as_u16();
        let headers = flatten_headers(response.headers());
        let bytes = response.bytes().await.map_err(ForwardError::ResponseRead)?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        let id = Uuid::new_v4().to_string();
        let shaped = ProxyResponse {
            id: id.clone(),
            status,
            headers,
            length: body.len(),
            body,
        };

        self.store.put(id, request, shaped.clone());

        tracing::debug!(
            exchange_id = %shaped.id,
            status = shaped.status,
            length = shaped.length,
            "Exchange recorded"
        );

        Ok(shaped)
    }

    /// Parse the target URL and apply the configured host/scheme override.
    ///
    /// When neither override is set the description's own URL is used
    /// unmodified. A host override of the form "host:port" rewrites the
    /// port as well; a bare host resets the port to the scheme default.
    fn resolve_url(&self, raw: &str) -> ForwardResult<Url> {
        let mut url = Url::parse(raw)
            .map_err(|e| ForwardError::BuildRequest(format!("invalid url {raw:?}: {e}")))?;

        if let Some(scheme) = &self.upstream.override_scheme {
            url.set_scheme(scheme).map_err(|_| {
                ForwardError::BuildRequest(format!("cannot apply scheme override {scheme:?}"))
            })?;
        }

        if let Some(target) = &self.upstream.override_host {
            let (host, port) = split_host_port(target);
            url.set_host(Some(host)).map_err(|e| {
                ForwardError::BuildRequest(format!("cannot apply host override {target:?}: {e}"))
            })?;
            url.set_port(port).map_err(|_| {
                ForwardError::BuildRequest(format!("cannot apply port from override {target:?}"))
            })?;
        }

        Ok(url)
    }
}

/// Parse the client-supplied verb. Any valid token passes through; an empty
/// string means GET.
fn parse_method(method: &str) -> ForwardResult<Method> {
    if method.is_empty() {
        return Ok(Method::GET);
    }
    Method::from_bytes(method.as_bytes())
        .map_err(|_| ForwardError::BuildRequest(format!("invalid method {method:?}")))
}

/// Copy client-supplied headers onto an outbound header map. A header
/// literally named "Content-Type" is applied last so generic copy order
/// cannot override it.
fn build_headers(source: &HashMap<String, String>) -> ForwardResult<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(source.len());
    for (name, value) in source {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ForwardError::BuildRequest(format!("invalid header name {name:?}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| ForwardError::BuildRequest(format!("invalid value for header {name:?}")))?;
        headers.insert(header_name, header_value);
    }
    if let Some(content_type) = source.get("Content-Type") {
        let value = HeaderValue::from_str(content_type).map_err(|_| {
            ForwardError::BuildRequest("invalid value for header \"Content-Type\"".into())
        })?;
        headers.insert(CONTENT_TYPE, value);
    }
    Ok(headers)
}

/// Flatten origin headers to one string per name, joining multi-value
/// headers with ", ".
fn flatten_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut flat = HashMap::with_capacity(headers.keys_len());
    for name in headers.keys() {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        flat.insert(name.as_str().to_string(), joined);
    }
    flat
}

/// Split an override target into host and optional port.
fn split_host_port(target: &str) -> (&str, Option<u16>) {
    match target.rsplit_once(':') {
        Some((host, port)) => match port.parse::<u16>() {
            Ok(port) => (host, Some(port)),
            Err(_) => (target, None),
        },
        None => (target, None),
    }
}
