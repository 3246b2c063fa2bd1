//! HTTP plumbing shared by the gateway and pinning-service calls
//!
//! Single-shot GET/POST helpers over `reqwest`, the response type handed
//! back to callers, and the helpers for building upload bodies.

pub mod mime;
pub mod multipart;

pub use mime::{is_content_printable, mime_type_for_extension, mime_type_for_filename};
pub use multipart::MultipartForm;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Response data for a completed HTTP request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers, names lowercased
    pub headers: BTreeMap<String, String>,
    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// True for 2xx status codes.
    ///
    /// Only says the transfer succeeded; the body may still carry an
    /// application-level error.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Body decoded as UTF-8, invalid sequences replaced
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    async fn from_reqwest(response: reqwest::Response) -> Result<Self, reqwest::Error> {
        let status = response.status().as_u16();

        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in response.headers() {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
        }

        let body = response.bytes().await?.to_vec();

        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Dump status, headers and body at debug level
    fn log_details(&self, id: u64) {
        log::debug!("[{}] Response received. HTTP status code: {}", id, self.status);
        log::debug!("[{}] Headers:", id);
        for (name, value) in &self.headers {
            log::debug!("[{}] {}: {}", id, name, value);
        }
        if is_content_printable(self.content_type()) {
            log::debug!("[{}] Body:", id);
            log::debug!("[{}] {}", id, self.text_lossy());
        } else {
            log::debug!("[{}] Body: {} byte(s)", id, self.body.len());
        }
    }
}

/// Source of request correlation ids used to tag log lines
#[derive(Debug)]
pub struct CorrelationIds {
    next: AtomicU64,
}

impl CorrelationIds {
    /// First id handed out
    pub const FIRST: u64 = 1001;

    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(Self::FIRST),
        }
    }

    /// Take the next id
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for CorrelationIds {
    fn default() -> Self {
        Self::new()
    }
}

/// Send a GET request
pub async fn send_get(
    client: &reqwest::Client,
    url: &str,
    id: u64,
    debug: bool,
) -> Result<HttpResponse, reqwest::Error> {
    if debug {
        log::debug!("[{}] Sending HTTP GET request to URL: {}", id, url);
    }

    let response = client.get(url).send().await.map_err(|e| {
        if debug {
            log::error!("[{}] {}", id, e);
        }
        e
    })?;
    let response = HttpResponse::from_reqwest(response).await?;

    if debug {
        response.log_details(id);
    }
    Ok(response)
}

/// Send a POST request with the given headers and body
pub async fn send_post(
    client: &reqwest::Client,
    url: &str,
    headers: &[(&str, String)],
    body: Vec<u8>,
    id: u64,
    debug: bool,
) -> Result<HttpResponse, reqwest::Error> {
    if debug {
        log::debug!("[{}] Sending HTTP POST request to URL: {}", id, url);
    }

    let mut request = client.post(url).body(body);
    for (name, value) in headers {
        request = request.header(*name, value.as_str());
    }

    let response = request.send().await.map_err(|e| {
        if debug {
            log::error!("[{}] {}", id, e);
        }
        e
    })?;
    let response = HttpResponse::from_reqwest(response).await?;

    if debug {
        response.log_details(id);
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, content_type: &str, body: &[u8]) -> HttpResponse {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), content_type.to_string());
        HttpResponse {
            status,
            headers,
            body: body.to_vec(),
        }
    }

    #[test]
    fn test_success_range() {
        assert!(response(200, "text/plain", b"").is_success());
        assert!(response(299, "text/plain", b"").is_success());
        assert!(!response(199, "text/plain", b"").is_success());
        assert!(!response(404, "text/plain", b"").is_success());
        assert!(!HttpResponse::default().is_success());
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let resp = response(200, "application/json", b"{}");
        assert_eq!(resp.header("Content-Type"), Some("application/json"));
        assert_eq!(resp.content_type(), Some("application/json"));
        assert_eq!(resp.header("etag"), None);
    }

    #[test]
    fn test_text_lossy() {
        let resp = response(200, "text/plain", &[b'h', b'i', 0xFF]);
        assert_eq!(resp.text_lossy(), "hi\u{FFFD}");
    }

    #[test]
    fn test_correlation_ids_increase() {
        let ids = CorrelationIds::new();
        assert_eq!(ids.next_id(), CorrelationIds::FIRST);
        assert_eq!(ids.next_id(), CorrelationIds::FIRST + 1);
    }
}
