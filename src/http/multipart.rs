//! multipart/form-data bodies for pinning-service uploads
//!
//! Each file part is named `file` and stored under `root/` so the service
//! wraps the upload in a directory.

use super::mime::{is_content_printable, mime_type_for_filename};

/// Path prefix applied to every uploaded file name
pub const IPFS_PATH_PREFIX: &str = "root/";

/// Generate a fresh random boundary
pub fn generate_boundary() -> String {
    let nonce: [u8; 16] = rand::random();
    format!("--------{}", hex::encode(nonce))
}

/// Request headers for a multipart upload authenticated with a bearer token
pub fn build_headers(boundary: &str, bearer_token: &str) -> Vec<(&'static str, String)> {
    vec![
        ("Accept", "application/json".to_string()),
        ("Authorization", format!("Bearer {}", bearer_token)),
        (
            "Content-Type",
            format!("multipart/form-data; boundary={}", boundary),
        ),
    ]
}

/// Incrementally built multipart body
#[derive(Debug)]
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
    /// Log each part at debug level
    debug: bool,
}

impl MultipartForm {
    /// Start a form with a random boundary
    pub fn new() -> Self {
        Self::with_boundary(generate_boundary())
    }

    /// Start a form with a caller-chosen boundary
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            body: Vec::new(),
            debug: false,
        }
    }

    /// Enable part logging
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Append a file part
    pub fn add_file(&mut self, filename: &str, content: &[u8]) -> &mut Self {
        let filename = filename.trim();
        let mime_type = mime_type_for_filename(filename);
        let entry = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}{}\"\r\nContent-Type: {}\r\n\r\n",
            self.boundary,
            IPFS_PATH_PREFIX,
            escape_filename(filename),
            mime_type
        );

        if self.debug {
            if is_content_printable(Some(mime_type)) {
                log::debug!("{}{}", entry, String::from_utf8_lossy(content));
            } else {
                log::debug!("{}[{} byte(s)]", entry, content.len());
            }
        }

        self.body.extend_from_slice(entry.as_bytes());
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Close the form and return the body
    pub fn finish(mut self) -> Vec<u8> {
        let end = format!("--{}--", self.boundary);
        if self.debug {
            log::debug!("{}", end);
        }
        self.body.extend_from_slice(end.as_bytes());
        self.body
    }
}

/// Percent-encode the characters that would end the quoted filename or
/// the header line
fn escape_filename(filename: &str) -> String {
    filename
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}
