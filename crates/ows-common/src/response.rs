//! Raw capabilities response as returned by the fetch step.

/// Fetched body plus where it actually came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCapabilitiesResponse {
    /// Final URL after redirects.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Declared Content-Type header, if any.
    pub content_type: Option<String>,
    pub body: String,
}

impl RawCapabilitiesResponse {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: 200,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }

    /// Whether the declared content type mentions the expected family
    /// (e.g. "xml" matches `application/vnd.ogc.wms_xml`).
    pub fn content_type_matches(&self, expected: &str) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains(&expected.to_ascii_lowercase()))
            .unwrap_or(false)
    }
}
