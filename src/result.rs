// Outcome of a single remote call or cache lookup
use crate::xml::XmlElement;

// A failed result always carries non-empty error text
#[derive(Debug, Clone, Default)]
pub struct WebCallResult {
    pub success: bool,
    pub error_text: String,
    pub payload: Option<XmlElement>,
    pub status_code: u16,
    pub url: String,
    pub response_text: String,
    // `total` attribute, else the child count
    pub total_object_count: usize,
}

impl WebCallResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn failure(error_text: impl Into<String>) -> Self {
        let mut error_text = error_text.into();
        if error_text.is_empty() {
            error_text = "Unspecified failure".to_string();
        }

        Self {
            success: false,
            error_text,
            ..Self::default()
        }
    }

    pub fn with_payload(url: impl Into<String>, status_code: u16, root: XmlElement) -> Self {
        let total_object_count = root
            .attribute("total")
            .and_then(|t| t.trim().parse().ok())
            .unwrap_or(root.children.len());

        Self {
            success: true,
            payload: Some(root),
            status_code,
            url: url.into(),
            total_object_count,
            ..Self::default()
        }
    }

    pub fn at_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn with_response_text(mut self, response_text: impl Into<String>) -> Self {
        self.response_text = response_text.into();
        self
    }
}

impl std::fmt::Display for WebCallResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.success {
            write!(f, "Success [{}] {}", self.status_code, self.url)
        } else {
            write!(
                f,
                "Failure [{}] {}: {}",
                self.status_code, self.url, self.error_text
            )
        }
    }
}
