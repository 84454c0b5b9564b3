// HTTP transport and the server handle the caches fetch through
use crate::config::ServerConfig;
use crate::error::ClientError;
use crate::result::WebCallResult;
use crate::xml::{error_details_message, XmlElement};
use reqwest::header::ACCEPT;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> WebCallResult;
}

// Shared by every transport so canned and live bodies go through the same checks
pub fn interpret_response(url: &str, status_code: u16, body: &str) -> WebCallResult {
    let is_success = (200..300).contains(&status_code);
    let parsed = if body.trim().is_empty() {
        None
    } else {
        Some(XmlElement::parse(body))
    };

    match (is_success, parsed) {
        (true, Some(Ok(root))) => {
            WebCallResult::with_payload(url, status_code, root).with_response_text(body)
        }
        (true, Some(Err(e))) => WebCallResult::failure(format!("Invalid XML in response: {}", e))
            .at_url(url)
            .with_status(status_code)
            .with_response_text(body),
        // An empty 2xx body is still a completed call; shape checks belong to the caller
        (true, None) => WebCallResult::ok().at_url(url).with_status(status_code),
        (false, parsed) => {
            let detail = parsed
                .and_then(|p| p.ok())
                .and_then(|root| error_details_message(&root));
            let message = match detail {
                Some(detail) => format!("HTTP {}: {}", status_code, detail),
                None => format!("HTTP {}", status_code),
            };
            WebCallResult::failure(message)
                .at_url(url)
                .with_status(status_code)
                .with_response_text(body)
        }
    }
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
    login_name: String,
    password: String,
}

impl HttpTransport {
    pub fn new(config: &ServerConfig) -> Result<Self, ClientError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self {
            client,
            login_name: config.login_name.clone(),
            password: config.password.clone(),
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> WebCallResult {
        let response = self
            .client
            .get(url)
            .basic_auth(&self.login_name, Some(&self.password))
            .header(ACCEPT, "application/xml")
            .send();

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!("GET {} failed: {}", url, e);
                let message = if e.is_timeout() {
                    format!("Request timeout: {}", e)
                } else {
                    format!("Network error: {}", e)
                };
                return WebCallResult::failure(message).at_url(url);
            }
        };

        let status_code = response.status().as_u16();
        match response.text() {
            Ok(body) => interpret_response(url, status_code, &body),
            Err(e) => WebCallResult::failure(format!("Failed reading response body: {}", e))
                .at_url(url)
                .with_status(status_code),
        }
    }
}

#[derive(Debug, Clone)]
enum CannedResponse {
    Body { status_code: u16, body: String },
    Failure(String),
}

// Canned bodies matched by path suffix, for offline use
#[derive(Debug, Default)]
pub struct StaticTransport {
    responses: HashMap<String, CannedResponse>,
    calls: AtomicUsize,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, path: &str, body: &str) -> Self {
        self.responses.insert(
            path.to_string(),
            CannedResponse::Body {
                status_code: 200,
                body: body.to_string(),
            },
        );
        self
    }

    pub fn with_status(mut self, path: &str, status_code: u16, body: &str) -> Self {
        self.responses.insert(
            path.to_string(),
            CannedResponse::Body {
                status_code,
                body: body.to_string(),
            },
        );
        self
    }

    pub fn with_failure(mut self, path: &str, message: &str) -> Self {
        self.responses
            .insert(path.to_string(), CannedResponse::Failure(message.to_string()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for StaticTransport {
    fn get(&self, url: &str) -> WebCallResult {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let canned = self
            .responses
            .iter()
            .filter(|(path, _)| url.ends_with(path.as_str()))
            .max_by_key(|(path, _)| path.len())
            .map(|(_, response)| response);

        match canned {
            Some(CannedResponse::Body { status_code, body }) => {
                interpret_response(url, *status_code, body)
            }
            Some(CannedResponse::Failure(message)) => {
                WebCallResult::failure(message.clone()).at_url(url)
            }
            None => interpret_response(url, 404, ""),
        }
    }
}

#[derive(Clone)]
pub struct ConnectionServer {
    config: ServerConfig,
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl ConnectionServer {
    pub fn new(config: ServerConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    // Config is not validated here; see is_valid
    pub fn with_transport(config: ServerConfig, transport: Arc<dyn Transport>) -> Self {
        let base_url = config.base_url();
        Self {
            config,
            base_url,
            transport,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.config.server_name.trim().is_empty()
    }

    pub fn server_name(&self) -> &str {
        &self.config.server_name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn get(&self, path: &str) -> WebCallResult {
        let url = self.url_for(path);
        debug!("GET {}", url);
        self.transport.get(&url)
    }
}

impl std::fmt::Debug for ConnectionServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionServer")
            .field("server_name", &self.config.server_name)
            .field("login_name", &self.config.login_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}
