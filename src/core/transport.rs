use crate::core::normalizer::{self, Payload, ResponseMode};
use crate::core::request::{RequestBody, RequestDescriptor, ResponseType};
use crate::core::retry::RetryPolicy;
use crate::domain::model::Blob;
use crate::domain::ports::{ConfigProvider, Transport};
use crate::utils::error::{ClientError, Result};
use async_trait::async_trait;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// reqwest-backed transport: base URL, per-attempt timeout, retry, and response normalization.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    timeout: Duration,
    retry: RetryPolicy,
    mode: ResponseMode,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, mode: ResponseMode) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            mode,
        }
    }

    /// Transport for endpoints that return their body unwrapped.
    pub fn pass_through(base_url: impl Into<String>) -> Self {
        Self::new(base_url, ResponseMode::PassThrough)
    }

    /// Transport for endpoints speaking the `{ success, data, message }` envelope.
    pub fn enveloped(base_url: impl Into<String>) -> Self {
        Self::new(base_url, ResponseMode::Envelope)
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self::new(config.base_url(), config.response_mode())
            .with_timeout(config.timeout())
            .with_retry(RetryPolicy::new(config.retries(), config.retry_delay()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn mode(&self) -> ResponseMode {
        self.mode
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn full_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send_once(&self, request: &RequestDescriptor) -> Result<Payload> {
        let url = self.full_url(&request.url);
        let timeout = request.timeout.unwrap_or(self.timeout);

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(request.headers.clone())
            .timeout(timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::File(_) => match request.body.to_form() {
                Some(Ok(form)) => builder.multipart(form),
                Some(Err(e)) => return Err(transport_error(&request.url, timeout, e)),
                None => builder,
            },
        };

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(&request.url, timeout, e))?;

        debug!(
            url = %url,
            status = %response.status(),
            request = %request.describe(),
            "Response received"
        );

        let status = response.status();
        if !status.is_success() {
            let body = response
                .bytes()
                .await
                .map_err(|e| transport_error(&request.url, timeout, e))?;
            return Err(status_error(&request.url, status.as_u16(), &body));
        }

        read_payload(response, request, timeout).await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &RequestDescriptor) -> Result<Payload> {
        let payload = self
            .retry
            .run(|| request.describe(), || self.send_once(request))
            .await?;

        normalizer::normalize(self.mode, payload).inspect_err(|e| {
            error!(url = %request.url, error = %e, "Server reported failure");
        })
    }
}

async fn read_payload(
    response: Response,
    request: &RequestDescriptor,
    timeout: Duration,
) -> Result<Payload> {
    match request.response_type {
        ResponseType::Json => {
            let body = response
                .bytes()
                .await
                .map_err(|e| transport_error(&request.url, timeout, e))?;
            Ok(Payload::Json(normalizer::parse_json_body(&body)))
        }
        ResponseType::Binary => {
            let content_type = header_string(&response, CONTENT_TYPE);
            let file_name =
                header_string(&response, CONTENT_DISPOSITION).and_then(|v| disposition_file_name(&v));
            let body = response
                .bytes()
                .await
                .map_err(|e| transport_error(&request.url, timeout, e))?;
            Ok(Payload::Binary(Blob {
                data: body.to_vec(),
                content_type,
                file_name,
            }))
        }
    }
}

fn header_string(response: &Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Extracts `filename` from a `Content-Disposition` header value, dropping any directory part.
fn disposition_file_name(value: &str) -> Option<String> {
    value.split(';').map(str::trim).find_map(|part| {
        let name = part.strip_prefix("filename=")?.trim_matches('"');
        std::path::Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
    })
}

fn transport_error(url: &str, timeout: Duration, source: reqwest::Error) -> ClientError {
    if source.is_builder() {
        ClientError::ConfigError {
            message: format!("Cannot build request for {url}: {source}"),
        }
    } else if source.is_timeout() {
        ClientError::Timeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis(),
        }
    } else {
        ClientError::Network {
            url: url.to_string(),
            source,
        }
    }
}

fn status_error(url: &str, status: u16, body: &[u8]) -> ClientError {
    if status == 400 {
        ClientError::BadRequest {
            url: url.to_string(),
            payload: normalizer::bad_request_payload(body),
        }
    } else {
        ClientError::Status {
            url: url.to_string(),
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_url_joins_without_double_slash() {
        let transport = HttpTransport::pass_through("http://localhost:8000/api/");
        assert_eq!(transport.base_url(), "http://localhost:8000/api");
        assert_eq!(
            transport.full_url("goods/5/chat"),
            "http://localhost:8000/api/goods/5/chat"
        );
        assert_eq!(transport.full_url("/goods"), "http://localhost:8000/api/goods");
    }

    #[test]
    fn test_defaults() {
        let transport = HttpTransport::enveloped(DEFAULT_BASE_URL);
        assert_eq!(transport.mode(), ResponseMode::Envelope);
        assert_eq!(transport.retry_policy(), RetryPolicy::default());
        assert_eq!(transport.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_disposition_file_name() {
        assert_eq!(
            disposition_file_name(r#"attachment; filename="Spravka_842810.docx""#),
            Some("Spravka_842810.docx".to_string())
        );
        assert_eq!(disposition_file_name("inline"), None);
        assert_eq!(
            disposition_file_name(r#"attachment; filename="../../etc/passwd""#),
            Some("passwd".to_string())
        );
    }

    #[test]
    fn test_status_error_mapping() {
        let bad = status_error("goods/1/chat", 400, br#"{"detail":"question is required"}"#);
        assert!(matches!(
            bad,
            ClientError::BadRequest { ref payload, .. } if payload["detail"] == "question is required"
        ));

        let gone = status_error("goods/9/dashboard", 404, b"not found");
        assert!(matches!(gone, ClientError::Status { status: 404, ref body, .. } if body == "not found"));
        assert!(status_error("goods", 408, b"").is_retryable());
    }
}
