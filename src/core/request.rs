use crate::domain::model::Blob;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use std::time::Duration;

/// Name of the multipart field that carries an uploaded file.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    #[default]
    Json,
    Binary,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    /// Multipart body with a single `file` field.
    File(Blob),
}

impl RequestBody {
    pub fn upload(blob: Blob) -> Self {
        RequestBody::File(blob)
    }

    /// Builds a fresh multipart form. Forms are consumed on send, so every attempt gets its own.
    pub fn to_form(&self) -> Option<reqwest::Result<Form>> {
        let RequestBody::File(blob) = self else {
            return None;
        };

        let mut part = Part::bytes(blob.data.clone())
            .file_name(blob.file_name.clone().unwrap_or_else(|| "blob".to_string()));
        if let Some(content_type) = &blob.content_type {
            part = match part.mime_str(content_type) {
                Ok(part) => part,
                Err(e) => return Some(Err(e)),
            };
        }

        Some(Ok(Form::new().part(UPLOAD_FIELD, part)))
    }
}

/// Per-call routing and option overrides.
///
/// Path segments are appended in a fixed order: `sub_id`, `method_name`, `id`.
#[derive(Debug, Clone, Default)]
pub struct RequestOverride {
    pub sub_id: Option<String>,
    pub method_name: Option<String>,
    pub id: Option<String>,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub response_type: Option<ResponseType>,
    pub timeout: Option<Duration>,
}

impl RequestOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sub_id(mut self, sub_id: impl Into<String>) -> Self {
        self.sub_id = Some(sub_id.into());
        self
    }

    pub fn method_name(mut self, method_name: impl Into<String>) -> Self {
        self.method_name = Some(method_name.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Fills unset options from `defaults`; values already present here win.
    pub fn merged_over(mut self, defaults: RequestOverride) -> Self {
        self.sub_id = self.sub_id.or(defaults.sub_id);
        self.method_name = self.method_name.or(defaults.method_name);
        self.id = self.id.or(defaults.id);
        self.response_type = self.response_type.or(defaults.response_type);
        self.timeout = self.timeout.or(defaults.timeout);

        let mut headers = defaults.headers;
        headers.extend(self.headers);
        self.headers = headers;

        let mut query = defaults.query;
        query.retain(|(key, _)| !self.query.iter().any(|(k, _)| k == key));
        query.extend(self.query);
        self.query = query;

        self
    }
}

/// One outbound request, built per call and never persisted.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the API root, e.g. `goods/5/chat`.
    pub url: String,
    pub body: RequestBody,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub response_type: ResponseType,
    pub timeout: Option<Duration>,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: String, body: RequestBody, options: RequestOverride) -> Self {
        Self {
            method,
            url,
            body,
            headers: options.headers,
            query: options.query,
            response_type: options.response_type.unwrap_or_default(),
            timeout: options.timeout,
        }
    }

    /// Short form used in retry and failure logs.
    pub fn describe(&self) -> String {
        let body = match &self.body {
            RequestBody::Empty => "empty".to_string(),
            RequestBody::Json(value) => value.to_string(),
            RequestBody::File(blob) => format!("file ({} bytes)", blob.len()),
        };
        format!(
            "{} {} response_type={:?} timeout={:?} body={}",
            self.method, self.url, self.response_type, self.timeout, body
        )
    }
}
