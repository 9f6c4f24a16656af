//! Request dispatcher.
//!
//! [`Api`] binds a resource path to a [`Transport`] and enforces latest-request-wins per
//! resolved URL: issuing a request to a URL that still has one outstanding cancels the
//! earlier request, which then settles with [`ClientError::Cancelled`].

use crate::core::normalizer::Payload;
use crate::core::registry::InFlightRegistry;
use crate::core::request::{RequestBody, RequestDescriptor, RequestOverride, ResponseType};
use crate::domain::model::Blob;
use crate::domain::ports::Transport;
use crate::utils::error::{ClientError, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct Api {
    resource: String,
    transport: Arc<dyn Transport>,
    in_flight: InFlightRegistry,
}

impl std::fmt::Debug for Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Api")
            .field("resource", &self.resource)
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}

impl Api {
    pub fn new(resource: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            resource: resource.into().trim_matches('/').to_string(),
            transport,
            in_flight: InFlightRegistry::new(),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn in_flight(&self) -> &InFlightRegistry {
        &self.in_flight
    }

    /// `{resource}/{sub_id?}/{method_name?}/{id?}`, in that order.
    pub fn resolve_url(&self, options: &RequestOverride) -> String {
        let mut url = self.resource.clone();
        for segment in [&options.sub_id, &options.method_name, &options.id]
            .into_iter()
            .flatten()
        {
            url.push('/');
            url.push_str(segment);
        }
        url
    }

    pub async fn dispatch(
        &self,
        method: Method,
        body: RequestBody,
        options: RequestOverride,
    ) -> Result<Payload> {
        let url = self.resolve_url(&options);
        let guard = self.in_flight.register(&url);
        let request = RequestDescriptor::new(method, url, body, options);

        tokio::select! {
            biased;
            () = guard.token().cancelled() => {
                tracing::debug!(url = %request.url, "Request superseded");
                Err(ClientError::Cancelled { url: request.url.clone() })
            }
            result = self.transport.execute(&request) => result,
        }
    }

    async fn exec<T: DeserializeOwned>(
        &self,
        method: Method,
        body: RequestBody,
        options: RequestOverride,
    ) -> Result<T> {
        let url = self.resolve_url(&options);
        let payload = self.dispatch(method, body, options).await?;
        decode(payload, &url)
    }

    pub async fn get<T: DeserializeOwned>(&self, options: RequestOverride) -> Result<T> {
        self.exec(Method::GET, RequestBody::Empty, options).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        body: &B,
        options: RequestOverride,
    ) -> Result<T> {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        self.exec(Method::POST, body, options).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        body: &B,
        options: RequestOverride,
    ) -> Result<T> {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        self.exec(Method::PUT, body, options).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, options: RequestOverride) -> Result<T> {
        self.exec(Method::DELETE, RequestBody::Empty, options).await
    }

    pub async fn options<T: DeserializeOwned>(&self, options: RequestOverride) -> Result<T> {
        self.exec(Method::OPTIONS, RequestBody::Empty, options).await
    }

    /// POSTs `file` as a multipart body with a single `file` field.
    pub async fn upload(&self, file: Blob, options: RequestOverride) -> Result<()> {
        self.dispatch(Method::POST, RequestBody::upload(file), options)
            .await
            .map(|_| ())
    }

    /// POSTs an empty JSON object and reads the response as binary unless `options` says otherwise.
    pub async fn download(&self, options: RequestOverride) -> Result<Blob> {
        let options =
            options.merged_over(RequestOverride::new().response_type(ResponseType::Binary));
        let url = self.resolve_url(&options);
        let payload = self
            .dispatch(Method::POST, RequestBody::Json(serde_json::json!({})), options)
            .await?;
        into_blob(payload, &url)
    }

    /// GETs a binary document.
    pub async fn fetch_binary(&self, options: RequestOverride) -> Result<Blob> {
        let options =
            options.merged_over(RequestOverride::new().response_type(ResponseType::Binary));
        let url = self.resolve_url(&options);
        let payload = self.dispatch(Method::GET, RequestBody::Empty, options).await?;
        into_blob(payload, &url)
    }
}

fn decode<T: DeserializeOwned>(payload: Payload, url: &str) -> Result<T> {
    match payload {
        Payload::Json(value) => Ok(serde_json::from_value(value)?),
        Payload::Binary(_) => Err(ClientError::UnexpectedBinary {
            url: url.to_string(),
        }),
    }
}

fn into_blob(payload: Payload, url: &str) -> Result<Blob> {
    match payload {
        Payload::Binary(blob) => Ok(blob),
        // A JSON response type was forced through the override.
        Payload::Json(value) => Ok(Blob::new(serde_json::to_vec(&value)?)
            .with_content_type("application/json")
            .with_file_name(url.rsplit('/').next().unwrap_or(url))),
    }
}
