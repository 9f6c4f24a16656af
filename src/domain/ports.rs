use crate::core::normalizer::{Payload, ResponseMode};
use crate::core::request::RequestDescriptor;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn timeout(&self) -> Duration;
    fn retries(&self) -> u32;
    fn retry_delay(&self) -> Duration;
    fn response_mode(&self) -> ResponseMode;
}

/// Sends one request (including any retries) and returns the normalized payload.
///
/// Implementations must be cancel-safe: the dispatcher drops the returned future
/// when a newer request supersedes this one.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &RequestDescriptor) -> Result<Payload>;
}
