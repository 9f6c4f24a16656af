use crate::core::dispatcher::Api;
use crate::core::request::RequestOverride;
use crate::domain::model::{Blob, ChatAnswer, ChatQuestion, Product, ProductInfo};
use crate::domain::ports::Transport;
use crate::utils::error::Result;
use std::sync::Arc;

pub const GOODS_RESOURCE: &str = "goods";

/// Typed access to the `goods` resource family.
#[derive(Debug, Clone)]
pub struct GoodsApi {
    api: Api,
}

impl GoodsApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            api: Api::new(GOODS_RESOURCE, transport),
        }
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    /// `GET goods`
    pub async fn get_all(&self) -> Result<Vec<Product>> {
        self.api.get(RequestOverride::new()).await
    }

    /// `GET goods/{id}/dashboard`
    pub async fn get(&self, id: &str) -> Result<ProductInfo> {
        self.api
            .get(RequestOverride::new().method_name("dashboard").sub_id(id))
            .await
    }

    /// `POST goods/{id}/chat` with `{"question": text}`
    pub async fn chat(&self, id: &str, text: &str) -> Result<ChatAnswer> {
        let question = ChatQuestion {
            question: text.to_string(),
        };
        self.api
            .post(&question, RequestOverride::new().method_name("chat").sub_id(id))
            .await
    }

    /// `GET goods/{id}/report.docx`
    pub async fn report(&self, id: &str) -> Result<Blob> {
        self.api
            .fetch_binary(RequestOverride::new().method_name("report.docx").sub_id(id))
            .await
    }

    /// `GET goods/{id}/mosprom-letter.docx`
    pub async fn mosprom_letter(&self, id: &str) -> Result<Blob> {
        self.api
            .fetch_binary(
                RequestOverride::new()
                    .method_name("mosprom-letter.docx")
                    .sub_id(id),
            )
            .await
    }
}
