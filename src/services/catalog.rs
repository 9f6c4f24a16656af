use crate::domain::model::Product;
use crate::services::goods::GoodsApi;
use crate::utils::error::Result;
use tokio::sync::OnceCell;

/// Product list fetched once and reused for the lifetime of the catalog.
///
/// A failed load is not cached; the next `read` tries again.
#[derive(Debug)]
pub struct ProductCatalog {
    goods: GoodsApi,
    all: OnceCell<Vec<Product>>,
}

impl ProductCatalog {
    pub fn new(goods: GoodsApi) -> Self {
        Self {
            goods,
            all: OnceCell::new(),
        }
    }

    pub async fn read(&self) -> Result<&[Product]> {
        let all = self
            .all
            .get_or_try_init(|| async {
                let products = self.goods.get_all().await?;
                tracing::debug!(count = products.len(), "Product catalog loaded");
                Ok::<_, crate::utils::error::ClientError>(products)
            })
            .await?;
        Ok(all)
    }

    pub fn is_loaded(&self) -> bool {
        self.all.initialized()
    }

    pub async fn find(&self, id: i64) -> Result<Option<&Product>> {
        Ok(self.read().await?.iter().find(|p| p.id == id))
    }
}
