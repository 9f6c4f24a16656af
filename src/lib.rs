pub mod config;
pub mod core;
pub mod domain;
pub mod services;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, CliConfig, Command};

pub use config::toml_config::TomlConfig;
pub use crate::core::{
    dispatcher::Api,
    normalizer::{Envelope, Payload, ResponseMode},
    request::{RequestBody, RequestOverride, ResponseType},
    retry::RetryPolicy,
    transport::HttpTransport,
};
pub use domain::model::{Blob, ChatAnswer, Product, ProductInfo};
pub use services::{catalog::ProductCatalog, goods::GoodsApi};
pub use utils::error::{ClientError, Result};
