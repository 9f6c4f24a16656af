pub mod dispatcher;
pub mod normalizer;
pub mod registry;
pub mod request;
pub mod retry;
pub mod transport;

pub use crate::domain::model::Blob;
pub use crate::domain::ports::{ConfigProvider, Storage, Transport};
pub use crate::utils::error::Result;
