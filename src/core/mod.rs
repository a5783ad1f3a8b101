pub mod catalog;
pub mod engine;
pub mod fetcher;
pub mod metafields;
pub mod report;
pub mod retry;

pub use crate::domain::model::{
    Metafield, MetafieldsResponse, Product, ProductsResponse, ReportRow,
};
pub use crate::domain::ports::{CatalogSource, ConfigProvider};
pub use crate::utils::error::Result;
