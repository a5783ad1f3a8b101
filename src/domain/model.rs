use serde::{Deserialize, Serialize};

/// Shopify 商品，只保留報表需要的欄位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metafield {
    pub namespace: String,
    pub key: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl Metafield {
    /// Raw text of the value; non-string values keep their JSON spelling.
    pub fn display_value(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn matches(&self, namespace: &str, key: &str) -> bool {
        self.namespace == namespace && self.key == key
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub title: String,
    pub downloads: String,
}

/// `GET products.json` body
#[derive(Debug, Clone, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

/// `GET products/{id}/metafields.json` body
#[derive(Debug, Clone, Deserialize)]
pub struct MetafieldsResponse {
    pub metafields: Vec<Metafield>,
}
