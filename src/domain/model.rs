use serde::{Deserialize, Serialize};

/// Raw file content travelling in either direction: uploads and binary responses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

impl Blob {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            content_type: None,
            file_name: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub hs_code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ByYear {
    pub year: i32,
    pub value_usd_mln: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportsByYear {
    #[serde(flatten)]
    pub by_year: ByYear,
    pub country: String,
    pub value_tons: Option<f64>,
    pub country_group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tariff {
    pub applied_rate: Option<f64>,
    pub wto_bound_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodFlags {
    pub in_techreg: bool,
    pub in_pp1875: bool,
    pub in_order4114: bool,
}

/// Output of the server-side recommendation for one product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub last_year: Option<i32>,
    pub share_ns: Option<f64>,
    pub delta_ns: Option<f64>,
    pub prod_ge_cons: Option<bool>,
    pub applied: Option<f64>,
    pub wto_bound: Option<f64>,
    pub metric_used: Option<String>,
    pub branch: Option<String>,
}

/// Everything the dashboard shows for a single product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub good: Product,
    #[serde(default)]
    pub tariffs: Vec<Tariff>,
    #[serde(default)]
    pub production: Vec<ByYear>,
    #[serde(default)]
    pub consumption: Vec<ByYear>,
    #[serde(default)]
    pub imports: Vec<ImportsByYear>,
    #[serde(default)]
    pub flags: Vec<GoodFlags>,
    #[serde(default)]
    pub measures: Vec<String>,
    #[serde(default)]
    pub summary: Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatQuestion {
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub answer: String,
}
