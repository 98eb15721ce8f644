use serde::Deserialize;
use serde_json::Value;

/// The slice of an Alma PO line detail response the exporter reads.
///
/// Every field is optional: the upstream shape varies between record types
/// and API versions, and absent data must degrade to a default cell rather
/// than a deserialization error. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoLine {
    #[serde(default)]
    pub resource_metadata: Option<ResourceMetadata>,
    #[serde(default)]
    pub po_number: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub owner: Option<CodeDesc>,
    #[serde(default)]
    pub vendor: Option<CodeDesc>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub fund_ledger: Option<FundLedger>,
    #[serde(default)]
    pub location: Option<Vec<Location>>,
    #[serde(default)]
    pub created_date: Option<String>,
}

impl PoLine {
    /// Lenient conversion from a raw API response. Anything that is not a
    /// PO-line-shaped object becomes the all-empty record, so rows are
    /// still emitted with default cells.
    pub fn from_response(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceMetadata {
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

/// Alma's ubiquitous `{ value, desc }` pair; only `desc` is exported.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodeDesc {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
}

/// Monetary amount. `sum` is a string in most responses but a bare number
/// in older ones, so both keep the raw JSON value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Price {
    #[serde(default)]
    pub sum: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FundLedger {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub quantity: Option<i64>,
}
