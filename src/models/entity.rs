use serde::{Deserialize, Serialize};

/// A reference to a record in the host library system. The host context
/// supplies these; this crate only ever reads `link` to fetch the full
/// detail record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default)]
    pub id: String,
    pub link: String,
    #[serde(rename = "type", default)]
    pub entity_type: String,
    #[serde(default)]
    pub description: String,
}

impl Entity {
    pub fn from_link(link: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            link: link.into(),
            entity_type: "PO_LINE".to_string(),
            description: String::new(),
        }
    }
}
