use serde::{Deserialize, Serialize};

/// One exportable column: a stable name, a default display label, an
/// inclusion flag and the user-editable header text.
///
/// `name` stays a plain string so saved settings blobs keep resolving by
/// name after catalog reorderings; mapping goes through [`ExportField`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub name: String,
    pub label: String,
    pub selected: bool,
    pub custom_label: String,
}

impl FieldConfig {
    fn new(name: &str, label: &str, selected: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            selected,
            custom_label: label.to_string(),
        }
    }
}

/// The closed set of fields the exporter knows how to extract. Unknown
/// field names have no variant and render as empty cells, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportField {
    Isbn,
    Title,
    Quantity,
    PoNumber,
    Author,
    LineNumber,
    Owner,
    Vendor,
    Price,
    Fund,
    CreatedDate,
}

impl ExportField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "isbn" => Some(Self::Isbn),
            "title" => Some(Self::Title),
            "quantity" => Some(Self::Quantity),
            "poNumber" => Some(Self::PoNumber),
            "author" => Some(Self::Author),
            "line_number" => Some(Self::LineNumber),
            "owner" => Some(Self::Owner),
            "vendor" => Some(Self::Vendor),
            "price" => Some(Self::Price),
            "fund" => Some(Self::Fund),
            "created_date" => Some(Self::CreatedDate),
            _ => None,
        }
    }
}

/// The out-of-the-box field catalog. Ordering and default `selected` flags
/// are part of the saved-settings compatibility contract and must not be
/// reshuffled; stored blobs merge against this list by `name`.
pub fn available_fields() -> Vec<FieldConfig> {
    vec![
        FieldConfig::new("isbn", "ISBN", true),
        FieldConfig::new("title", "Title", true),
        FieldConfig::new("quantity", "Quantity", true),
        FieldConfig::new("poNumber", "PO Number", false),
        FieldConfig::new("author", "Author", false),
        FieldConfig::new("line_number", "Line Number", false),
        FieldConfig::new("owner", "Owner", false),
        FieldConfig::new("vendor", "Vendor", false),
        FieldConfig::new("price", "Price", false),
        FieldConfig::new("fund", "Fund", false),
        FieldConfig::new("created_date", "Created Date", false),
    ]
}
