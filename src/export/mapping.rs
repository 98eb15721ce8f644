use serde_json::Value;

use crate::fields::ExportField;
use crate::models::po_line::{CodeDesc, ResourceMetadata};
use crate::models::PoLine;

/// Extract one cell from a PO line for one field. Cells are always concrete
/// strings; absent data resolves to each field's documented default.
pub fn extract_cell(field: ExportField, line: &PoLine) -> String {
    match field {
        ExportField::Isbn => metadata_str(line, |m| m.isbn.as_deref()),
        ExportField::Title => metadata_str(line, |m| m.title.as_deref()),
        ExportField::Author => metadata_str(line, |m| m.author.as_deref()),
        ExportField::PoNumber => line.po_number.clone().unwrap_or_default(),
        // Canonical source is the top-level `number` key; some historical
        // record variants carried `line_number` instead, which is ignored.
        ExportField::LineNumber => line.number.clone().unwrap_or_default(),
        ExportField::Owner => desc_str(line.owner.as_ref()),
        ExportField::Vendor => desc_str(line.vendor.as_ref()),
        ExportField::Price => price_str(line),
        ExportField::Fund => line
            .fund_ledger
            .as_ref()
            .and_then(|f| f.name.clone())
            .unwrap_or_default(),
        ExportField::Quantity => total_quantity(line).to_string(),
        ExportField::CreatedDate => line.created_date.clone().unwrap_or_default(),
    }
}

fn metadata_str<'a>(
    line: &'a PoLine,
    pick: impl Fn(&'a ResourceMetadata) -> Option<&'a str>,
) -> String {
    line.resource_metadata
        .as_ref()
        .and_then(pick)
        .unwrap_or("")
        .to_string()
}

fn desc_str(pair: Option<&CodeDesc>) -> String {
    pair.and_then(|p| p.desc.clone()).unwrap_or_default()
}

/// Plain decimal amount, no currency suffix. `sum` wins over `amount`;
/// neither present renders as "0".
fn price_str(line: &PoLine) -> String {
    let amount = line
        .price
        .as_ref()
        .and_then(|p| p.sum.as_ref().or(p.amount.as_ref()));

    match amount {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "0".to_string(),
    }
}

fn total_quantity(line: &PoLine) -> i64 {
    line.location
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .filter_map(|loc| loc.quantity)
        .sum()
}
