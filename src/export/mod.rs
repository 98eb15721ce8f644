pub mod mapping;

use futures::future::try_join_all;

use crate::client::RestClient;
use crate::error::ExportError;
use crate::fields::{ExportField, FieldConfig};
use crate::models::{Entity, PoLine};

/// The output of one export generation. Transient: lives only for one
/// generate → preview/deliver cycle.
#[derive(Debug, Clone)]
pub struct ExportResult {
    pub file_content: String,
    pub export_fields: Vec<FieldConfig>,
    pub count: usize,
    pub generated_at: chrono::DateTime<chrono::Local>,
}

/// Fetches PO line details and serializes them into tab-separated text.
pub struct ExportService<C: RestClient> {
    client: C,
}

impl<C: RestClient> ExportService<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Generate one export: fetch every entity's detail record concurrently
    /// (all-or-nothing, fail-fast on the first error), map each response to
    /// one row in the caller-given field order, and assemble the text blob.
    ///
    /// The coordinator validates user input before calling in; the guards
    /// here only keep library misuse from reaching the network.
    pub async fn generate_export(
        &self,
        entities: &[Entity],
        fields: &[FieldConfig],
        custom_header: &str,
    ) -> Result<ExportResult, ExportError> {
        if entities.is_empty() {
            return Err(ExportError::NoSelection);
        }
        if fields.is_empty() {
            return Err(ExportError::NoFieldsSelected);
        }

        tracing::info!(count = entities.len(), "generating PO line export");

        let requests = entities.iter().map(|entity| self.client.get_json(&entity.link));
        let responses = try_join_all(requests).await?;

        let lines: Vec<PoLine> = responses.into_iter().map(PoLine::from_response).collect();
        let file_content = render_content(&lines, fields, custom_header);

        Ok(ExportResult {
            file_content,
            export_fields: fields.to_vec(),
            count: entities.len(),
            generated_at: chrono::Local::now(),
        })
    }
}

/// Assemble the export text: optional custom header line, tab-joined header
/// row, then one tab-joined row per record, every line `\n`-terminated.
///
/// Cell values are written verbatim; embedded tabs or newlines are not
/// escaped (known limitation inherited from the original format).
fn render_content(lines: &[PoLine], fields: &[FieldConfig], custom_header: &str) -> String {
    let mut content = String::new();

    if !custom_header.is_empty() {
        content.push_str(custom_header);
        content.push('\n');
    }

    let header: Vec<&str> = fields.iter().map(|f| f.custom_label.as_str()).collect();
    content.push_str(&header.join("\t"));
    content.push('\n');

    for line in lines {
        let row: Vec<String> = fields
            .iter()
            .map(|f| match ExportField::from_name(&f.name) {
                Some(field) => mapping::extract_cell(field, line),
                None => String::new(),
            })
            .collect();
        content.push_str(&row.join("\t"));
        content.push('\n');
    }

    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockClient {
        responses: HashMap<String, Value>,
        failing_link: Option<String>,
        calls: AtomicUsize,
    }

    impl MockClient {
        fn new(responses: Vec<(&str, Value)>) -> Self {
            Self {
                responses: responses
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
                failing_link: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing_at(mut self, link: &str) -> Self {
            self.failing_link = Some(link.to_string());
            self
        }
    }

    impl RestClient for MockClient {
        async fn get_json(&self, link: &str) -> Result<Value, ExportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing_link.as_deref() == Some(link) {
                return Err(ExportError::Fetch(format!("404 for {link}")));
            }
            Ok(self.responses.get(link).cloned().unwrap_or(json!({})))
        }
    }

    fn field(name: &str, label: &str) -> FieldConfig {
        FieldConfig {
            name: name.to_string(),
            label: label.to_string(),
            selected: true,
            custom_label: label.to_string(),
        }
    }

    fn entities(links: &[&str]) -> Vec<Entity> {
        links.iter().copied().map(Entity::from_link).collect()
    }

    #[tokio::test]
    async fn test_basic_export_scenario() {
        let client = MockClient::new(vec![
            (
                "po_line/1",
                json!({ "resource_metadata": { "isbn": "111" },
                        "location": [ { "quantity": 2 }, { "quantity": 3 } ] }),
            ),
            (
                "po_line/2",
                json!({ "resource_metadata": { "isbn": "222" },
                        "location": [ { "quantity": 1 } ] }),
            ),
        ]);
        let service = ExportService::new(client);

        let fields = vec![field("isbn", "ISBN"), field("quantity", "Qty")];
        let result = service
            .generate_export(&entities(&["po_line/1", "po_line/2"]), &fields, "# Export")
            .await
            .unwrap();

        assert_eq!(result.file_content, "# Export\nISBN\tQty\n111\t5\n222\t1\n");
        assert_eq!(result.count, 2);
        assert_eq!(result.export_fields, fields);
    }

    #[tokio::test]
    async fn test_output_is_deterministic() {
        let response = json!({
            "resource_metadata": { "isbn": "111", "title": "T" },
            "price": { "sum": "10.00" }
        });
        let fields = vec![field("isbn", "ISBN"), field("price", "Price")];

        let mut outputs = Vec::new();
        for _ in 0..3 {
            let service =
                ExportService::new(MockClient::new(vec![("po_line/1", response.clone())]));
            let result = service
                .generate_export(&entities(&["po_line/1"]), &fields, "# H")
                .await
                .unwrap();
            outputs.push(result.file_content);
        }
        assert!(outputs.windows(2).all(|w| w[0] == w[1]));
    }

    #[tokio::test]
    async fn test_column_order_follows_field_order() {
        let response = json!({
            "resource_metadata": { "isbn": "111", "title": "T", "author": "A" }
        });

        let forward = vec![field("isbn", "I"), field("title", "T"), field("author", "A")];
        let reversed: Vec<FieldConfig> = forward.iter().rev().cloned().collect();

        let service = ExportService::new(MockClient::new(vec![("po_line/1", response.clone())]));
        let out = service
            .generate_export(&entities(&["po_line/1"]), &forward, "")
            .await
            .unwrap();
        assert_eq!(out.file_content, "I\tT\tA\n111\tT\tA\n");

        let service = ExportService::new(MockClient::new(vec![("po_line/1", response)]));
        let out = service
            .generate_export(&entities(&["po_line/1"]), &reversed, "")
            .await
            .unwrap();
        assert_eq!(out.file_content, "A\tT\tI\nA\tT\t111\n");
    }

    #[tokio::test]
    async fn test_empty_custom_header_omits_line() {
        let service = ExportService::new(MockClient::new(vec![("po_line/1", json!({}))]));
        let result = service
            .generate_export(&entities(&["po_line/1"]), &[field("isbn", "ISBN")], "")
            .await
            .unwrap();
        assert_eq!(result.file_content, "ISBN\n\n");
        assert!(!result.file_content.starts_with('\n'));
    }

    #[tokio::test]
    async fn test_missing_metadata_still_emits_row() {
        let service = ExportService::new(MockClient::new(vec![(
            "po_line/1",
            json!({ "po_number": "POL-1" }),
        )]));
        let fields = vec![field("isbn", "ISBN"), field("poNumber", "PO")];
        let result = service
            .generate_export(&entities(&["po_line/1"]), &fields, "")
            .await
            .unwrap();
        assert_eq!(result.file_content, "ISBN\tPO\n\tPOL-1\n");
    }

    #[tokio::test]
    async fn test_unknown_field_name_renders_empty_cell() {
        let service = ExportService::new(MockClient::new(vec![(
            "po_line/1",
            json!({ "po_number": "POL-1" }),
        )]));
        let fields = vec![field("poNumber", "PO"), field("barcode", "Barcode")];
        let result = service
            .generate_export(&entities(&["po_line/1"]), &fields, "")
            .await
            .unwrap();
        assert_eq!(result.file_content, "PO\tBarcode\nPOL-1\t\n");
    }

    #[tokio::test]
    async fn test_fail_fast_wraps_original_message() {
        for failing in ["po_line/1", "po_line/2", "po_line/3"] {
            let client = MockClient::new(vec![
                ("po_line/1", json!({})),
                ("po_line/2", json!({})),
                ("po_line/3", json!({})),
            ])
            .failing_at(failing);
            let service = ExportService::new(client);

            let err = service
                .generate_export(
                    &entities(&["po_line/1", "po_line/2", "po_line/3"]),
                    &[field("isbn", "ISBN")],
                    "",
                )
                .await
                .unwrap_err();

            let message = err.to_string();
            assert!(message.starts_with("error fetching line-item details:"));
            assert!(message.contains(&format!("404 for {failing}")));
        }
    }

    #[tokio::test]
    async fn test_empty_inputs_reject_without_network() {
        let service = ExportService::new(MockClient::new(vec![]));

        let err = service
            .generate_export(&[], &[field("isbn", "ISBN")], "")
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::NoSelection));

        let err = service
            .generate_export(&entities(&["po_line/1"]), &[], "")
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::NoFieldsSelected));

        assert_eq!(service.client.calls.load(Ordering::SeqCst), 0);
    }
}
