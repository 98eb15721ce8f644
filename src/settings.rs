use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SettingsError;
use crate::fields::{available_fields, FieldConfig};

/// Default header line prepended to every export unless the user changes it.
pub const DEFAULT_CUSTOM_HEADER: &str = "# PO Line Export";

/// The persisted configuration. Field order is significant: it determines
/// column order in the export and is user-reorderable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub available_fields: Vec<FieldConfig>,
    pub custom_header: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            available_fields: available_fields(),
            custom_header: DEFAULT_CUSTOM_HEADER.to_string(),
        }
    }
}

/// Settings plus the derived export-field subsequence, recomputed on every
/// load so it can never go stale across saves.
#[derive(Debug, Clone)]
pub struct ProcessedSettings {
    pub settings: AppSettings,
    pub export_fields: Vec<FieldConfig>,
}

/// A stored blob may carry either half of the settings without the other,
/// so both halves deserialize independently.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSettings {
    #[serde(default)]
    available_fields: Option<Vec<FieldConfig>>,
    #[serde(default)]
    custom_header: Option<String>,
}

/// The host settings storage: an opaque scoped JSON read/write.
pub trait SettingsStorage {
    fn get(&self) -> Result<Option<Value>, SettingsError>;
    fn set(&self, value: &Value) -> Result<(), SettingsError>;
}

/// File-backed storage under the platform config directory.
pub struct FileSettingsStorage {
    path: PathBuf,
}

impl FileSettingsStorage {
    pub fn new() -> Result<Self, SettingsError> {
        let proj_dirs = ProjectDirs::from("com", "exlibris", "po-line-exporter")
            .ok_or_else(|| SettingsError::Load("could not determine config directory".into()))?;
        Ok(Self {
            path: proj_dirs.config_dir().join("settings.json"),
        })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SettingsStorage for FileSettingsStorage {
    fn get(&self) -> Result<Option<Value>, SettingsError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(&self.path).map_err(|e| SettingsError::Load(e.to_string()))?;
        let value = serde_json::from_str(&content).map_err(|e| SettingsError::Load(e.to_string()))?;
        Ok(Some(value))
    }

    fn set(&self, value: &Value) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SettingsError::Save(e.to_string()))?;
        }
        let content =
            serde_json::to_string_pretty(value).map_err(|e| SettingsError::Save(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| SettingsError::Save(e.to_string()))
    }
}

pub struct SettingsService<S: SettingsStorage> {
    storage: S,
}

impl<S: SettingsStorage> SettingsService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load settings, substituting catalog defaults where the stored blob is
    /// missing, empty or unreadable. `availableFields` and `customHeader`
    /// default independently: one being absent does not reset the other.
    /// A load failure is logged and degrades to full defaults so the caller
    /// stays usable.
    pub fn get_settings(&self) -> ProcessedSettings {
        let stored = match self.storage.get() {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("falling back to default settings: {e}");
                None
            }
        };

        let stored: StoredSettings = stored
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();

        let available_fields = match stored.available_fields {
            Some(fields) if !fields.is_empty() => fields,
            _ => available_fields(),
        };
        let custom_header = match stored.custom_header {
            Some(header) if !header.is_empty() => header,
            _ => DEFAULT_CUSTOM_HEADER.to_string(),
        };

        let export_fields: Vec<FieldConfig> = available_fields
            .iter()
            .filter(|f| f.selected)
            .cloned()
            .collect();

        ProcessedSettings {
            settings: AppSettings {
                available_fields,
                custom_header,
            },
            export_fields,
        }
    }

    /// Write the full settings object. Replace semantics: the stored blob is
    /// overwritten, never patched. On failure the caller's in-memory state
    /// is untouched so the user can retry.
    pub fn save_settings(&self, settings: &AppSettings) -> Result<(), SettingsError> {
        let value =
            serde_json::to_value(settings).map_err(|e| SettingsError::Save(e.to_string()))?;
        self.storage.set(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    struct MemoryStorage {
        value: RefCell<Option<Value>>,
        fail_get: bool,
    }

    impl MemoryStorage {
        fn new(value: Option<Value>) -> Self {
            Self {
                value: RefCell::new(value),
                fail_get: false,
            }
        }

        fn failing() -> Self {
            Self {
                value: RefCell::new(None),
                fail_get: true,
            }
        }
    }

    impl SettingsStorage for MemoryStorage {
        fn get(&self) -> Result<Option<Value>, SettingsError> {
            if self.fail_get {
                return Err(SettingsError::Load("storage unavailable".into()));
            }
            Ok(self.value.borrow().clone())
        }

        fn set(&self, value: &Value) -> Result<(), SettingsError> {
            *self.value.borrow_mut() = Some(value.clone());
            Ok(())
        }
    }

    fn stored_field(name: &str, selected: bool) -> Value {
        json!({ "name": name, "label": name, "selected": selected, "customLabel": name })
    }

    #[test]
    fn test_empty_storage_yields_full_defaults() {
        let service = SettingsService::new(MemoryStorage::new(None));
        let processed = service.get_settings();

        assert_eq!(processed.settings, AppSettings::default());
        assert_eq!(processed.export_fields.len(), 3);
    }

    #[test]
    fn test_load_error_yields_full_defaults() {
        let service = SettingsService::new(MemoryStorage::failing());
        let processed = service.get_settings();
        assert_eq!(processed.settings, AppSettings::default());
    }

    #[test]
    fn test_halves_default_independently() {
        // fields present, header absent
        let service = SettingsService::new(MemoryStorage::new(Some(json!({
            "availableFields": [stored_field("title", true)]
        }))));
        let processed = service.get_settings();
        assert_eq!(processed.settings.available_fields.len(), 1);
        assert_eq!(processed.settings.custom_header, DEFAULT_CUSTOM_HEADER);

        // header present, fields absent
        let service = SettingsService::new(MemoryStorage::new(Some(json!({
            "customHeader": "# Mine"
        }))));
        let processed = service.get_settings();
        assert_eq!(processed.settings.custom_header, "# Mine");
        assert_eq!(processed.settings.available_fields, available_fields());

        // both present
        let service = SettingsService::new(MemoryStorage::new(Some(json!({
            "availableFields": [stored_field("isbn", false)],
            "customHeader": "# Both"
        }))));
        let processed = service.get_settings();
        assert_eq!(processed.settings.custom_header, "# Both");
        assert_eq!(processed.settings.available_fields.len(), 1);

        // both absent (empty object)
        let service = SettingsService::new(MemoryStorage::new(Some(json!({}))));
        let processed = service.get_settings();
        assert_eq!(processed.settings, AppSettings::default());
    }

    #[test]
    fn test_empty_field_list_counts_as_absent() {
        let service = SettingsService::new(MemoryStorage::new(Some(json!({
            "availableFields": [],
            "customHeader": "# Kept"
        }))));
        let processed = service.get_settings();
        assert_eq!(processed.settings.available_fields, available_fields());
        assert_eq!(processed.settings.custom_header, "# Kept");
    }

    #[test]
    fn test_export_fields_is_selected_subsequence_in_order() {
        let service = SettingsService::new(MemoryStorage::new(Some(json!({
            "availableFields": [
                stored_field("vendor", true),
                stored_field("isbn", false),
                stored_field("title", true),
                stored_field("fund", false),
                stored_field("price", true),
            ]
        }))));
        let processed = service.get_settings();

        let names: Vec<&str> = processed
            .export_fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["vendor", "title", "price"]);
    }

    #[test]
    fn test_save_replaces_whole_blob() {
        let storage = MemoryStorage::new(Some(json!({
            "availableFields": [stored_field("isbn", true)],
            "customHeader": "# Old",
            "stray": "value"
        })));
        let service = SettingsService::new(storage);

        let settings = AppSettings {
            available_fields: vec![FieldConfig {
                name: "title".to_string(),
                label: "Title".to_string(),
                selected: true,
                custom_label: "Tytuł".to_string(),
            }],
            custom_header: "# New".to_string(),
        };
        service.save_settings(&settings).unwrap();

        let written = service.storage.value.borrow().clone().unwrap();
        assert_eq!(written["customHeader"], "# New");
        assert_eq!(written["availableFields"][0]["customLabel"], "Tytuł");
        assert!(written.get("stray").is_none());

        // and the derivation is recomputed from the new blob
        let processed = service.get_settings();
        assert_eq!(processed.export_fields[0].name, "title");
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = std::env::temp_dir().join(format!("po-line-exporter-test-{}", std::process::id()));
        let storage = FileSettingsStorage::with_path(dir.join("settings.json"));

        assert!(storage.get().unwrap().is_none());

        storage.set(&json!({ "customHeader": "# Disk" })).unwrap();
        let loaded = storage.get().unwrap().unwrap();
        assert_eq!(loaded["customHeader"], "# Disk");

        let _ = fs::remove_dir_all(&dir);
    }
}
