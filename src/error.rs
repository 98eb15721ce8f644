use thiserror::Error;

/// Failures of the export-generation pipeline.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no PO lines selected for export")]
    NoSelection,

    #[error("no export fields selected, check settings")]
    NoFieldsSelected,

    #[error("settings have not finished loading")]
    SettingsNotReady,

    /// Any single detail fetch failing aborts the whole export. The
    /// underlying message is preserved behind a fixed stage prefix.
    #[error("error fetching line-item details: {0}")]
    Fetch(String),
}

impl ExportError {
    /// Validation errors are warned about and recovered locally; everything
    /// else is a real failure surfaced as an error notification.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NoSelection | Self::NoFieldsSelected | Self::SettingsNotReady
        )
    }
}

/// Failures of clipboard/file delivery. Empty-content conditions are
/// deliberately distinct variants from real delivery failures.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("nothing to copy, generate a preview first")]
    NothingToCopy,

    #[error("nothing to download, generate a preview first")]
    NothingToDownload,

    #[error("clipboard write failed: {0}")]
    Clipboard(String),

    #[error("failed to write export file: {0}")]
    File(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(String),

    #[error("failed to save settings: {0}")]
    Save(String),
}
