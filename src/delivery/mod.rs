pub mod clipboard;
pub mod file;

use std::path::PathBuf;

use crate::error::DeliveryError;

pub use clipboard::{ClipboardBackend, FallbackClipboard};
pub use file::FileDelivery;

/// Filename used when the caller does not pick one.
pub const DEFAULT_EXPORT_FILENAME: &str = "po_line_export.txt";

/// The side-effect boundary of the exporter: clipboard copy and file
/// download. Injected into the coordinator so headless tests can run
/// against a recording double.
pub trait Delivery {
    fn copy(&mut self, content: &str) -> Result<(), DeliveryError>;
    fn download(&mut self, content: &str, filename: &str) -> Result<(), DeliveryError>;
}

/// Production delivery: system clipboard with legacy fallback, exports
/// written to a target directory.
pub struct NativeDelivery {
    clipboard: FallbackClipboard,
    files: FileDelivery,
}

impl NativeDelivery {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            clipboard: FallbackClipboard::system(),
            files: FileDelivery::new(output_dir),
        }
    }
}

impl Delivery for NativeDelivery {
    fn copy(&mut self, content: &str) -> Result<(), DeliveryError> {
        if content.is_empty() {
            return Err(DeliveryError::NothingToCopy);
        }
        self.clipboard.write(content)
    }

    fn download(&mut self, content: &str, filename: &str) -> Result<(), DeliveryError> {
        if content.is_empty() {
            return Err(DeliveryError::NothingToDownload);
        }
        let path = self.files.save(content, filename)?;
        tracing::info!(path = %path.display(), "export file written");
        Ok(())
    }
}
