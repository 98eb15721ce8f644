use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DeliveryError;

/// The native stand-in for a browser download: the export text is written
/// as a UTF-8 `.txt` file into a target directory in one synchronous step.
pub struct FileDelivery {
    output_dir: PathBuf,
}

impl FileDelivery {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn save(&self, content: &str, filename: &str) -> Result<PathBuf, DeliveryError> {
        if content.is_empty() {
            return Err(DeliveryError::NothingToDownload);
        }

        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(sanitize_filename(filename));
        fs::write(&path, content)?;
        Ok(path)
    }
}

/// Keep the download inside the target directory whatever the caller passes.
fn sanitize_filename(filename: &str) -> String {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(super::DEFAULT_EXPORT_FILENAME);
    if name.is_empty() {
        super::DEFAULT_EXPORT_FILENAME.to_string()
    } else {
        name.to_string()
    }
}
