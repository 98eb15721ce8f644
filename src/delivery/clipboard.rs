use std::io::Write as _;
use std::process::{Command, Stdio};

use crate::error::DeliveryError;

/// One way of getting text onto the system clipboard.
pub trait ClipboardBackend {
    fn is_available(&self) -> bool;
    fn write_text(&mut self, text: &str) -> Result<(), DeliveryError>;
}

/// Modern path: the `arboard` cross-platform clipboard.
pub struct ArboardBackend;

impl ClipboardBackend for ArboardBackend {
    fn is_available(&self) -> bool {
        // Construction fails on headless/insecure sessions (no display
        // server), which is exactly when the legacy path must take over.
        arboard::Clipboard::new().is_ok()
    }

    fn write_text(&mut self, text: &str) -> Result<(), DeliveryError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| DeliveryError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| DeliveryError::Clipboard(e.to_string()))
    }
}

/// Legacy path: pipe the text to the first clipboard utility present on the
/// system (`wl-copy`, `xclip`, `xsel`, `pbcopy`, `clip`).
pub struct CommandBackend {
    candidates: Vec<(String, Vec<String>)>,
}

impl CommandBackend {
    pub fn system() -> Self {
        Self {
            candidates: vec![
                ("wl-copy".into(), vec![]),
                ("xclip".into(), vec!["-selection".into(), "clipboard".into()]),
                ("xsel".into(), vec!["--clipboard".into(), "--input".into()]),
                ("pbcopy".into(), vec![]),
                ("clip".into(), vec![]),
            ],
        }
    }

    #[cfg(test)]
    pub fn with_candidates(candidates: Vec<(String, Vec<String>)>) -> Self {
        Self { candidates }
    }

    fn pipe_to(program: &str, args: &[String], text: &str) -> Result<(), DeliveryError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| DeliveryError::Clipboard(format!("{program}: {e}")))?;

        // The child must be reaped on every path, success or failure.
        let written = child
            .stdin
            .take()
            .ok_or_else(|| DeliveryError::Clipboard(format!("{program}: no stdin")))
            .and_then(|mut stdin| {
                stdin
                    .write_all(text.as_bytes())
                    .map_err(|e| DeliveryError::Clipboard(format!("{program}: {e}")))
            });

        let status = child.wait();

        written?;
        match status {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(DeliveryError::Clipboard(format!(
                "{program} exited with {status}"
            ))),
            Err(e) => Err(DeliveryError::Clipboard(format!("{program}: {e}"))),
        }
    }
}

impl ClipboardBackend for CommandBackend {
    fn is_available(&self) -> bool {
        !self.candidates.is_empty()
    }

    fn write_text(&mut self, text: &str) -> Result<(), DeliveryError> {
        let mut last_err = DeliveryError::Clipboard("no clipboard utility found".to_string());
        for (program, args) in &self.candidates {
            match Self::pipe_to(program, args, text) {
                Ok(()) => {
                    tracing::debug!(%program, "copied via legacy clipboard command");
                    return Ok(());
                }
                Err(e) => last_err = e,
            }
        }
        Err(last_err)
    }
}

/// The copy fallback chain: use the modern backend when it is available,
/// otherwise drop down to the legacy one. A failure of an available modern
/// backend is a copy failure, not a reason to fall through.
pub struct FallbackClipboard {
    primary: Box<dyn ClipboardBackend>,
    legacy: Box<dyn ClipboardBackend>,
}

impl FallbackClipboard {
    pub fn new(primary: Box<dyn ClipboardBackend>, legacy: Box<dyn ClipboardBackend>) -> Self {
        Self { primary, legacy }
    }

    pub fn system() -> Self {
        Self::new(Box::new(ArboardBackend), Box::new(CommandBackend::system()))
    }

    pub fn write(&mut self, text: &str) -> Result<(), DeliveryError> {
        if self.primary.is_available() {
            self.primary.write_text(text)
        } else {
            tracing::debug!("modern clipboard unavailable, using legacy path");
            self.legacy.write_text(text)
        }
    }
}
