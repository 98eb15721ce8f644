use crate::client::RestClient;
use crate::delivery::Delivery;
use crate::error::{DeliveryError, ExportError};
use crate::export::ExportService;
use crate::fields::FieldConfig;
use crate::models::Entity;
use crate::notify::Notifier;
use crate::settings::ProcessedSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorStatus {
    Idle,
    Generating,
}

/// Tracks the current selection against the host context, validates export
/// preconditions, drives the export service and hands results to delivery.
///
/// All operations take `&mut self`, so overlapping generates cannot be
/// expressed and the preview slot has exactly one writer at a time.
pub struct Coordinator<C: RestClient, D: Delivery, N: Notifier> {
    export: ExportService<C>,
    delivery: D,
    notifier: N,
    settings: Option<ProcessedSettings>,
    visible_entities: Vec<Entity>,
    selected_entities: Vec<Entity>,
    preview: Option<String>,
    status: CoordinatorStatus,
}

impl<C: RestClient, D: Delivery, N: Notifier> Coordinator<C, D, N> {
    pub fn new(export: ExportService<C>, delivery: D, notifier: N) -> Self {
        Self {
            export,
            delivery,
            notifier,
            settings: None,
            visible_entities: Vec::new(),
            selected_entities: Vec::new(),
            preview: None,
            status: CoordinatorStatus::Idle,
        }
    }

    /// Settings arrive asynchronously from the host store; exports are
    /// rejected until they have landed.
    pub fn settings_loaded(&mut self, settings: ProcessedSettings) {
        self.settings = Some(settings);
    }

    /// The host context published a new visible-record list. Selection and
    /// preview are scoped to one context snapshot and do not survive it.
    pub fn entities_changed(&mut self, entities: Vec<Entity>) {
        self.visible_entities = entities;
        self.selected_entities.clear();
        self.preview = None;
    }

    pub fn toggle_entity(&mut self, entity: &Entity) {
        match self.selected_entities.iter().position(|e| e.link == entity.link) {
            Some(index) => {
                self.selected_entities.remove(index);
            }
            None => self.selected_entities.push(entity.clone()),
        }
    }

    pub fn is_selected(&self, entity: &Entity) -> bool {
        self.selected_entities.iter().any(|e| e.link == entity.link)
    }

    pub fn is_all_selected(&self) -> bool {
        !self.visible_entities.is_empty()
            && self.visible_entities.iter().all(|e| self.is_selected(e))
    }

    /// Select every visible entity, or clear the selection when everything
    /// is already selected.
    pub fn master_toggle(&mut self) {
        if self.is_all_selected() {
            self.selected_entities.clear();
        } else {
            self.selected_entities = self.visible_entities.clone();
        }
    }

    pub fn clear(&mut self) {
        self.selected_entities.clear();
        self.preview = None;
    }

    pub fn visible_entities(&self) -> &[Entity] {
        &self.visible_entities
    }

    pub fn selected_count(&self) -> usize {
        self.selected_entities.len()
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn status(&self) -> CoordinatorStatus {
        self.status
    }

    /// The single owner of user-facing export validation. Failures warn and
    /// leave the coordinator in Idle; the Generating state is never entered
    /// and no network traffic happens. On success, returns the field list
    /// and header the export will run with.
    fn validate(&self) -> Result<(Vec<FieldConfig>, String), ExportError> {
        if self.selected_entities.is_empty() {
            return Err(ExportError::NoSelection);
        }
        let settings = self.settings.as_ref().ok_or(ExportError::SettingsNotReady)?;
        if settings.export_fields.is_empty() {
            return Err(ExportError::NoFieldsSelected);
        }
        Ok((
            settings.export_fields.clone(),
            settings.settings.custom_header.clone(),
        ))
    }

    /// Run one generate cycle: Idle → Generating → Idle. Success populates
    /// the preview; failure clears it and surfaces the wrapped message.
    pub async fn generate_preview(&mut self) -> bool {
        let (fields, custom_header) = match self.validate() {
            Ok(config) => config,
            Err(e) => {
                self.notifier.warn(&e.to_string());
                return false;
            }
        };

        self.status = CoordinatorStatus::Generating;
        let result = self
            .export
            .generate_export(&self.selected_entities, &fields, &custom_header)
            .await;
        self.status = CoordinatorStatus::Idle;

        match result {
            Ok(result) => {
                self.preview = Some(result.file_content);
                self.notifier
                    .success(&format!("export generated for {} PO lines", result.count));
                true
            }
            Err(e) => {
                self.preview = None;
                self.notifier.error(&e.to_string());
                false
            }
        }
    }

    /// Copy the preview to the clipboard, generating it first when there is
    /// none yet.
    pub async fn copy(&mut self) {
        if self.preview.is_none() && !self.generate_preview().await {
            return;
        }
        let content = self.preview.clone().unwrap_or_default();
        match self.delivery.copy(&content) {
            Ok(()) => self.notifier.success("export copied to clipboard"),
            Err(e) => self.notify_delivery_error(e),
        }
    }

    /// Write the preview to a `.txt` file, generating it first when there is
    /// none yet.
    pub async fn download(&mut self, filename: &str) {
        if self.preview.is_none() && !self.generate_preview().await {
            return;
        }
        let content = self.preview.clone().unwrap_or_default();
        match self.delivery.download(&content, filename) {
            Ok(()) => self.notifier.success("export file downloaded"),
            Err(e) => self.notify_delivery_error(e),
        }
    }

    fn notify_delivery_error(&mut self, error: DeliveryError) {
        match error {
            // Nothing to deliver is a user slip, not a delivery failure.
            DeliveryError::NothingToCopy | DeliveryError::NothingToDownload => {
                self.notifier.warn(&error.to_string())
            }
            _ => self.notifier.error(&error.to_string()),
        }
    }
}
