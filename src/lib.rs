//! Export Alma purchase-order lines as tab-separated text.
//!
//! The pipeline: select PO line entities from a host context, fetch each
//! line's full detail concurrently over the REST API, map the responses to
//! rows per a user-configured field list, and deliver the result to the
//! clipboard or a `.txt` file.

pub mod client;
pub mod coordinator;
pub mod delivery;
pub mod error;
pub mod export;
pub mod fields;
pub mod models;
pub mod notify;
pub mod settings;

pub use client::{AlmaClient, RestClient};
pub use coordinator::{Coordinator, CoordinatorStatus};
pub use delivery::{Delivery, NativeDelivery, DEFAULT_EXPORT_FILENAME};
pub use error::{DeliveryError, ExportError, SettingsError};
pub use export::{ExportResult, ExportService};
pub use fields::{available_fields, ExportField, FieldConfig};
pub use models::{Entity, PoLine};
pub use notify::{Notifier, TracingNotifier};
pub use settings::{
    AppSettings, FileSettingsStorage, ProcessedSettings, SettingsService, SettingsStorage,
};
