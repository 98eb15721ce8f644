use anyhow::Result;
use clap::Parser;

use po_line_exporter::{
    AlmaClient, Coordinator, Entity, ExportService, FileSettingsStorage, NativeDelivery,
    SettingsService, TracingNotifier,
};

/// Export Alma PO lines as tab-separated text.
#[derive(Parser)]
#[command(name = "po-line-exporter", version)]
struct Cli {
    /// Alma API base URL (falls back to ALMA_API_BASE)
    #[arg(long)]
    base_url: Option<String>,

    /// Alma API key (falls back to ALMA_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Copy the generated export to the system clipboard
    #[arg(long)]
    copy: bool,

    /// Write the export to this file in the current directory
    #[arg(long, value_name = "FILE")]
    out: Option<String>,

    /// PO line links, absolute URLs or paths under the API base
    #[arg(required = true, value_name = "LINK")]
    links: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let base_url = cli
        .base_url
        .or_else(|| std::env::var("ALMA_API_BASE").ok())
        .ok_or_else(|| anyhow::anyhow!("no API base URL: pass --base-url or set ALMA_API_BASE"))?;
    let api_key = cli
        .api_key
        .or_else(|| std::env::var("ALMA_API_KEY").ok())
        .ok_or_else(|| anyhow::anyhow!("no API key: pass --api-key or set ALMA_API_KEY"))?;

    let settings = SettingsService::new(FileSettingsStorage::new()?).get_settings();

    let mut coordinator = Coordinator::new(
        ExportService::new(AlmaClient::new(base_url, api_key)),
        NativeDelivery::new(std::env::current_dir()?),
        TracingNotifier,
    );
    coordinator.settings_loaded(settings);
    coordinator.entities_changed(cli.links.iter().map(|link| Entity::from_link(link.as_str())).collect());
    coordinator.master_toggle();

    if !coordinator.generate_preview().await {
        anyhow::bail!("export generation failed");
    }

    if let Some(preview) = coordinator.preview() {
        print!("{preview}");
    }

    if cli.copy {
        coordinator.copy().await;
    }
    if let Some(filename) = cli.out.as_deref() {
        coordinator.download(filename).await;
    }

    Ok(())
}
