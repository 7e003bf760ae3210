use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
use config::{AppConfig, CliConfig, FileConfig};

mod media;
use media::{HttpMediaHost, MediaHost, MediaIngestor};

mod pipeline;
use pipeline::{BatchImporter, CatalogExporter, ExportFile};

mod record_store;
use record_store::{RecordStore, SqliteRecordStore};

mod tabular;
use tabular::ExportFormat;

#[derive(Parser, Debug)]
#[clap(about = "Bulk catalog import/export tool")]
struct CliArgs {
    /// Path to the SQLite record database file.
    #[clap(long)]
    pub db_path: Option<PathBuf>,

    /// URL of the media hosting service for image uploads.
    #[clap(long)]
    pub media_host_url: Option<String>,

    /// Timeout in seconds for media host requests.
    #[clap(long, default_value_t = 60)]
    pub media_timeout_sec: u64,

    /// Directory that relative image paths in batches are resolved against.
    #[clap(long)]
    pub working_root: Option<PathBuf>,

    /// Path to an optional TOML config file. Values in it override CLI flags.
    #[clap(long)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a tabular batch file (xlsx, xls or ods).
    Import {
        /// Path to the batch file to import.
        file: PathBuf,
    },
    /// Export all records as a download file.
    Export {
        #[clap(long, value_enum, default_value_t = ExportFormat::Excel)]
        format: ExportFormat,

        /// Output path. Defaults to the conventional filename in the
        /// current directory.
        #[clap(long)]
        output: Option<PathBuf>,
    },
    /// Emit a headers-only template file.
    Template {
        #[clap(long, value_enum, default_value_t = ExportFormat::Excel)]
        format: ExportFormat,

        #[clap(long)]
        output: Option<PathBuf>,
    },
    /// Create categories by name so imports can reference them.
    SeedCategories {
        #[clap(required = true)]
        names: Vec<String>,
    },
    /// Create brands by name so imports can reference them.
    SeedBrands {
        #[clap(required = true)]
        names: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let cli_config = CliConfig {
        db_path: cli_args.db_path.clone(),
        media_host_url: cli_args.media_host_url.clone(),
        media_timeout_sec: cli_args.media_timeout_sec,
        working_root: cli_args.working_root.clone(),
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Opening SQLite record database at {:?}...", config.db_path);
    let store: Arc<dyn RecordStore> = Arc::new(SqliteRecordStore::new(&config.db_path)?);

    match cli_args.command {
        Command::Import { file } => {
            let Some(media_host_url) = config.media_host_url else {
                bail!("Import requires a media host; set --media-host-url or media_host_url in the config file");
            };
            let host: Arc<dyn MediaHost> = Arc::new(HttpMediaHost::new(
                media_host_url,
                config.media_timeout_sec,
            ));
            let ingestor = MediaIngestor::new(host, config.working_root);
            let importer = BatchImporter::new(store, ingestor);

            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read batch file: {}", file.display()))?;
            let report = importer.import_batch(&bytes).await?;

            info!(
                "{} ({} inserted, {} updated, {} failed)",
                report.message, report.inserted_count, report.updated_count, report.failed_count
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Export { format, output } => {
            let exporter = CatalogExporter::new(store);
            let file = exporter.export_all(format)?;
            write_export(&file, output)?;
        }
        Command::Template { format, output } => {
            let exporter = CatalogExporter::new(store);
            let file = exporter.template(format)?;
            write_export(&file, output)?;
        }
        Command::SeedCategories { names } => {
            for name in &names {
                let id = store.create_category(name)?;
                info!("Category '{}' -> {}", name, id);
            }
        }
        Command::SeedBrands { names } => {
            for name in &names {
                let id = store.create_brand(name)?;
                info!("Brand '{}' -> {}", name, id);
            }
        }
    }

    Ok(())
}

fn write_export(file: &ExportFile, output: Option<PathBuf>) -> Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(&file.filename));
    std::fs::write(&path, &file.bytes)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;
    info!(
        "Wrote {} bytes to {} ({})",
        file.bytes.len(),
        path.display(),
        file.content_type
    );
    Ok(())
}
