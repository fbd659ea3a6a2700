mod config;
mod logging;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

use gbdx_client::module::catalog::{
    get_catalog_record, DEFAULT_MAX_CLOUD_COVER, DEFAULT_MAX_OFF_NADIR_ANGLE,
};
use gbdx_client::module::orders::{get_order_status, OrderLine};
use gbdx_client::module::thumbnail::get_thumbnail;
use gbdx_client::module::workflow::{
    describe_workflows, list_available_tasks, search_workflows, WorkflowSearch, WorkflowState,
    DEFAULT_LOOKBACK_HOURS,
};
use gbdx_client::{Aoi, CatalogQuery, GbdxSession, Platform, SearchParameters, TEST_AOI};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "gbdx")]
#[command(about = "Search and monitor GBDX imagery", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.gbdx-config.toml)
    #[arg(long, global = true, env = "GBDX_CONFIG")]
    config: Option<PathBuf>,

    /// Overrides the configured log level
    #[arg(long, global = true, env = "GBDX_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog over a bounding box
    Query {
        /// lon0 lat0 lon1 lat1
        #[arg(
            num_args = 4,
            value_names = ["LON0", "LAT0", "LON1", "LAT1"],
            allow_negative_numbers = true
        )]
        aoi: Vec<f64>,

        #[arg(long)]
        start: Option<NaiveDate>,

        #[arg(long)]
        end: Option<NaiveDate>,

        #[arg(long, default_value_t = Platform::WorldView2)]
        platform: Platform,

        #[arg(long, default_value_t = DEFAULT_MAX_CLOUD_COVER)]
        max_cloud: f64,

        #[arg(long, default_value_t = DEFAULT_MAX_OFF_NADIR_ANGLE)]
        max_off_nadir: f64,

        /// Number of records whose pan resolution is printed
        #[arg(long, default_value_t = 5)]
        show: usize,
    },
    /// Show the delivery status of an order
    OrderStatus { soli: String },
    /// Fetch a single catalog record
    Record { cat_id: String },
    /// Download the browse thumbnail of a record
    Thumbnail {
        cat_id: String,

        #[arg(long)]
        out: PathBuf,
    },
    /// List the tasks available to workflows
    Tasks,
    /// Search recent workflows
    Workflows {
        #[arg(long, default_value_t = WorkflowState::All)]
        state: WorkflowState,

        #[arg(long)]
        owner: Option<String>,

        /// Hours to look back
        #[arg(long, default_value_t = DEFAULT_LOOKBACK_HOURS)]
        lookback: u32,

        /// Print per-task states of each workflow
        #[arg(long)]
        details: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => AppConfig::default_path().context("Cannot locate home directory")?,
    };
    let config = AppConfig::from_file(&config_path)?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let _logger_guard = logging::init_logging(&config.log_dir, "gbdx-cli", level)?;
    tracing::info!("Loaded config from {}", config_path.display());

    let session = GbdxSession::connect(&config.gbdx)
        .await
        .context("Failed to authenticate with GBDX")?;

    match cli.command {
        Commands::Query {
            aoi,
            start,
            end,
            platform,
            max_cloud,
            max_off_nadir,
            show,
        } => {
            let aoi = if aoi.is_empty() {
                Aoi::from(TEST_AOI)
            } else {
                Aoi::from_slice(&aoi)?
            };
            let params = SearchParameters::new(aoi)
                .date_range(start, end)
                .platform(platform)
                .max_cloud_cover(max_cloud)
                .max_off_nadir_angle(max_off_nadir);
            let mut query = CatalogQuery::from_parameters(params)?
                .with_cache_duration(Duration::from_secs(config.gbdx.query_cache_secs));

            let result = query.execute(&session).await.context("Catalog search failed")?;
            println!("{}", result);

            for id in result.list_ids().into_iter().take(show) {
                match result.get_property(id, "panResolution") {
                    Ok(value) => println!("({}, {})", id, value),
                    Err(e) => tracing::warn!("{}", e),
                }
            }
        }
        Commands::OrderStatus { soli } => {
            let status = get_order_status(&session, &soli).await?;
            for line in &status.lines {
                println!("{}", format_order_line(line));
            }
            println!("delivered: {}", status.is_delivered());
        }
        Commands::Record { cat_id } => {
            let record = get_catalog_record(&session, &cat_id).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Thumbnail { cat_id, out } => {
            let thumbnail = get_thumbnail(&session, &cat_id).await?;
            thumbnail
                .save(&out)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!("Saved {} ({} bytes)", out.display(), thumbnail.bytes.len());
        }
        Commands::Tasks => {
            for task in list_available_tasks(&session).await? {
                println!("{}", task);
            }
        }
        Commands::Workflows {
            state,
            owner,
            lookback,
            details,
        } => {
            let search = WorkflowSearch {
                state,
                owner,
                lookback_h: lookback,
            };
            let ids = search_workflows(&session, &search).await?;
            if details {
                println!("{}", describe_workflows(&session, &ids).await?);
            } else {
                for id in ids {
                    println!("{}", id);
                }
            }
        }
    }

    Ok(())
}

/// `<acquisition id> <percent delivered>`, with `-`/`unknown` for missing fields.
fn format_order_line(line: &OrderLine) -> String {
    let acquisition_id = line
        .get("acquisition_id")
        .and_then(Value::as_str)
        .unwrap_or("-");
    let delivered = line
        .percent_delivered()
        .map(|p| format!("{}%", p))
        .unwrap_or_else(|| "unknown".to_string());
    format!("{} {}", acquisition_id, delivered)
}
