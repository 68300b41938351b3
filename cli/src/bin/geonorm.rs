use clap::{Parser, Subcommand};
use cli::{features_to_geometry, GeonormConfig};
use color_eyre::eyre::{eyre, Result};
use normalize::{export_features, export_geojson, GeoJsonDownload, NormalizedFeature, Pipeline};
use postpass::{extract_within_geometry_query, PostpassClient};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a .toml or .json configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a GeoJSON polygon into drawing-tool features
    Normalize {
        /// Path to the input GeoJSON file
        input: PathBuf,
        /// Write the FeatureCollection here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Decimal digits kept on each coordinate
        #[arg(long)]
        precision: Option<u32>,
        /// Skip the zero-distance buffer repair
        #[arg(long)]
        no_repair: bool,
    },
    /// Build a Postpass query over the normalized input
    Query {
        /// Path to the input GeoJSON file
        input: PathBuf,
        /// Extract buildings
        #[arg(long)]
        buildings: bool,
        /// Extract roads
        #[arg(long)]
        roads: bool,
        /// Extract water
        #[arg(long)]
        water: bool,
        /// Send the query to the interpreter instead of printing it
        #[arg(long)]
        dispatch: bool,
        /// Postpass interpreter endpoint
        #[arg(long)]
        endpoint: Option<String>,
        /// Write the response here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the JSON schema of the configuration file
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GeonormConfig::from_file(path)?,
        None => GeonormConfig::default(),
    };

    match cli.command {
        Commands::Normalize { input, output, precision, no_repair } => {
            let config = GeonormConfig {
                precision: precision.unwrap_or(config.precision),
                ..config
            };
            normalize_file(&input, output.as_deref(), &config, no_repair)?;
        }
        Commands::Query { input, buildings, roads, water, dispatch, endpoint, output } => {
            let mut config = config;
            config.extract.buildings |= buildings;
            config.extract.roads |= roads;
            config.extract.water |= water;
            if let Some(endpoint) = endpoint {
                config.endpoint = endpoint;
            }
            query_file(&input, output.as_deref(), &config, dispatch).await?;
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&GeonormConfig::schema())?);
        }
    }

    Ok(())
}

fn build_pipeline(config: &GeonormConfig, no_repair: bool) -> Pipeline {
    let builder = Pipeline::builder().with_options(config.normalize_options());
    let builder = if no_repair { builder.without_repair() } else { builder };
    builder.build()
}

fn import(input: &Path, config: &GeonormConfig, no_repair: bool) -> Result<Vec<NormalizedFeature>> {
    let pipeline = build_pipeline(config, no_repair);
    info!("{}", pipeline.info());
    Ok(pipeline.import_geojson_file(input)?)
}

fn normalize_file(
    input: &Path,
    output: Option<&Path>,
    config: &GeonormConfig,
    no_repair: bool,
) -> Result<()> {
    let features = import(input, config, no_repair)?;
    let download = export_features(&features, Some(&config.output_filename))?;
    emit(&download, output)?;

    info!("Normalized {} into {} feature(s)", input.display(), features.len());
    Ok(())
}

async fn query_file(
    input: &Path,
    output: Option<&Path>,
    config: &GeonormConfig,
    dispatch: bool,
) -> Result<()> {
    let features = import(input, config, false)?;
    let geometry = features_to_geometry(&features)
        .ok_or_else(|| eyre!("No polygons to query"))?;
    let sql = extract_within_geometry_query(&geometry, &config.extract)?;

    if !dispatch {
        println!("{sql}");
        return Ok(());
    }

    info!("Dispatching query to {}", config.endpoint);
    let client = PostpassClient::with_endpoint(config.endpoint.clone());
    let response = client.query(&sql).await?;

    let download = export_geojson(&response, Some(&config.output_filename))?;
    emit(&download, output)
}

fn emit(download: &GeoJsonDownload, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, &download.bytes)?;
            info!("Wrote {} ({})", path.display(), download.mime_type);
        }
        None => {
            download.write_to(std::io::stdout().lock())?;
            println!();
        }
    }
    Ok(())
}
