//! PriceCharting scraper main entry point
//!
//! This is the command-line interface for the scraper and its companion
//! tools: link extraction, image fetching, SQL generation and database
//! backup.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pricecharting_scraper::backup::{run_backup, PostgrestClient};
use pricecharting_scraper::config::{load_config, ConfigOverrides};
use pricecharting_scraper::images::{fetch_image_list, ImageDownloader};
use pricecharting_scraper::output::{run_summary, OutputFormat};
use pricecharting_scraper::scraper::build_http_client;
use pricecharting_scraper::sql::{convert_files, expand_file_patterns};
use pricecharting_scraper::url::extract_links_to_file;
use pricecharting_scraper::PriceChartingScraper;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Game price scraper for pricecharting.com
///
/// Fetches product pages politely (rate limited, cached on disk), and turns
/// the resulting records into SQL for the collection database.
#[derive(Parser, Debug)]
#[command(name = "pricecharting")]
#[command(version)]
#[command(about = "Fetch game prices from pricecharting.com", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape one game or a list of games
    Scrape(ScrapeArgs),

    /// Extract game links from a saved HTML page
    ExtractLinks {
        /// HTML file to read
        #[arg(value_name = "HTML")]
        html: PathBuf,

        /// File to write the links to, one per line
        #[arg(short, long, default_value = "file.txt")]
        output: PathBuf,
    },

    /// Download images from an `id;url` list into the image directory
    Images {
        /// List file
        #[arg(value_name = "LIST", default_value = "images.txt")]
        list: PathBuf,

        /// Path to TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Convert record files into SQL inserts
    Sql {
        /// Record files or patterns (e.g. "json/*.json") to convert
        #[arg(value_name = "FILES", required = true)]
        files: Vec<String>,

        /// Skip products that already exist instead of updating them
        #[arg(long)]
        ignore_existing: bool,

        /// File to write the SQL to
        #[arg(short, long, default_value = "insert.txt")]
        output: PathBuf,
    },

    /// Dump the collection database to an SQL script
    Backup {
        /// Dump file; an existing one is copied to the dumps directory first
        #[arg(short, long, default_value = "../db.sql")]
        output: PathBuf,

        /// Directory for timestamped copies of previous dumps
        #[arg(long, default_value = "./dumps")]
        dumps_dir: PathBuf,

        /// Environment file with the database credentials
        #[arg(long, default_value = "../.env")]
        env_file: PathBuf,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InputArgs {
    /// Game URL (e.g. https://www.pricecharting.com/game/pal-xbox-360/kinect-sports) or numeric id
    #[arg(long)]
    url: Option<String>,

    /// File containing URLs or ids to process, one per line
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ScrapeArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Path to TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format for each record
    #[arg(long, value_enum, default_value_t = FormatArg::Json)]
    format: FormatArg,

    /// Also fetch the variants listed on each product page
    #[arg(long = "scrapevariants")]
    scrape_variants: bool,

    /// Seconds between requests (overrides the config file)
    #[arg(long)]
    delay: Option<f64>,

    /// Seconds before each variant request (overrides the config file)
    #[arg(long)]
    variant_delay: Option<f64>,

    /// Maximum age of cached records in seconds (overrides the config file)
    #[arg(long)]
    file_age: Option<u64>,

    /// User agent sent with every request (overrides the config file)
    #[arg(long)]
    user_agent: Option<String>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long)]
    timeout: Option<u64>,
}

impl ScrapeArgs {
    /// Values given explicitly on the command line
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            user_agent: self.user_agent.clone(),
            timeout: self.timeout,
            delay: self.delay,
            variant_delay: self.variant_delay,
            file_age: self.file_age,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Command::Scrape(args) => handle_scrape(args).await,
        Command::ExtractLinks { html, output } => handle_extract_links(&html, &output),
        Command::Images { list, config } => handle_images(&list, config.as_deref()).await,
        Command::Sql {
            files,
            ignore_existing,
            output,
        } => handle_sql(&files, &output, ignore_existing),
        Command::Backup {
            output,
            dumps_dir,
            env_file,
        } => handle_backup(&output, &dumps_dir, &env_file).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so formatted records on stdout can be piped.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pricecharting_scraper=info,pricecharting=info,warn"),
            1 => EnvFilter::new("pricecharting_scraper=debug,pricecharting=debug,info"),
            2 => EnvFilter::new("pricecharting_scraper=trace,pricecharting=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Reads a list of URLs or ids, one per line, skipping blank lines
fn read_input_list(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read URL list file {}", path.display()))?;

    let inputs: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if inputs.is_empty() {
        bail!("URL list file {} is empty", path.display());
    }
    Ok(inputs)
}

/// Handles the scrape command
async fn handle_scrape(args: ScrapeArgs) -> anyhow::Result<ExitCode> {
    let config = load_config(args.config.as_deref(), &args.overrides())?;

    let inputs = match (args.input.url, args.input.file) {
        (Some(url), _) => vec![url],
        (None, Some(path)) => read_input_list(&path)?,
        (None, None) => bail!("Either --url or --file is required"),
    };

    let formatter = OutputFormat::from(args.format).formatter();
    let mut scraper = PriceChartingScraper::new(config).context("Failed to set up scraper")?;

    tracing::info!("Processing {} item(s)", inputs.len());
    let mut all_succeeded = true;

    for input in &inputs {
        match scraper.process(input, args.scrape_variants).await {
            Ok(record) => {
                println!("{}", formatter.format(&record)?);
                all_succeeded &= record.success;
            }
            Err(e) => {
                tracing::error!("Error processing {}: {}", input, e);
                all_succeeded = false;
            }
        }
    }

    print!("{}", run_summary(scraper.store()).render());

    Ok(if all_succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Handles the extract-links command
fn handle_extract_links(html: &Path, output: &Path) -> anyhow::Result<ExitCode> {
    let links = extract_links_to_file(html, output)
        .with_context(|| format!("Failed to extract links from {}", html.display()))?;

    println!(
        "Found {} unique game links, written to {}",
        links.len(),
        output.display()
    );
    Ok(ExitCode::SUCCESS)
}

/// Handles the images command
async fn handle_images(list: &Path, config_path: Option<&Path>) -> anyhow::Result<ExitCode> {
    let config = load_config(config_path, &ConfigOverrides::default())?;
    let client = build_http_client(&config.scraper)?;
    let downloader = ImageDownloader::new(client, &config.output.image_dir);

    let summary = fetch_image_list(&downloader, list)
        .await
        .with_context(|| format!("Could not read image list {}", list.display()))?;

    println!(
        "Saved {} images, {} failed, {} malformed lines skipped",
        summary.saved, summary.failed, summary.skipped
    );

    Ok(if summary.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Handles the sql command
fn handle_sql(files: &[String], output: &Path, ignore_existing: bool) -> anyhow::Result<ExitCode> {
    let files = expand_file_patterns(files);
    let summary = convert_files(&files, output, ignore_existing)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if summary.converted.is_empty() {
        tracing::error!("No files were processed successfully");
        return Ok(ExitCode::FAILURE);
    }

    println!(
        "Processed {} files. SQL blocks have been written to {}.",
        summary.converted.len(),
        output.display()
    );
    Ok(ExitCode::SUCCESS)
}

/// Handles the backup command
async fn handle_backup(
    output: &Path,
    dumps_dir: &Path,
    env_file: &Path,
) -> anyhow::Result<ExitCode> {
    let client = PostgrestClient::from_env(Some(env_file))?;
    let report = run_backup(&client, output, dumps_dir).await?;

    if let Some(previous) = &report.previous {
        println!("Previous backup copied to: {}", previous.display());
    }
    println!(
        "Backup created: {} ({} tables)",
        report.output.display(),
        report.tables
    );
    Ok(ExitCode::SUCCESS)
}
