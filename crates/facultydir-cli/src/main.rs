use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use facultydir::config::{DEFAULT_LISTING_URLS, HeaderProfile, PipelineConfig};
use facultydir::fetcher::{HttpFetcher, PageSource};
use facultydir::parser::{parse_directory, parse_profile};
use facultydir::pipeline::Pipeline;
use facultydir::sink;
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "facultydir")]
#[command(about = "A faculty directory scraper", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[arg(
        long,
        default_value_t = 10,
        global = true,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Per-request timeout in seconds"
    )]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl every listing page, visit each profile and write the dataset to CSV
    Scrape {
        #[arg(
            long = "url",
            value_name = "URL",
            help = "Listing page to crawl (repeatable, defaults to the five directory pages)"
        )]
        urls: Vec<String>,

        #[arg(
            long,
            default_value = "data/raw_data.csv",
            help = "Path of the CSV file to write"
        )]
        output: PathBuf,

        #[arg(
            long,
            default_value_t = 700,
            help = "Pause after each profile request, in milliseconds"
        )]
        delay_ms: u64,

        #[arg(
            short = 'o',
            long = "output-format",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
    /// Fetch a single listing page and print its faculty cards
    Listing {
        #[arg(help = "URL of the listing page to fetch")]
        url: String,

        #[arg(
            short = 'o',
            long = "output-format",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
    /// Fetch a single profile page and print the extracted fields
    Profile {
        #[arg(help = "URL of the profile page to fetch")]
        url: String,

        #[arg(
            short = 'o',
            long = "output-format",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

async fn fetch_or_exit(fetcher: &HttpFetcher, url: &str) -> String {
    fetcher.fetch(url).await.unwrap_or_else(|e| {
        log::error!("Error fetching {}: {}", url, e);
        process::exit(1);
    })
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let timeout = Duration::from_secs(cli.timeout_secs);

    match cli.command {
        Commands::Scrape {
            urls,
            output,
            delay_ms,
            format,
        } => {
            let listing_urls = if urls.is_empty() {
                DEFAULT_LISTING_URLS.iter().map(|u| u.to_string()).collect()
            } else {
                urls
            };

            let config = PipelineConfig {
                listing_urls,
                headers: HeaderProfile::default(),
                timeout,
                delay: Duration::from_millis(delay_ms),
            };

            let config = config.validate().unwrap_or_else(|e| {
                log::error!("Invalid args: {e}");
                process::exit(1);
            });

            let pipeline = Pipeline::from_config(config).unwrap_or_else(|e| {
                log::error!("Error creating scraper: {}", e);
                process::exit(1);
            });

            log::info!(
                "Crawling {} listing page(s)...",
                pipeline.listing_urls().len()
            );
            let crawl = pipeline.run().await;

            if let Err(e) = sink::write_csv(&output, &crawl.records) {
                log::error!("Error writing {}: {}", output.display(), e);
                process::exit(1);
            }
            log::info!("All faculty data saved to {}", output.display());

            match format {
                OutputFormat::Json => serialize_json(&crawl.records),
                OutputFormat::Text => {
                    if crawl.records.is_empty() {
                        println!("No records scraped.");
                    } else {
                        for (i, record) in crawl.records.iter().enumerate() {
                            print!("{:>3}. {}", i + 1, record);
                        }
                    }
                    print!("{}", crawl.stats);
                }
            }
        }

        Commands::Listing { url, format } => {
            let fetcher = HttpFetcher::new(&HeaderProfile::default(), timeout).unwrap_or_else(|e| {
                log::error!("Error creating scraper: {}", e);
                process::exit(1);
            });

            let html = fetch_or_exit(&fetcher, &url).await;
            let cards = parse_directory(&html, &url);

            match format {
                OutputFormat::Json => serialize_json(&cards),
                OutputFormat::Text => {
                    if cards.is_empty() {
                        println!("No faculty cards found.");
                    } else {
                        for (i, card) in cards.iter().enumerate() {
                            println!("{:>3}. {}", i + 1, card);
                        }
                    }
                }
            }
        }

        Commands::Profile { url, format } => {
            let fetcher = HttpFetcher::new(&HeaderProfile::default(), timeout).unwrap_or_else(|e| {
                log::error!("Error creating scraper: {}", e);
                process::exit(1);
            });

            let html = fetch_or_exit(&fetcher, &url).await;
            let profile = parse_profile(&html);

            match format {
                OutputFormat::Json => serialize_json(&profile),
                OutputFormat::Text => {
                    println!("{}", url);
                    print!("{}", profile);
                }
            }
        }
    }
}
