pub mod aggregate;
pub mod config;
pub mod fetcher;
pub mod parser;
pub mod pipeline;
pub mod sink;
pub mod types;

pub use config::{HeaderProfile, PipelineConfig};
pub use fetcher::{FetchError, HttpFetcher, PageSource};
pub use pipeline::{Crawl, CrawlStats, FixedDelay, NoDelay, Pipeline, Throttle};
pub use types::{CardFields, FacultyRecord, ProfileFields, Teaching};
