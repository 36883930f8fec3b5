use std::time::Duration;

pub const DEFAULT_LISTING_URLS: [&str; 5] = [
    "https://www.daiict.ac.in/faculty",
    "https://www.daiict.ac.in/adjunct-faculty",
    "https://www.daiict.ac.in/adjunct-faculty-international",
    "https://www.daiict.ac.in/distinguished-professor",
    "https://www.daiict.ac.in/professor-practice",
];

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_DELAY: Duration = Duration::from_millis(700);

/// Request identity sent with every page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderProfile {
    pub user_agent: String,
    pub accept_language: String,
}

impl Default for HeaderProfile {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Listing pages, crawled in this order.
    pub listing_urls: Vec<String>,
    pub headers: HeaderProfile,
    pub timeout: Duration,
    /// Pause after every profile fetch.
    pub delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            listing_urls: DEFAULT_LISTING_URLS.iter().map(|u| u.to_string()).collect(),
            headers: HeaderProfile::default(),
            timeout: DEFAULT_TIMEOUT,
            delay: DEFAULT_DELAY,
        }
    }
}

impl PipelineConfig {
    pub fn validate(self) -> Result<Self, String> {
        if self.listing_urls.is_empty() {
            return Err("At least one listing URL is required".to_string());
        }
        if let Some(bad) = self
            .listing_urls
            .iter()
            .find(|u| !u.starts_with("http://") && !u.starts_with("https://"))
        {
            return Err(format!("Listing URL must be absolute http(s): {bad}"));
        }
        if self.timeout.is_zero() {
            return Err("Timeout must be greater than 0".to_string());
        }
        Ok(self)
    }
}
