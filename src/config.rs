use crate::api::DEFAULT_USER_AGENT;
use crate::date::{age_floor_from_days, now_epoch, DEFAULT_MAX_DAYS};
use crate::error::{Result, ScrapeError};
use crate::throttle::DEFAULT_REQUEST_DELAY;
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

/// Largest `limit` the listing endpoint honours.
pub const MAX_PAGE_SIZE: usize = 100;
pub const DEFAULT_MAX_POST_COUNT: usize = 100;
pub const DEFAULT_STORAGE_DIR: &str = "./results";
pub const STORAGE_PATH_ENV: &str = "STORAGE_PATH";

fn container_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("static regex"))
}

/// Reject names Reddit would never accept as a subreddit path segment.
pub fn validate_container(name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ScrapeError::config("invalid subreddit: must not be empty"));
    }
    if name.contains("r/") {
        return Err(ScrapeError::config(format!(
            "invalid subreddit: must not contain r/ ({name} provided)"
        )));
    }
    if !container_re().is_match(name) {
        return Err(ScrapeError::config(format!(
            "invalid subreddit: only letters, digits and '_' allowed ({name} provided)"
        )));
    }
    Ok(())
}

/// Options for scraping one container.
#[derive(Clone, Debug)]
pub struct ScrapeOptions {
    pub container: String,
    pub max_post_count: usize,
    /// Stop once a page reaches posts created before this epoch second.
    pub age_floor: i64,
    pub page_cap: usize,
    pub progress: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            container: String::new(),
            max_post_count: DEFAULT_MAX_POST_COUNT,
            age_floor: age_floor_from_days(now_epoch(), DEFAULT_MAX_DAYS),
            page_cap: MAX_PAGE_SIZE,
            progress: false,
        }
    }
}

impl ScrapeOptions {
    pub fn new(container: impl AsRef<str>) -> Self {
        Self::default().with_container(container)
    }
    pub fn with_container(mut self, container: impl AsRef<str>) -> Self {
        self.container = container.as_ref().trim().to_string();
        self
    }
    pub fn with_max_post_count(mut self, n: usize) -> Self {
        self.max_post_count = n;
        self
    }
    pub fn with_age_floor(mut self, epoch_secs: i64) -> Self {
        self.age_floor = epoch_secs;
        self
    }
    pub fn with_max_days(mut self, days: u32) -> Self {
        self.age_floor = age_floor_from_days(now_epoch(), days);
        self
    }
    /// Clamped to `1..=MAX_PAGE_SIZE`.
    pub fn with_page_cap(mut self, cap: usize) -> Self {
        self.page_cap = cap.clamp(1, MAX_PAGE_SIZE);
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_container(&self.container)?;
        if self.max_post_count == 0 {
            return Err(ScrapeError::config("invalid max post count: must be 1 or more (0 provided)"));
        }
        let now = now_epoch();
        if self.age_floor > now {
            return Err(ScrapeError::config(format!(
                "invalid max post age: {} is in the future (now is {now})",
                self.age_floor
            )));
        }
        Ok(())
    }
}

/// Options for a run over several containers.
#[derive(Clone, Debug)]
pub struct HarvestOptions {
    pub containers: Vec<String>,
    pub max_post_count: usize,
    pub max_days: Option<u32>,
    /// Explicit floor in epoch seconds; exclusive with `max_days`.
    pub max_post_age: Option<i64>,
    pub storage_dir: PathBuf,
    pub request_delay: Duration,
    pub user_agent: String,
    pub progress: bool,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            containers: Vec::new(),
            max_post_count: DEFAULT_MAX_POST_COUNT,
            max_days: None,
            max_post_age: None,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            request_delay: DEFAULT_REQUEST_DELAY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            progress: false,
        }
    }
}

impl HarvestOptions {
    pub fn with_containers<I, S>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.containers = iter
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }
    pub fn with_max_post_count(mut self, n: usize) -> Self {
        self.max_post_count = n;
        self
    }
    pub fn with_max_days(mut self, days: u32) -> Self {
        self.max_days = Some(days);
        self
    }
    pub fn with_max_post_age(mut self, epoch_secs: i64) -> Self {
        self.max_post_age = Some(epoch_secs);
        self
    }
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }
    /// Flag value, then `STORAGE_PATH`, then `./results`.
    pub fn with_storage_dir_or_env(self, flag: Option<PathBuf>) -> Self {
        let env = std::env::var(STORAGE_PATH_ENV).ok().filter(|s| !s.trim().is_empty());
        let dir = flag
            .or_else(|| env.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));
        self.with_storage_dir(dir)
    }
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }

    /// Age floor in epoch seconds relative to `now`.
    pub fn age_floor(&self, now: i64) -> i64 {
        match (self.max_days, self.max_post_age) {
            (_, Some(floor)) => floor,
            (Some(days), None) => age_floor_from_days(now, days),
            (None, None) => age_floor_from_days(now, DEFAULT_MAX_DAYS),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.containers.is_empty() {
            return Err(ScrapeError::config("at least one subreddit is required"));
        }
        if self.max_days.is_some() && self.max_post_age.is_some() {
            return Err(ScrapeError::config(
                "cannot specify both max days and max post age - use only one",
            ));
        }
        if self.max_days == Some(0) {
            return Err(ScrapeError::config("invalid max days: must be a positive number (0 provided)"));
        }
        if self.max_post_count == 0 {
            return Err(ScrapeError::config("invalid max post count: must be 1 or more (0 provided)"));
        }
        let now = now_epoch();
        if let Some(floor) = self.max_post_age {
            if floor > now {
                return Err(ScrapeError::config(format!(
                    "invalid max post age: {floor} is in the future (now is {now})"
                )));
            }
        }
        for c in &self.containers {
            validate_container(c)?;
        }
        Ok(())
    }

    /// Per-container options sharing one age floor for the whole run.
    pub fn scrape_options_for(&self, container: &str, age_floor: i64) -> ScrapeOptions {
        ScrapeOptions::new(container)
            .with_max_post_count(self.max_post_count)
            .with_age_floor(age_floor)
            .with_progress(self.progress)
    }
}
