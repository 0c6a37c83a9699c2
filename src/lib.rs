mod api;
mod batch;
mod config;
mod date;
mod error;
mod flatten;
mod models;
mod multi;
mod progress;
mod scrape;
mod store;
mod throttle;
mod util;

pub use crate::error::{ErrorKind, Result, ScrapeError};
pub use crate::models::{
    Comment, CommentData, CommentListing, CommentNode, Listing, ListingData, ListingPage, MoreData, Post,
    PostData, PostKey, PostListing, Replies, Thing, STRIPPED_FIELDS,
};

// Ingestion engine.
pub use crate::flatten::{flatten_comments, flatten_nodes, FlattenStats};
pub use crate::batch::{plan_comments, process_batch, BatchContext, BatchOutcome, CommentPlan};
pub use crate::scrape::{next_page_size, paginate, scrape_container, stop_reason, ScrapeSummary, StopReason};
pub use crate::multi::{scrape_many, ContainerOutcome, HarvestReport};

// Storage.
pub use crate::store::{FileStore, MemoryStore, RecordStore};

// API access.
pub use crate::api::{
    parse_comments_response, CommentQuery, CredentialProvider, Credentials, RedditApi, RedditClient,
    CLIENT_ID_ENV, DEFAULT_API_BASE, DEFAULT_AUTH_BASE, DEFAULT_USER_AGENT, SECRET_ENV,
};
pub use crate::throttle::{Throttle, DEFAULT_REQUEST_DELAY};

// Options.
pub use crate::config::{
    validate_container, HarvestOptions, ScrapeOptions, DEFAULT_MAX_POST_COUNT, DEFAULT_STORAGE_DIR,
    MAX_PAGE_SIZE, STORAGE_PATH_ENV,
};
pub use crate::date::{age_floor_from_days, epoch_to_rfc3339, now_epoch, DEFAULT_MAX_DAYS, SECS_PER_DAY};

// Binary helpers.
pub use crate::util::{init_tracing, write_file_atomic};
