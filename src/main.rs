use anyhow::{Context, Result};
use clap::Parser;
use rdump::{
    init_tracing, scrape_many, Credentials, FileStore, HarvestOptions, RedditClient, Throttle,
    DEFAULT_USER_AGENT,
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Incrementally harvest Reddit posts and their comment trees to JSON files")]
struct Args {
    /// Subreddit name(s) without r/, comma-separated
    #[arg(short = 's', long = "subreddit", visible_alias = "subreddits", value_delimiter = ',', required = true)]
    subreddits: Vec<String>,

    /// Maximum number of posts to scrape per subreddit
    #[arg(short = 'p', long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    max_posts: u64,

    /// Number of days back to scrape
    #[arg(short = 'd', long, value_parser = clap::value_parser!(u32).range(1..))]
    max_days: Option<u32>,

    /// Directory to store scraped posts (default: $STORAGE_PATH or ./results)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long, default_value_t = false)]
    verbose: bool,

    /// Pause before every API request, in milliseconds
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Show a progress bar per subreddit
    #[arg(long, default_value_t = false)]
    progress: bool,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,
}

fn main() -> Result<()> {
    // .env never overrides variables already set in the environment.
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut opts = HarvestOptions::default()
        .with_containers(&args.subreddits)
        .with_max_post_count(args.max_posts as usize)
        .with_storage_dir_or_env(args.output.clone())
        .with_request_delay(Duration::from_millis(args.delay_ms))
        .with_user_agent(args.user_agent.clone())
        .with_progress(args.progress);
    if let Some(days) = args.max_days {
        opts = opts.with_max_days(days);
    }
    opts.validate()?;

    let credentials = Credentials::from_env()?;
    let client = RedditClient::new(credentials, &opts.user_agent, Throttle::new(opts.request_delay))
        .context("creating Reddit client")?;
    let store = FileStore::new(&opts.storage_dir);

    let report = scrape_many(&client, &client, &store, &opts)?;

    for outcome in &report.results {
        match &outcome.result {
            Ok(s) => println!(
                "✓ r/{}: {} posts, {} comment fetches, {} unchanged ({})",
                s.container, s.fetched, s.comment_fetches, s.reused, s.stop
            ),
            Err(e) => println!("✗ r/{}: {}", outcome.container, e),
        }
    }
    println!("{} succeeded, {} failed", report.success_count, report.failure_count);

    if report.all_failed() {
        std::process::exit(1);
    }
    Ok(())
}
