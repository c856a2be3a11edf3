use anyhow::Context;
use sentanal_lib::models::AnalyzedItem;
use sentanal_lib::services::analysis::{item_confidence_tier, FetchOutcome, ResultsSnapshot};
use sentanal_lib::services::{submit, AnalysisClient, AnalysisService, AppConfig, ConfigStore, ResultsSession};
use std::sync::Arc;
use tracing::info;

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

fn load_config() -> anyhow::Result<AppConfig> {
    match ConfigStore::default_config_dir() {
        Some(dir) => ConfigStore::new(dir).load().map_err(anyhow::Error::msg),
        None => Ok(AppConfig::default()),
    }
}

/// Persist `url` as the service base URL and echo what was stored.
fn set_service_url(url: &str) -> anyhow::Result<()> {
    let dir = ConfigStore::default_config_dir().context("no config directory on this platform")?;
    let store = ConfigStore::new(dir);
    store.set_service_url(url).map_err(anyhow::Error::msg)?;
    let stored = store.get_service_url().map_err(anyhow::Error::msg)?;
    info!(base_url = %stored, "config.service_url_saved");
    println!("Service URL set to {}", stored);
    Ok(())
}

fn print_item(index: usize, item: &AnalyzedItem) {
    let tier = item_confidence_tier(item);
    let score = item.confidence_score.value().unwrap_or(f64::NAN);
    println!("[{}] Tweet: {}", index + 1, item.text.replace('\n', " "));
    println!("    Depression Analysis: {}", item.analysis_label);
    println!("    Confidence: {:.2}% ({}, {})", score, tier.label(), tier.color());
    println!("    Emotion Classification: {}", item.emotion_label);
}

fn print_text(username: &str, snapshot: &ResultsSnapshot) {
    let session = &snapshot.pagination.session;

    println!("Analysis Results");
    println!("{}", session.verdict.message);
    println!();
    println!("@{} on X/Twitter (https://x.com/{})", username, username);

    if let Some(error) = snapshot.profile.flow.error() {
        println!("{}", error);
    }
    if let Some(profile) = &snapshot.profile.profile {
        println!("Bio: {}", profile.bio_or_default());
        println!("Followers: {}", profile.followers_count);
        println!("Following: {}", profile.following_count);
        println!("Joined: {}", profile.joined_display());
    }
    println!();

    if let Some(error) = snapshot.deep_analysis.flow.error() {
        println!("{}", error);
    }
    if let Some(narrative) = &snapshot.deep_analysis.narrative {
        println!("In-Depth Analysis");
        println!("{}", narrative);
        println!();
    }

    println!("Tweet by Tweet Analysis");
    if session.items.is_empty() {
        println!("No results available to display.");
    }
    for (i, item) in session.items.iter().enumerate() {
        print_item(i, item);
    }

    if let Some(error) = snapshot.pagination.fetch.error() {
        println!("{}", error);
    }
    if snapshot.pagination.has_more {
        println!("(more tweets available)");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || has_flag(&args, "--help") {
        eprintln!(
            "Usage:\n  sentanal <username> [--pages <n>] [--deep] [--json] [--url <base_url>]\n  sentanal --set-url <base_url>\n\nNotes:\n  - `--set-url` saves the service URL to the config file (previous file is backed up).\n  - `--url` overrides the service URL for a single run.\n  - `--pages` loads up to n further pages after the first (default 0).\n  - `--deep` requests the in-depth narrative analysis over all loaded tweets.\n  - SENTANAL_API_URL overrides the configured service URL."
        );
        return Ok(());
    }

    sentanal_lib::init_logging();

    if has_flag(&args, "--set-url") {
        let url = parse_arg_value(&args, "--set-url").context("--set-url needs a URL")?;
        return set_service_url(&url);
    }

    let input = args[1].clone();
    let pages: usize = parse_arg_value(&args, "--pages")
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let want_deep = has_flag(&args, "--deep");
    let as_json = has_flag(&args, "--json");

    let mut config = load_config()?;
    if let Some(url) = parse_arg_value(&args, "--url") {
        config.service.base_url = url;
    }

    let client = AnalysisClient::from_config(&config).context("failed to build HTTP client")?;
    info!(base_url = client.base_url(), "service.configured");
    let service: Arc<dyn AnalysisService> = Arc::new(client);

    let payload = match submit(service.as_ref(), &input, config.service.initial_page_size).await {
        Ok(payload) => payload,
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    };

    let session = ResultsSession::bootstrap(service.clone(), payload, config.service.page_size)?;

    let load_pages = async {
        for _ in 0..pages {
            match session.load_more().await {
                FetchOutcome::Appended { .. } => continue,
                _ => break,
            }
        }
    };
    let _ = tokio::join!(session.load_profile(), load_pages);

    if want_deep {
        session.request_deep_analysis().await;
    }

    let snapshot = session.snapshot().await;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_text(session.username(), &snapshot);
    }

    Ok(())
}
