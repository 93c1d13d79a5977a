use anyhow::{Context, Result};
use auction_live::engine::{
    bids::BidsClient,
    countdown::CountdownSet,
    poller::{activation_auction_id, BidPoller, SharedAuctionView, DEFAULT_POLL_INTERVAL},
    view::AuctionView,
};
use rust_decimal::Decimal;
use std::{sync::Arc, time::Duration};
use tokio::sync::{watch, RwLock};
use tracing::{error, info};

#[path = "auction_console/ui.rs"]
mod ui;

#[derive(Debug, Clone)]
struct RunConfig {
    base_url: String,
    page_path: String,
    deadlines: Vec<(String, String)>,
    poll_interval: Duration,
    min_bid: Option<Decimal>,
}

impl RunConfig {
    fn from_env() -> Result<Self> {
        let base_url = std::env::var("AUCTION_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/".to_string());
        let page_path =
            std::env::var("AUCTION_PAGE_PATH").unwrap_or_else(|_| "/auction/1".to_string());

        let deadlines = match std::env::var("AUCTION_DEADLINES") {
            Ok(spec) => parse_deadline_list(&spec)?,
            // Demo deadline 90 minutes out so the console has something live.
            Err(_) => vec![(
                "auction".to_string(),
                (chrono::Utc::now() + chrono::Duration::minutes(90)).to_rfc3339(),
            )],
        };

        let poll_interval = std::env::var("AUCTION_POLL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        let min_bid = match std::env::var("AUCTION_MIN_BID") {
            Ok(v) => Some(
                v.trim()
                    .parse::<Decimal>()
                    .context("invalid AUCTION_MIN_BID")?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            base_url,
            page_path,
            deadlines,
            poll_interval,
            min_bid,
        })
    }
}

/// Format: "lot-7=2026-09-01T12:00:00Z,relist=2026-09-02T12:00:00Z"
fn parse_deadline_list(spec: &str) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for part in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (label, raw) = part
            .split_once('=')
            .with_context(|| format!("invalid deadline '{part}', expected LABEL=RFC3339"))?;
        out.push((label.trim().to_string(), raw.trim().to_string()));
    }
    Ok(out)
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cfg = RunConfig::from_env()?;
    let countdowns = CountdownSet::from_deadlines(&cfg.deadlines);
    let view: SharedAuctionView = Arc::new(RwLock::new(AuctionView::default()));
    let (cancel_tx, cancel_rx) = watch::channel(false);

    match activation_auction_id(&cfg.page_path, &countdowns) {
        Some(auction_id) => {
            let client = BidsClient::new(&cfg.base_url)?;
            let poller =
                BidPoller::new(client, auction_id).with_interval(cfg.poll_interval);
            info!(auction_id, "bid auto-refresh enabled");
            let view = Arc::clone(&view);
            tokio::spawn(async move {
                if let Err(e) = poller.run(view, cancel_rx).await {
                    error!(err = %e, "bid poller stopped");
                }
            });
        }
        None => info!("bid auto-refresh disabled (not an active auction page)"),
    }

    ui::run_tui(&cfg.page_path, countdowns, view, cfg.min_bid).await?;

    // Page unload: tear the background loop down with the terminal.
    let _ = cancel_tx.send(true);
    Ok(())
}
