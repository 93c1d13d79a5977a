use crate::engine::bids::BidsClient;
use crate::engine::countdown::CountdownSet;
use crate::engine::page::{auction_id_from_path, is_auction_detail_path};
use crate::engine::view::AuctionView;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tracing::{debug, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

pub type SharedAuctionView = Arc<RwLock<AuctionView>>;

/// Auto-refresh runs only on auction-detail pages that still show at least
/// one countdown (a proxy for "auction open or just closed"). Returns the
/// auction id to poll for, or `None` when the poller should never start.
pub fn activation_auction_id<'a>(page_path: &'a str, countdowns: &CountdownSet) -> Option<&'a str> {
    if !is_auction_detail_path(page_path) || countdowns.is_empty() {
        return None;
    }
    auction_id_from_path(page_path)
}

/// The page's 30-second background refresh of the bid section.
pub struct BidPoller {
    client: BidsClient,
    auction_id: String,
    interval: Duration,
}

impl BidPoller {
    pub fn new(client: BidsClient, auction_id: impl Into<String>) -> Self {
        Self {
            client,
            auction_id: auction_id.into(),
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Poll until cancelled. The request is awaited inside the loop body, so
    /// a new poll can never be issued while the previous one is in flight.
    /// A failed poll is logged and skipped; the view keeps its last good state
    /// with no retry and no backoff.
    pub async fn run(
        self,
        view: SharedAuctionView,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<()> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    match self.client.get_bids(&self.auction_id).await {
                        Ok(update) => {
                            let now = chrono::Utc::now();
                            view.write().await.apply(update, now);
                            debug!(auction_id = %self.auction_id, "bid section refreshed");
                        }
                        Err(e) => {
                            warn!(auction_id = %self.auction_id, err = %e, "bid refresh failed");
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countdowns(n: usize) -> CountdownSet {
        let deadlines: Vec<_> = (0..n)
            .map(|i| (format!("lot{i}"), "2026-09-01T12:00:00Z".to_string()))
            .collect();
        CountdownSet::from_deadlines(&deadlines)
    }

    #[test]
    fn activates_on_detail_page_with_countdown() {
        assert_eq!(
            activation_auction_id("/auction/42", &countdowns(1)),
            Some("42")
        );
    }

    #[test]
    fn stays_off_without_countdown_or_detail_path() {
        assert_eq!(activation_auction_id("/auction/42", &countdowns(0)), None);
        assert_eq!(activation_auction_id("/auctions", &countdowns(1)), None);
        assert_eq!(activation_auction_id("/", &countdowns(1)), None);
    }
}
