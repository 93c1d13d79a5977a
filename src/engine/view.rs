use crate::engine::types::{BidRecord, BidUpdate};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

/// How long the current-bid figure keeps the new-bid highlight.
pub const HIGHLIGHT_MS: i64 = 2_000;

/// The bid section of the page as last rendered: bid history plus the current
/// bid. A failed poll never touches it, so it always shows last-known-good
/// server state.
#[derive(Debug, Clone, Default)]
pub struct AuctionView {
    bid_history: Vec<BidRecord>,
    current_bid: Option<Decimal>,
    highlight_until: Option<DateTime<Utc>>,
}

impl AuctionView {
    pub fn bid_history(&self) -> &[BidRecord] {
        &self.bid_history
    }

    pub fn current_bid(&self) -> Option<Decimal> {
        self.current_bid
    }

    /// True while the current-bid figure should carry the transient
    /// new-bid highlight.
    pub fn highlighted(&self, now: DateTime<Utc>) -> bool {
        self.highlight_until.is_some_and(|until| now < until)
    }

    pub fn apply(&mut self, update: BidUpdate, now: DateTime<Utc>) {
        // An empty list means the server had nothing to show, not "clear".
        if let Some(bids) = update.bids {
            if !bids.is_empty() {
                self.bid_history = bids;
            }
        }
        if let Some(amount) = update.current_bid {
            self.current_bid = Some(amount);
            self.highlight_until = Some(now + Duration::milliseconds(HIGHLIGHT_MS));
        }
    }
}
