use rust_decimal::Decimal;

/// One row of the bid history, as delivered by the server (most-recent-first).
/// Timestamps arrive pre-formatted for display and are not reinterpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidRecord {
    pub bidder_name: String,
    pub timestamp: String,
    pub amount: Decimal,
}

/// Parsed outcome of one bid-history poll. Either field may be absent, which
/// means "nothing to update" for that section, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BidUpdate {
    pub bids: Option<Vec<BidRecord>>,
    pub current_bid: Option<Decimal>,
}
