use crate::engine::types::{BidRecord, BidUpdate};
use anyhow::{Context, Result};
use reqwest::Url;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Client for the auction site's bid-history endpoint.
#[derive(Clone)]
pub struct BidsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BidsClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).context("invalid auction base url")?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    /// Fetch the bid history for one auction. Mirrors the page's background
    /// refresh request, including the programmatic-request marker header.
    pub async fn get_bids(&self, auction_id: &str) -> Result<BidUpdate> {
        let url = self
            .base_url
            .join(&format!("auction/{auction_id}/bids"))
            .context("build bids url")?;

        let raw: BidsResponse = self
            .http
            .get(url)
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await
            .context("bids request failed")?
            .error_for_status()
            .context("bids non-200")?
            .json()
            .await
            .context("bids json decode failed")?;

        Ok(raw.into_update())
    }
}

#[derive(Debug, Deserialize)]
struct BidsResponse {
    #[serde(default)]
    bids: Option<Vec<BidDto>>,
    #[serde(default)]
    current_bid: Option<CurrentBidDto>,
}

#[derive(Debug, Deserialize)]
struct BidDto {
    bidder_name: String,
    timestamp: String,
    amount: Decimal,
}

#[derive(Debug, Deserialize)]
struct CurrentBidDto {
    amount: Decimal,
}

impl BidsResponse {
    fn into_update(self) -> BidUpdate {
        BidUpdate {
            bids: self.bids.map(|bids| {
                bids.into_iter()
                    .map(|b| BidRecord {
                        bidder_name: b.bidder_name,
                        timestamp: b.timestamp,
                        amount: b.amount,
                    })
                    .collect()
            }),
            current_bid: self.current_bid.map(|c| c.amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_response() {
        let msg = r#"{
          "bids": [
            { "bidder_name": "Alice", "timestamp": "2024-01-01 12:00:00", "amount": 12.5 },
            { "bidder_name": "Bob", "timestamp": "2024-01-01 11:58:21", "amount": 11.0 }
          ],
          "current_bid": { "amount": 12.5 }
        }"#;

        let raw: BidsResponse = serde_json::from_str(msg).unwrap();
        let update = raw.into_update();

        let bids = update.bids.unwrap();
        assert_eq!(bids.len(), 2);
        assert_eq!(bids[0].bidder_name, "Alice");
        assert_eq!(bids[0].timestamp, "2024-01-01 12:00:00");
        assert_eq!(bids[0].amount, "12.5".parse().unwrap());
        // Order stays exactly as received.
        assert_eq!(bids[1].bidder_name, "Bob");
        assert_eq!(update.current_bid, Some("12.5".parse().unwrap()));
    }

    #[test]
    fn missing_fields_mean_nothing_to_update() {
        let raw: BidsResponse = serde_json::from_str("{}").unwrap();
        let update = raw.into_update();
        assert!(update.bids.is_none());
        assert!(update.current_bid.is_none());
    }

    #[test]
    fn empty_bid_list_survives_parsing() {
        let raw: BidsResponse =
            serde_json::from_str(r#"{ "bids": [], "current_bid": { "amount": 3 } }"#).unwrap();
        let update = raw.into_update();
        assert_eq!(update.bids.map(|b| b.len()), Some(0));
        assert_eq!(update.current_bid, Some("3".parse().unwrap()));
    }
}
