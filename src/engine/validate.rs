use rust_decimal::Decimal;

/// Outcome of checking the bid-amount input. Invalid is a disabled-submit UI
/// state, not an error: it clears as soon as the input does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidValidity {
    Valid,
    Invalid,
}

impl BidValidity {
    pub fn submit_enabled(self) -> bool {
        self == BidValidity::Valid
    }
}

/// A bid is valid iff the input parses as a decimal amount strictly above the
/// minimum bid. A missing minimum defaults to zero.
pub fn validate_bid_amount(raw: &str, min_bid: Option<Decimal>) -> BidValidity {
    let min = min_bid.unwrap_or_default();
    match raw.trim().parse::<Decimal>() {
        Ok(amount) if amount > min => BidValidity::Valid,
        _ => BidValidity::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn above_minimum_is_valid() {
        let v = validate_bid_amount("10.00", Some(dec("5")));
        assert_eq!(v, BidValidity::Valid);
        assert!(v.submit_enabled());
    }

    #[test]
    fn equal_to_minimum_is_invalid() {
        assert_eq!(validate_bid_amount("5.00", Some(dec("5"))), BidValidity::Invalid);
    }

    #[test]
    fn unparseable_is_invalid() {
        assert_eq!(validate_bid_amount("", None), BidValidity::Invalid);
        assert_eq!(validate_bid_amount("abc", None), BidValidity::Invalid);
        assert_eq!(validate_bid_amount("12.3.4", None), BidValidity::Invalid);
    }

    #[test]
    fn minimum_defaults_to_zero() {
        assert_eq!(validate_bid_amount("0.01", None), BidValidity::Valid);
        assert_eq!(validate_bid_amount("0", None), BidValidity::Invalid);
        assert_eq!(validate_bid_amount("-3", None), BidValidity::Invalid);
    }
}
