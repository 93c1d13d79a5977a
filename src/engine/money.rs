use rust_decimal::{Decimal, RoundingStrategy};

/// Dollar-prefixed amount with exactly two decimals, rounding halves away
/// from zero (99.999 -> $100.00, 12.5 -> $12.50).
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${rounded:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn pads_to_two_decimals() {
        assert_eq!(format_usd(dec("12.5")), "$12.50");
        assert_eq!(format_usd(dec("7")), "$7.00");
        assert_eq!(format_usd(dec("0")), "$0.00");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(format_usd(dec("99.999")), "$100.00");
        assert_eq!(format_usd(dec("2.005")), "$2.01");
        assert_eq!(format_usd(dec("2.004")), "$2.00");
    }
}
