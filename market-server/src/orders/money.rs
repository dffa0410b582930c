//! Money calculation for orders
//!
//! All amounts are `Decimal`. The service fee is fixed at creation time and
//! never recomputed.

use rust_decimal::prelude::*;
use shared::order::FeeQuote;

use crate::orders::traits::OrderError;

/// Platform fee rate (5%)
pub const SERVICE_FEE_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Card processing estimate: 2.9% of the charged amount plus 0.30
const PROCESSING_FEE_RATE: Decimal = Decimal::from_parts(29, 0, 0, false, 3);
const PROCESSING_FEE_FIXED: Decimal = Decimal::from_parts(30, 0, 0, false, 2);

/// Maximum accepted package price
const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Pricing copied onto an order when it is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderPricing {
    pub price: Decimal,
    pub service_fee: Decimal,
    pub total_amount: Decimal,
}

/// `round(price * 0.05)` in whole currency units, half away from zero
pub fn service_fee(price: Decimal) -> Decimal {
    (price * SERVICE_FEE_RATE).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Price, fee and total for a package price
pub fn price_order(price: Decimal) -> Result<OrderPricing, OrderError> {
    if price <= Decimal::ZERO {
        return Err(OrderError::InvalidInput(format!(
            "package price must be positive, got {price}"
        )));
    }
    if price > MAX_PRICE {
        return Err(OrderError::InvalidInput(format!(
            "package price exceeds maximum allowed ({MAX_PRICE}), got {price}"
        )));
    }
    let service_fee = service_fee(price);
    Ok(OrderPricing {
        price,
        service_fee,
        total_amount: price + service_fee,
    })
}

/// Fee breakdown shown before checkout, in the same terms as [`price_order`]
pub fn quote_fees(order_amount: Decimal, currency: &str) -> Result<FeeQuote, OrderError> {
    let pricing = price_order(order_amount)?;
    let processing_fee = (pricing.total_amount * PROCESSING_FEE_RATE + PROCESSING_FEE_FIXED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    Ok(FeeQuote {
        order_amount,
        service_fee: pricing.service_fee,
        processing_fee,
        total_fees: pricing.service_fee + processing_fee,
        total_amount: pricing.total_amount,
        currency: currency.to_lowercase(),
    })
}

/// Amount in the smallest currency unit (cents) for the payment gateway
pub fn to_minor_units(amount: Decimal) -> i64 {
    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_rounds_to_whole_units() {
        assert_eq!(service_fee(Decimal::from(100)), Decimal::from(5));
        assert_eq!(service_fee(Decimal::from(10)), Decimal::ONE); // 0.5 rounds up
        assert_eq!(service_fee(Decimal::from(29)), Decimal::ONE); // 1.45
        assert_eq!(service_fee(Decimal::from(30)), Decimal::from(2)); // 1.5
        assert_eq!(service_fee(Decimal::new(1999, 2)), Decimal::ONE);
    }

    #[test]
    fn test_total_is_price_plus_fee() {
        for raw in [5, 17, 99, 100, 250, 1234, 99_999] {
            let price = Decimal::from(raw);
            let pricing = price_order(price).unwrap();
            assert_eq!(pricing.total_amount, pricing.price + pricing.service_fee);
            assert_eq!(pricing.service_fee, service_fee(price));
        }
    }

    #[test]
    fn test_rejects_non_positive_and_huge_prices() {
        assert!(matches!(
            price_order(Decimal::ZERO),
            Err(OrderError::InvalidInput(_))
        ));
        assert!(matches!(
            price_order(Decimal::from(-5)),
            Err(OrderError::InvalidInput(_))
        ));
        assert!(price_order(Decimal::from(2_000_000)).is_err());
    }

    #[test]
    fn test_fee_quote_matches_order_pricing() {
        let quote = quote_fees(Decimal::from(100), "USD").unwrap();
        assert_eq!(quote.service_fee, Decimal::from(5));
        assert_eq!(quote.total_amount, Decimal::from(105));
        // 105 * 0.029 + 0.30 = 3.345
        assert_eq!(quote.processing_fee, Decimal::new(335, 2));
        assert_eq!(quote.total_fees, Decimal::new(835, 2));
        assert_eq!(quote.currency, "usd");

        assert!(matches!(
            quote_fees(Decimal::ZERO, "usd"),
            Err(OrderError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(to_minor_units(Decimal::from(105)), 10_500);
        assert_eq!(to_minor_units(Decimal::new(1999, 2)), 1_999);
        assert_eq!(to_minor_units(Decimal::new(10005, 3)), 1_001);
    }
}
