//! Pure derivation rules for product pricing and availability.
//!
//! Every write path that touches price inputs or stock must call these
//! before the row is persisted; nothing else is allowed to compute the
//! derived fields.

use crate::models::Availability;

/// Price ceiling: $10M in cents.
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;
pub const MAX_STOCK: i32 = 1_000_000;
pub const MAX_DISCOUNT_PERCENT: f64 = 100.0;

/// Discounted price in cents, rounded to the nearest cent (half away from
/// zero). Rounding cents is exactly rounding the decimal price to 2 places.
pub fn derive_final_price(original_cents: i64, discount_percent: f64) -> i64 {
    let discounted = original_cents as f64 * (1.0 - discount_percent / 100.0);
    discounted.round() as i64
}

/// Availability from stock, honoring the two operator-owned states:
/// `Discontinued` is terminal and never overwritten here, `Preorder` is
/// sticky while stock stays at zero.
pub fn derive_availability(stock: i32, current: Availability) -> Availability {
    if current == Availability::Discontinued {
        return Availability::Discontinued;
    }
    if stock > 0 {
        return Availability::InStock;
    }
    match current {
        Availability::Preorder => Availability::Preorder,
        _ => Availability::OutOfStock,
    }
}

/// Review average is stored rounded to one decimal place.
pub fn round_rating(average: f64) -> f64 {
    (average * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_price_applies_discount() {
        assert_eq!(derive_final_price(100_00, 25.0), 75_00);
        assert_eq!(derive_final_price(1999_99, 0.0), 1999_99);
        assert_eq!(derive_final_price(50_00, 100.0), 0);
        assert_eq!(derive_final_price(0, 50.0), 0);
    }

    #[test]
    fn final_price_rounds_to_nearest_cent() {
        // 3.33 at 50% = 1.665 -> 1.67
        assert_eq!(derive_final_price(333, 50.0), 167);
        // 3.35 at 25% = 2.5125 -> 2.51
        assert_eq!(derive_final_price(335, 25.0), 251);
        // 10.01 at 50% = 5.005 -> 5.01
        assert_eq!(derive_final_price(10_01, 50.0), 5_01);
    }

    #[test]
    fn final_price_is_idempotent() {
        let a = derive_final_price(123_45, 17.5);
        let b = derive_final_price(123_45, 17.5);
        assert_eq!(a, b);
    }

    #[test]
    fn positive_stock_is_in_stock() {
        assert_eq!(
            derive_availability(3, Availability::OutOfStock),
            Availability::InStock
        );
        assert_eq!(
            derive_availability(1, Availability::Preorder),
            Availability::InStock
        );
        assert_eq!(
            derive_availability(1, Availability::InStock),
            Availability::InStock
        );
    }

    #[test]
    fn zero_stock_is_out_of_stock_unless_preorder() {
        assert_eq!(
            derive_availability(0, Availability::InStock),
            Availability::OutOfStock
        );
        assert_eq!(
            derive_availability(0, Availability::OutOfStock),
            Availability::OutOfStock
        );
        assert_eq!(
            derive_availability(0, Availability::Preorder),
            Availability::Preorder
        );
    }

    #[test]
    fn discontinued_is_terminal() {
        assert_eq!(
            derive_availability(0, Availability::Discontinued),
            Availability::Discontinued
        );
        assert_eq!(
            derive_availability(10, Availability::Discontinued),
            Availability::Discontinued
        );
    }

    #[test]
    fn rating_rounds_to_one_decimal() {
        assert_eq!(round_rating(4.26), 4.3);
        assert_eq!(round_rating(4.24), 4.2);
        assert_eq!(round_rating(5.0), 5.0);
    }
}
