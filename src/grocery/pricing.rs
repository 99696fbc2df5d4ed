//! Cost estimation for the grocery list.

use rand::Rng;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::catalog::GroceryStore;

use super::aggregate::GroceryListEntry;

/// Supplies a unit price for entries that carry none.
pub trait PriceEstimator: Send + Sync {
    fn unit_price(&self, entry: &GroceryListEntry) -> Decimal;
}

/// Draws a placeholder unit price uniformly from `[min, max)` on every call.
///
/// Totals computed with this estimator are not reproducible.
#[derive(Debug, Clone)]
pub struct RandomPriceEstimator {
    min: Decimal,
    max: Decimal,
}

impl RandomPriceEstimator {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }
}

impl PriceEstimator for RandomPriceEstimator {
    fn unit_price(&self, _entry: &GroceryListEntry) -> Decimal {
        let (Some(min), Some(max)) = (self.min.to_f64(), self.max.to_f64()) else {
            return self.min;
        };
        if min >= max {
            return self.min;
        }
        let drawn = rand::thread_rng().gen_range(min..max);
        Decimal::from_f64(drawn)
            .map(|p| p.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
            .unwrap_or(self.min)
    }
}

/// Same placeholder price for every entry.
#[derive(Debug, Clone, Copy)]
pub struct FixedPriceEstimator(pub Decimal);

impl PriceEstimator for FixedPriceEstimator {
    fn unit_price(&self, _entry: &GroceryListEntry) -> Decimal {
        self.0
    }
}

/// Sum of `unit price * amount` over all entries, rounded to cents.
///
/// Stored prices win; the estimator is only consulted for entries without one.
pub fn estimate_total_cost(entries: &[GroceryListEntry], estimator: &dyn PriceEstimator) -> Decimal {
    let total: Decimal = entries
        .iter()
        .map(|entry| {
            let unit_price = entry.price.unwrap_or_else(|| estimator.unit_price(entry));
            let amount = Decimal::from_f64(entry.amount).unwrap_or_default();
            unit_price * amount
        })
        .sum();
    round_cents(total)
}

/// Subtotal plus the store's delivery fee, or plus nothing when no store is chosen.
pub fn order_total(subtotal: Decimal, store: Option<&GroceryStore>) -> Decimal {
    round_cents(subtotal + store.map_or(Decimal::ZERO, |s| s.delivery_fee))
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
