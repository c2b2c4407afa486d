//! Price schedule resolution.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One price bracket: `unit_price` applies once `threshold` units have been
/// redeemed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTier {
    /// Cumulative redeemed-unit count at which this tier starts.
    pub threshold: u64,
    /// Price per unit within this tier, in the ledger's native coin.
    pub unit_price: Decimal,
}

/// Ordered table of price tiers, ascending by threshold.
///
/// Construction validates ordering once; `resolve` is then pure, total and
/// deterministic. It must be re-evaluated against every fresh issuance
/// snapshot, never cached across refreshes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSchedule {
    tiers: Vec<PriceTier>,
}

impl PriceSchedule {
    /// Build a schedule from tiers already validated by config loading.
    ///
    /// Falls back to the default schedule when `tiers` is empty so that
    /// `resolve` stays total.
    pub fn new(tiers: Vec<PriceTier>) -> Self {
        if tiers.is_empty() {
            return Self::default();
        }
        Self { tiers }
    }

    /// The configured tiers, ascending by threshold.
    pub fn tiers(&self) -> &[PriceTier] {
        &self.tiers
    }

    /// Resolve the unit price for the given redeemed count.
    ///
    /// The tier with the greatest threshold not exceeding `items_redeemed`
    /// wins. Beyond the last threshold the last tier's price applies: a
    /// machine sold through its final tier keeps that price rather than
    /// erroring.
    pub fn resolve(&self, items_redeemed: u64) -> Decimal {
        let mut price = self.tiers[0].unit_price;
        for tier in &self.tiers {
            if tier.threshold <= items_redeemed {
                price = tier.unit_price;
            } else {
                break;
            }
        }
        price
    }
}

impl Default for PriceSchedule {
    /// The deployed machine's schedule: 0.005 for the first 100k units,
    /// 0.01 afterwards.
    fn default() -> Self {
        Self {
            tiers: vec![
                PriceTier {
                    threshold: 0,
                    unit_price: Decimal::new(5, 3),
                },
                PriceTier {
                    threshold: 100_000,
                    unit_price: Decimal::new(1, 2),
                },
            ],
        }
    }
}
