//! Tiered pricing.
//!
//! The issuance machine sells through price brackets keyed by how many units
//! have been redeemed so far. Resolution is a pure table lookup; the schedule
//! is static configuration and never changes at runtime.

mod schedule;

pub use schedule::{PriceSchedule, PriceTier};
