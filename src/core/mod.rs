pub mod buckets;
pub mod metrics;
pub mod risk;
pub mod schedule;
pub mod sessions;
pub mod stats;
pub mod streaks;
