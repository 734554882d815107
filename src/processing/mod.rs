//! Auxiliary series features for reporting collaborators.

mod rolling;

pub use rolling::{rolling_baseline, ROLLING_MIN_SAMPLES, ROLLING_WINDOW_DAYS};
