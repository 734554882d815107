//! Maintenance scheduling under budget and downtime constraints.

mod scheduler;

pub use scheduler::build_schedule;
