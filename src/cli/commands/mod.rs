//! CLI command implementations.

mod ask;
mod campaign;
mod combine;
mod config;
mod doctor;
mod join;
mod recap;

pub use ask::run_ask;
pub use campaign::run_campaign;
pub use combine::run_combine;
pub use config::run_config;
pub use doctor::run_doctor;
pub use join::run_join;
pub use recap::run_recap;
