//! Event-day ledger for a wedding feast: ingredient deliveries, guest
//! headcounts and the meal plan, kept in one SQLite file and browsed from a
//! Ratatui front end.
//!
//! The binary only wires these pieces together; tests and scripts can drive
//! the store and the loader directly.
pub mod config;
pub mod db;
pub mod errors;
pub mod loader;
pub mod models;
pub mod ui;

pub use config::{AppConfig, ConfigSource, ListConfig};
pub use db::Store;
pub use errors::{ConfigError, StoreError};
pub use loader::{load_initial_data, SeedReport};
pub use models::{DeliveryStatus, Dish, Ingredient, Invitee, Menu};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
