pub mod api;
pub mod app;
pub mod auth;
pub mod community;
pub mod config;
pub mod entities;
pub mod error;
pub mod lifecycle;
pub mod metrics;
pub mod migrator;
pub mod roster;
pub mod telemetry;

pub use sea_orm;
