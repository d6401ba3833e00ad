pub mod app;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod services;

pub use app::{app, AppState};
pub use config::AppConfig;
