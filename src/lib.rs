pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod handlers;
pub mod info;
pub mod middleware;
pub mod registration;
pub mod state;

pub use app::app;
pub use state::AppState;
