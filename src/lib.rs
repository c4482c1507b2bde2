pub mod assets;
pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod flash;
pub mod form;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod template;

pub use config::Config;
pub use routes::{AppState, router};
