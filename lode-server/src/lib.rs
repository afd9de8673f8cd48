//! `lode-server` exposes the lode retrieval pipeline over HTTP: plain text
//! and PDF uploads go in, ranked chunks come back out of `/query`.

pub mod config;
pub mod error;
pub mod extract;
pub mod server;
pub mod telemetry;

pub use config::ServerConfig;
pub use server::{AppState, app_router, run_server};
