//! Speed-test HTTP server library.
//!
//! Three stateless endpoints for measuring a network path:
//! - `GET /testfile.bin`: 10 MiB of zero bytes as an attachment
//! - `HEAD /ping`: empty 200 for latency
//! - `POST /upload`: drains the body and answers `Upload complete`
//!
//! [`client::SpeedtestClient`] measures a running server from the other end.

// Core subsystems
pub mod config;
pub mod endpoints;
pub mod http;
pub mod net;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

// Companion client
pub mod client;

pub use client::SpeedtestClient;
pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
