//! HTTP server module for the to-do service.
//!
//! This module provides an axum-based HTTP server that exposes the record
//! store as a small REST API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                              │
//! │  - AppJson / AppPath decoding (422 on malformed input)   │
//! │  - StoreSession: one store handle per request            │
//! │  - CORS, compression, tracing, error mapping             │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                  │
//! │  - LocalRepository / PostgresRepository                  │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, AppError};
pub use router::{create_router, init_app};
pub use state::AppState;
