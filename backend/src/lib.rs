//! # Todo Service
//!
//! A persisted to-do list served over HTTP.
//!
//! Clients create, list, filter, update, toggle and delete short text items.
//! Storage goes through a repository contract with an in-memory backend and a
//! PostgreSQL backend selected by Cargo features.
//!
//! ## Architecture
//!
//! - [`api`]: the stored entity and store inputs
//! - [`db`]: repository contract, errors, configuration, factory and backends
//! - [`http`]: axum router, extractors, handlers and error mapping

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;

#[cfg(feature = "http-server")]
pub mod http;
