//! HTTP request handlers for all API endpoints.
//!
//! This module contains Axum route handlers organized by resource type.
//! Each handler is responsible for:
//! - Request validation and deserialization
//! - Business logic execution via database repositories
//! - Response serialization
//!
//! # Handler Modules
//!
//! - [`partners`]: Partner provisioning, lookup, update, and deletion
//! - [`predictions`]: Prediction request ingestion and history listing
//! - [`summaries`]: Cached partner profile summaries
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`] which automatically converts to
//! appropriate HTTP status codes and error messages.

pub mod partners;
pub mod predictions;
pub mod summaries;
