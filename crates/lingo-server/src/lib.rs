// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Lingo locale resolution server.
//!
//! This crate provides an HTTP server that picks a display locale and
//! timezone for each request from query parameters, a simulated logged-in
//! user and the browser's `Accept-Language` preferences.

pub mod api;
pub mod api_docs;
pub mod error;
pub mod i18n;
pub mod metrics;
pub mod routes;

pub use api::{create_app_state, create_app_state_with_users, create_router, AppState};
pub use api_docs::ApiDoc;
pub use error::ServerError;
pub use i18n::ResolvedLocale;
pub use lingo_server_config::ServerConfig;
pub use metrics::ResolutionMetrics;
