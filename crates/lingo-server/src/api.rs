// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router.

use std::sync::Arc;

use axum::{routing::get, Router};
use lingo_common_i18n::{LocaleResolver, SupportedLocaleSet, UserDirectory};
use lingo_server_config::ServerConfig;

use crate::{error::ServerError, metrics::ResolutionMetrics, routes};

/// Application state shared across handlers. Everything in it is read-only
/// after startup except the metric counters.
#[derive(Clone)]
pub struct AppState {
	pub resolver: Arc<LocaleResolver>,
	pub users: Arc<UserDirectory>,
	pub metrics: Arc<ResolutionMetrics>,
}

/// Build state from configuration with the reference user directory.
pub fn create_app_state(config: &ServerConfig) -> Result<AppState, ServerError> {
	create_app_state_with_users(config, UserDirectory::fixtures())
}

pub fn create_app_state_with_users(
	config: &ServerConfig,
	users: UserDirectory,
) -> Result<AppState, ServerError> {
	let locales = SupportedLocaleSet::new(
		config.i18n.languages.iter().cloned(),
		config.i18n.default_locale.clone(),
		config.i18n.default_timezone.clone(),
	)?;

	tracing::info!(
		languages = ?locales.languages(),
		mode = %config.i18n.resolution_mode,
		users = users.len(),
		"locale resolver ready"
	);

	Ok(AppState {
		resolver: Arc::new(LocaleResolver::new(
			Arc::new(locales),
			config.i18n.resolution_mode,
		)),
		users: Arc::new(users),
		metrics: Arc::new(ResolutionMetrics::new()?),
	})
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/", get(routes::index::index))
		.route("/api/resolution", get(routes::resolution::get_resolution))
		.route("/api/openapi.json", get(routes::docs::openapi_json))
		.route("/health", get(routes::health::health_check))
		.route("/metrics", get(routes::health::prometheus_metrics))
		.with_state(state)
}
