// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health and metrics HTTP handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use lingo_common_i18n::ResolutionMode;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{api::AppState, error::ServerError};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
	pub status: String,
	pub timestamp: String,
	pub version: String,
	pub supported_locales: Vec<String>,
	pub default_locale: String,
	pub default_timezone: String,
	pub resolution_mode: ResolutionMode,
	pub users: usize,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
/// GET /health - Liveness plus the active locale configuration.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let locales = state.resolver.locales();

	let response = HealthResponse {
		status: "healthy".to_string(),
		timestamp: chrono::Utc::now().to_rfc3339(),
		version: env!("CARGO_PKG_VERSION").to_string(),
		supported_locales: locales.languages().to_vec(),
		default_locale: locales.default_locale().to_string(),
		default_timezone: locales.default_timezone().to_string(),
		resolution_mode: state.resolver.mode(),
		users: state.users.len(),
	};

	(StatusCode::OK, Json(response))
}

#[utoipa::path(
    get,
    path = "/metrics",
    responses(
        (status = 200, description = "Prometheus metrics", content_type = "text/plain")
    ),
    tag = "health"
)]
/// GET /metrics - Prometheus metrics export endpoint.
///
/// Includes resolution counts per winning source and fallthrough counts per
/// rejected tier.
pub async fn prometheus_metrics(
	State(state): State<AppState>,
) -> Result<impl IntoResponse, ServerError> {
	let metrics = state.metrics.gather()?;
	tracing::debug!("prometheus_metrics: gathered metrics");
	Ok((
		StatusCode::OK,
		[(
			axum::http::header::CONTENT_TYPE,
			"text/plain; version=0.0.4; charset=utf-8",
		)],
		metrics,
	))
}
