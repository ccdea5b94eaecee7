// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Server error type and its HTTP mapping.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use lingo_common_i18n::I18nError;
use lingo_server_config::ConfigError;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("configuration error: {0}")]
	Config(#[from] ConfigError),

	#[error("locale configuration error: {0}")]
	I18n(#[from] I18nError),

	#[error("metrics error: {0}")]
	Metrics(#[from] prometheus::Error),

	#[error("internal error: {0}")]
	Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: &'static str,
	message: String,
}

impl ServerError {
	fn code(&self) -> &'static str {
		match self {
			Self::Config(_) => "config_error",
			Self::I18n(_) => "i18n_error",
			Self::Metrics(_) => "metrics_error",
			Self::Internal(_) => "internal_error",
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		tracing::error!(error = %self, "request failed");
		let body = ErrorBody {
			error: self.code(),
			message: self.to_string(),
		};
		(StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
	}
}
