// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-request locale resolution.
//!
//! [`ResolvedLocale`] runs once per request: query parameters and
//! `Accept-Language` are read, the `login_as` user is looked up, then the
//! shared resolver picks the locale and timezone. It never rejects a request.

use std::convert::Infallible;

use axum::{
	extract::{FromRequestParts, Query},
	http::{header::ACCEPT_LANGUAGE, request::Parts},
};
use lingo_common_i18n::{AcceptLanguage, RequestContext, RequestParams, Resolution, UserDirectory};

use crate::api::AppState;

/// The locale, timezone and user that apply to the current request.
#[derive(Debug, Clone)]
pub struct ResolvedLocale(pub Resolution);

impl FromRequestParts<AppState> for ResolvedLocale {
	type Rejection = Infallible;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
		let ctx = request_context(parts, &state.users);
		let resolution = state.resolver.resolve(&ctx);
		state.metrics.record(&resolution);
		Ok(Self(resolution))
	}
}

/// Build the [`RequestContext`] for a request. A query string that cannot be
/// decoded is treated as empty.
pub fn request_context(parts: &Parts, users: &UserDirectory) -> RequestContext {
	let params = match Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
		Ok(Query(pairs)) => RequestParams::from_pairs(pairs),
		Err(e) => {
			tracing::debug!(error = %e, "ignoring undecodable query string");
			RequestParams::default()
		}
	};

	let accept_language = parts
		.headers
		.get(ACCEPT_LANGUAGE)
		.and_then(|value| value.to_str().ok())
		.map(AcceptLanguage::parse)
		.unwrap_or_default();

	RequestContext::new(params, accept_language, users)
}
