// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{http::header::CONTENT_LANGUAGE, response::IntoResponse, Json};
use lingo_common_i18n::{RequestParams, Resolution};

use crate::i18n::ResolvedLocale;

#[utoipa::path(
    get,
    path = "/api/resolution",
    params(RequestParams),
    responses(
        (status = 200, description = "Locale, timezone and user chosen for this request", body = Resolution)
    ),
    tag = "i18n"
)]
/// GET /api/resolution - The resolution outcome for this request as JSON.
pub async fn get_resolution(ResolvedLocale(resolution): ResolvedLocale) -> impl IntoResponse {
	(
		[(CONTENT_LANGUAGE, resolution.locale.clone())],
		Json(resolution),
	)
}
