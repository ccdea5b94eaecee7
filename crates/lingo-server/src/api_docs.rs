// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI document for the JSON endpoints.

use lingo_common_i18n::{LocaleSource, Resolution, ResolutionMode, TimezoneSource, UserRecord};
use utoipa::OpenApi;

use crate::routes::health::HealthResponse;

#[derive(OpenApi)]
#[openapi(
	info(title = "Lingo", description = "Locale and timezone resolution"),
	paths(
		crate::routes::resolution::get_resolution,
		crate::routes::health::health_check,
		crate::routes::health::prometheus_metrics,
	),
	components(schemas(
		Resolution,
		UserRecord,
		LocaleSource,
		TimezoneSource,
		ResolutionMode,
		HealthResponse,
	)),
	tags(
		(name = "i18n", description = "Locale and timezone resolution"),
		(name = "health", description = "Health and metrics"),
	)
)]
pub struct ApiDoc;
