// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Prometheus counters for resolution outcomes.
//!
//! Fallthroughs are counted separately so that bad stored user preferences
//! show up even though requests never fail because of them.

use lingo_common_i18n::Resolution;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::error::ServerError;

pub struct ResolutionMetrics {
	registry: Registry,
	pub resolutions: IntCounterVec,
	pub fallthroughs: IntCounterVec,
}

impl ResolutionMetrics {
	pub fn new() -> Result<Self, prometheus::Error> {
		let registry = Registry::new();

		let resolutions = IntCounterVec::new(
			Opts::new(
				"lingo_resolutions_total",
				"Resolved values by field and winning source",
			),
			&["field", "source"],
		)?;
		registry.register(Box::new(resolutions.clone()))?;

		let fallthroughs = IntCounterVec::new(
			Opts::new(
				"lingo_resolution_fallthrough_total",
				"Inputs that were present but rejected during resolution",
			),
			&["field", "tier"],
		)?;
		registry.register(Box::new(fallthroughs.clone()))?;

		Ok(Self {
			registry,
			resolutions,
			fallthroughs,
		})
	}

	pub fn record(&self, resolution: &Resolution) {
		self
			.resolutions
			.with_label_values(&["locale", resolution.locale_source.as_str()])
			.inc();
		self
			.resolutions
			.with_label_values(&["timezone", resolution.timezone_source.as_str()])
			.inc();
		for fallthrough in &resolution.fallthroughs {
			self
				.fallthroughs
				.with_label_values(&[fallthrough.field.as_str(), fallthrough.tier.as_str()])
				.inc();
		}
	}

	/// Render all metrics in the Prometheus text format.
	pub fn gather(&self) -> Result<String, ServerError> {
		let mut buffer = Vec::new();
		TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
		String::from_utf8(buffer).map_err(|e| ServerError::Internal(e.to_string()))
	}
}

impl std::fmt::Debug for ResolutionMetrics {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ResolutionMetrics").finish_non_exhaustive()
	}
}
