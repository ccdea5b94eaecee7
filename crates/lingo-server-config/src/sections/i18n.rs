// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale and timezone configuration section.

use lingo_common_i18n::{ResolutionMode, DEFAULT_LOCALE, DEFAULT_TIMEZONE, LOCALES};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct I18nConfigLayer {
	pub languages: Option<Vec<String>>,
	pub default_locale: Option<String>,
	pub default_timezone: Option<String>,
	pub resolution_mode: Option<ResolutionMode>,
}

impl I18nConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.languages.is_some() {
			self.languages = other.languages;
		}
		if other.default_locale.is_some() {
			self.default_locale = other.default_locale;
		}
		if other.default_timezone.is_some() {
			self.default_timezone = other.default_timezone;
		}
		if other.resolution_mode.is_some() {
			self.resolution_mode = other.resolution_mode;
		}
	}

	pub fn finalize(self) -> I18nConfig {
		I18nConfig {
			languages: self
				.languages
				.unwrap_or_else(|| LOCALES.iter().map(|l| l.to_string()).collect()),
			default_locale: self
				.default_locale
				.unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
			default_timezone: self
				.default_timezone
				.unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
			resolution_mode: self.resolution_mode.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct I18nConfig {
	/// Supported locales, in preference order for negotiation ties.
	pub languages: Vec<String>,
	pub default_locale: String,
	pub default_timezone: String,
	pub resolution_mode: ResolutionMode,
}

impl Default for I18nConfig {
	fn default() -> Self {
		I18nConfigLayer::default().finalize()
	}
}
