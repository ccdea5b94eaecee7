// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The set of locales a deployment serves.

use serde::Serialize;

use crate::error::{I18nError, Result};
use crate::timezone::{IanaTimezones, TimezoneDatabase};

pub const DEFAULT_LOCALE: &str = "en";
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const LOCALES: &[&str] = &["en", "fr"];

/// Ordered supported locales with a designated default locale and timezone.
///
/// Built once at startup and shared read-only between requests. The default
/// locale is always a member and the default timezone is always recognised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportedLocaleSet {
	languages: Vec<String>,
	default_locale: String,
	default_timezone: String,
}

impl SupportedLocaleSet {
	pub fn new(
		languages: impl IntoIterator<Item = impl Into<String>>,
		default_locale: impl Into<String>,
		default_timezone: impl Into<String>,
	) -> Result<Self> {
		Self::with_timezones(languages, default_locale, default_timezone, &IanaTimezones)
	}

	/// Like [`SupportedLocaleSet::new`] but validates the default timezone
	/// against a custom database.
	pub fn with_timezones(
		languages: impl IntoIterator<Item = impl Into<String>>,
		default_locale: impl Into<String>,
		default_timezone: impl Into<String>,
		timezones: &impl TimezoneDatabase,
	) -> Result<Self> {
		let mut deduped: Vec<String> = Vec::new();
		for lang in languages {
			let lang = lang.into();
			if !deduped.contains(&lang) {
				deduped.push(lang);
			}
		}
		let default_locale = default_locale.into();
		let default_timezone = default_timezone.into();

		if deduped.is_empty() {
			return Err(I18nError::EmptyLocaleSet);
		}
		if !deduped.contains(&default_locale) {
			return Err(I18nError::DefaultLocaleNotSupported(default_locale));
		}
		if !timezones.is_valid(&default_timezone) {
			return Err(I18nError::InvalidDefaultTimezone(default_timezone));
		}

		Ok(Self {
			languages: deduped,
			default_locale,
			default_timezone,
		})
	}

	pub fn languages(&self) -> &[String] {
		&self.languages
	}

	pub fn default_locale(&self) -> &str {
		&self.default_locale
	}

	pub fn default_timezone(&self) -> &str {
		&self.default_timezone
	}

	/// Exact, case-sensitive membership.
	pub fn contains(&self, locale: &str) -> bool {
		self.get(locale).is_some()
	}

	/// The set's own copy of `locale`, if it is a member.
	pub fn get(&self, locale: &str) -> Option<&str> {
		self.languages
			.iter()
			.find(|l| l.as_str() == locale)
			.map(String::as_str)
	}
}

impl Default for SupportedLocaleSet {
	fn default() -> Self {
		Self {
			languages: LOCALES.iter().map(|l| l.to_string()).collect(),
			default_locale: DEFAULT_LOCALE.to_string(),
			default_timezone: DEFAULT_TIMEZONE.to_string(),
		}
	}
}
