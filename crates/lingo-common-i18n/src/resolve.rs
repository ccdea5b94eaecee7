// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale and timezone resolution.
//!
//! Every input degrades to the next tier instead of failing, so resolution
//! always produces a supported locale and a recognised timezone. Rejected
//! inputs are recorded as [`Fallthrough`]s and logged; they never change the
//! outcome.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

use crate::error::I18nError;
use crate::locale::SupportedLocaleSet;
use crate::negotiate::AcceptLanguage;
use crate::timezone::{IanaTimezones, TimezoneDatabase};
use crate::user::{resolve_user, UserDirectory, UserRecord};

/// Which inputs take part in resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ResolutionMode {
	/// `locale` parameter, then `Accept-Language`. Timezone is always the default.
	QueryParam,
	/// As `QueryParam`, but the `login_as` user is resolved and reported.
	LoginAs,
	/// Full chain: request parameters, then the user's stored preferences.
	#[default]
	UserPreference,
}

impl ResolutionMode {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::QueryParam => "query_param",
			Self::LoginAs => "login_as",
			Self::UserPreference => "user_preference",
		}
	}

	pub fn reports_user(self) -> bool {
		!matches!(self, Self::QueryParam)
	}

	pub fn uses_preferences(self) -> bool {
		matches!(self, Self::UserPreference)
	}
}

impl fmt::Display for ResolutionMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ResolutionMode {
	type Err = I18nError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"query_param" => Ok(Self::QueryParam),
			"login_as" => Ok(Self::LoginAs),
			"user_preference" => Ok(Self::UserPreference),
			_ => Err(I18nError::UnknownResolutionMode(s.to_string())),
		}
	}
}

impl TryFrom<String> for ResolutionMode {
	type Error = I18nError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum LocaleSource {
	Param,
	User,
	AcceptLanguage,
	Default,
}

impl LocaleSource {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Param => "param",
			Self::User => "user",
			Self::AcceptLanguage => "accept_language",
			Self::Default => "default",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum TimezoneSource {
	Param,
	User,
	Default,
}

impl TimezoneSource {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Param => "param",
			Self::User => "user",
			Self::Default => "default",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedField {
	Locale,
	Timezone,
}

impl ResolvedField {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Locale => "locale",
			Self::Timezone => "timezone",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
	Param,
	User,
}

impl Tier {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Param => "param",
			Self::User => "user",
		}
	}
}

/// An input that was present but rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallthrough {
	pub field: ResolvedField,
	pub tier: Tier,
	pub value: String,
}

/// Query parameters that drive resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct RequestParams {
	/// Requested locale, e.g. `fr`.
	pub locale: Option<String>,
	/// Requested IANA timezone, e.g. `Europe/Paris`.
	pub timezone: Option<String>,
	/// Numeric id of the user to act as.
	pub login_as: Option<String>,
}

impl RequestParams {
	/// Build from decoded query pairs. The first occurrence of a key wins.
	pub fn from_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: Into<String>,
	{
		let mut params = Self::default();
		for (key, value) in pairs {
			let slot = match key.as_ref() {
				"locale" => &mut params.locale,
				"timezone" => &mut params.timezone,
				"login_as" => &mut params.login_as,
				_ => continue,
			};
			if slot.is_none() {
				*slot = Some(value.into());
			}
		}
		params
	}
}

/// Everything known about one request before resolution.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
	pub params: RequestParams,
	pub accept_language: AcceptLanguage,
	pub user: Option<UserRecord>,
}

impl RequestContext {
	/// Resolves the `login_as` user against `directory` once, up front.
	pub fn new(
		params: RequestParams,
		accept_language: AcceptLanguage,
		directory: &UserDirectory,
	) -> Self {
		let user = resolve_user(params.login_as.as_deref(), directory).cloned();
		Self {
			params,
			accept_language,
			user,
		}
	}
}

/// Outcome of resolving one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Resolution {
	pub locale: String,
	pub timezone: String,
	pub user: Option<UserRecord>,
	pub locale_source: LocaleSource,
	pub timezone_source: TimezoneSource,
	#[serde(skip)]
	pub fallthroughs: Vec<Fallthrough>,
}

/// Resolve the display locale for a request.
///
/// Order: supported `locale` parameter, supported user preference,
/// `Accept-Language` negotiation, default locale.
///
/// ```
/// use lingo_common_i18n::{resolve_locale, AcceptLanguage, SupportedLocaleSet};
///
/// let locales = SupportedLocaleSet::default();
/// let accept = AcceptLanguage::parse("fr-CH, fr;q=0.9");
/// assert_eq!(resolve_locale(Some("en"), None, &accept, &locales), "en");
/// assert_eq!(resolve_locale(Some("kg"), None, &accept, &locales), "fr");
/// assert_eq!(resolve_locale(None, None, &AcceptLanguage::default(), &locales), "en");
/// ```
pub fn resolve_locale<'a>(
	param: Option<&str>,
	user: Option<&UserRecord>,
	accept_language: &AcceptLanguage,
	locales: &'a SupportedLocaleSet,
) -> &'a str {
	select_locale(param, user, accept_language, locales, &mut Vec::new()).0
}

/// Resolve the timezone for a request.
///
/// Order: valid `timezone` parameter, valid user preference, default.
/// Invalid identifiers are skipped, never reported as errors.
pub fn resolve_timezone<'a>(
	param: Option<&'a str>,
	user: Option<&'a UserRecord>,
	timezones: &impl TimezoneDatabase,
	default_timezone: &'a str,
) -> &'a str {
	select_timezone(param, user, timezones, default_timezone, &mut Vec::new()).0
}

fn select_locale<'a>(
	param: Option<&str>,
	user: Option<&UserRecord>,
	accept_language: &AcceptLanguage,
	locales: &'a SupportedLocaleSet,
	fallthroughs: &mut Vec<Fallthrough>,
) -> (&'a str, LocaleSource) {
	if let Some(param) = param {
		if let Some(locale) = locales.get(param) {
			return (locale, LocaleSource::Param);
		}
		debug!(locale = %param, "locale parameter not supported, falling through");
		fallthroughs.push(Fallthrough {
			field: ResolvedField::Locale,
			tier: Tier::Param,
			value: param.to_string(),
		});
	}

	if let Some(user) = user {
		if let Some(preferred) = user.locale.as_deref() {
			if let Some(locale) = locales.get(preferred) {
				return (locale, LocaleSource::User);
			}
			warn!(
				user = %user.name,
				locale = %preferred,
				"stored user locale not supported, falling through"
			);
			fallthroughs.push(Fallthrough {
				field: ResolvedField::Locale,
				tier: Tier::User,
				value: preferred.to_string(),
			});
		}
	}

	if let Some(locale) = accept_language.best_match(locales) {
		return (locale, LocaleSource::AcceptLanguage);
	}

	(locales.default_locale(), LocaleSource::Default)
}

fn select_timezone<'a>(
	param: Option<&'a str>,
	user: Option<&'a UserRecord>,
	timezones: &impl TimezoneDatabase,
	default_timezone: &'a str,
	fallthroughs: &mut Vec<Fallthrough>,
) -> (&'a str, TimezoneSource) {
	if let Some(param) = param.filter(|p| !p.is_empty()) {
		if timezones.is_valid(param) {
			return (param, TimezoneSource::Param);
		}
		debug!(timezone = %param, "timezone parameter not recognised, falling through");
		fallthroughs.push(Fallthrough {
			field: ResolvedField::Timezone,
			tier: Tier::Param,
			value: param.to_string(),
		});
	}

	if let Some(user) = user {
		if let Some(preferred) = user.timezone.as_deref().filter(|tz| !tz.is_empty()) {
			if timezones.is_valid(preferred) {
				return (preferred, TimezoneSource::User);
			}
			warn!(
				user = %user.name,
				timezone = %preferred,
				"stored user timezone not recognised, falling through"
			);
			fallthroughs.push(Fallthrough {
				field: ResolvedField::Timezone,
				tier: Tier::User,
				value: preferred.to_string(),
			});
		}
	}

	(default_timezone, TimezoneSource::Default)
}

/// Applies the resolution policy for one [`ResolutionMode`].
///
/// Holds only shared, read-only state and can be used from any number of
/// requests at once.
#[derive(Debug, Clone)]
pub struct LocaleResolver<D = IanaTimezones> {
	locales: Arc<SupportedLocaleSet>,
	mode: ResolutionMode,
	timezones: D,
}

impl LocaleResolver<IanaTimezones> {
	pub fn new(locales: Arc<SupportedLocaleSet>, mode: ResolutionMode) -> Self {
		Self::with_timezones(locales, mode, IanaTimezones)
	}
}

impl<D: TimezoneDatabase> LocaleResolver<D> {
	pub fn with_timezones(locales: Arc<SupportedLocaleSet>, mode: ResolutionMode, timezones: D) -> Self {
		Self {
			locales,
			mode,
			timezones,
		}
	}

	pub fn locales(&self) -> &SupportedLocaleSet {
		&self.locales
	}

	pub fn mode(&self) -> ResolutionMode {
		self.mode
	}

	pub fn resolve(&self, ctx: &RequestContext) -> Resolution {
		let mut fallthroughs = Vec::new();
		let user = if self.mode.reports_user() {
			ctx.user.as_ref()
		} else {
			None
		};
		let preferences = if self.mode.uses_preferences() {
			user
		} else {
			None
		};

		let (locale, locale_source) = select_locale(
			ctx.params.locale.as_deref(),
			preferences,
			&ctx.accept_language,
			&self.locales,
			&mut fallthroughs,
		);

		let (timezone, timezone_source) = if self.mode.uses_preferences() {
			select_timezone(
				ctx.params.timezone.as_deref(),
				preferences,
				&self.timezones,
				self.locales.default_timezone(),
				&mut fallthroughs,
			)
		} else {
			(self.locales.default_timezone(), TimezoneSource::Default)
		};

		debug!(
			locale = %locale,
			locale_source = locale_source.as_str(),
			timezone = %timezone,
			timezone_source = timezone_source.as_str(),
			user = user.map(|u| u.name.as_str()),
			"resolved request locale"
		);

		Resolution {
			locale: locale.to_string(),
			timezone: timezone.to_string(),
			user: user.cloned(),
			locale_source,
			timezone_source,
			fallthroughs,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn locales() -> SupportedLocaleSet {
		SupportedLocaleSet::default()
	}

	fn resolver(mode: ResolutionMode) -> LocaleResolver {
		LocaleResolver::new(Arc::new(locales()), mode)
	}

	fn context(query: &[(&str, &str)], accept: &str) -> RequestContext {
		RequestContext::new(
			RequestParams::from_pairs(query.iter().copied()),
			AcceptLanguage::parse(accept),
			&UserDirectory::fixtures(),
		)
	}

	#[test]
	fn test_supported_param_wins() {
		let set = locales();
		let user = UserRecord::new("x", Some("en"), None);
		let accept = AcceptLanguage::parse("en");
		assert_eq!(resolve_locale(Some("fr"), Some(&user), &accept, &set), "fr");
	}

	#[test]
	fn test_user_preference_when_param_unsupported() {
		let set = locales();
		let user = UserRecord::new("x", Some("fr"), None);
		let accept = AcceptLanguage::parse("en");
		assert_eq!(resolve_locale(Some("de"), Some(&user), &accept, &set), "fr");
	}

	#[test]
	fn test_unsupported_user_locale_falls_to_accept_language() {
		let set = locales();
		let user = UserRecord::new("Spock", Some("kg"), None);
		let accept = AcceptLanguage::parse("fr;q=0.8");
		assert_eq!(resolve_locale(None, Some(&user), &accept, &set), "fr");
	}

	#[test]
	fn test_default_when_nothing_matches() {
		let set = SupportedLocaleSet::new(["en", "fr"], "fr", "UTC").unwrap();
		let accept = AcceptLanguage::parse("ja");
		assert_eq!(resolve_locale(Some(""), None, &accept, &set), "fr");
	}

	#[test]
	fn test_timezone_param_valid() {
		assert_eq!(
			resolve_timezone(Some("Asia/Tokyo"), None, &IanaTimezones, "UTC"),
			"Asia/Tokyo"
		);
	}

	#[test]
	fn test_invalid_timezone_param_falls_to_user() {
		let user = UserRecord::new("Balou", Some("fr"), Some("Europe/Paris"));
		assert_eq!(
			resolve_timezone(Some("Not/AZone"), Some(&user), &IanaTimezones, "UTC"),
			"Europe/Paris"
		);
	}

	#[test]
	fn test_invalid_user_timezone_falls_to_default() {
		let user = UserRecord::new("Spock", Some("kg"), Some("Vulcan"));
		assert_eq!(
			resolve_timezone(None, Some(&user), &IanaTimezones, "UTC"),
			"UTC"
		);
	}

	#[test]
	fn test_empty_timezone_param_is_absent() {
		let mut fallthroughs = Vec::new();
		let (tz, source) = select_timezone(Some(""), None, &IanaTimezones, "UTC", &mut fallthroughs);
		assert_eq!(tz, "UTC");
		assert_eq!(source, TimezoneSource::Default);
		assert!(fallthroughs.is_empty());
	}

	#[test]
	fn test_custom_timezone_database() {
		struct OnlyMars;
		impl TimezoneDatabase for OnlyMars {
			fn is_valid(&self, id: &str) -> bool {
				id == "Mars/Olympus"
			}
		}

		assert_eq!(
			resolve_timezone(Some("Europe/Paris"), None, &OnlyMars, "Mars/Olympus"),
			"Mars/Olympus"
		);
		assert_eq!(
			resolve_timezone(Some("Mars/Olympus"), None, &OnlyMars, "UTC"),
			"Mars/Olympus"
		);
	}

	#[test]
	fn test_mode_parsing() {
		assert_eq!(
			"query_param".parse::<ResolutionMode>(),
			Ok(ResolutionMode::QueryParam)
		);
		assert_eq!(
			"LOGIN_AS".parse::<ResolutionMode>(),
			Ok(ResolutionMode::LoginAs)
		);
		assert_eq!(
			" user_preference ".parse::<ResolutionMode>(),
			Ok(ResolutionMode::UserPreference)
		);
		assert!("full".parse::<ResolutionMode>().is_err());
		assert_eq!(ResolutionMode::default(), ResolutionMode::UserPreference);
	}

	#[test]
	fn test_mode_deserializes_case_insensitively() {
		let mode: ResolutionMode = serde_json::from_str("\"LOGIN_AS\"").unwrap();
		assert_eq!(mode, ResolutionMode::LoginAs);
		assert!(serde_json::from_str::<ResolutionMode>("\"full\"").is_err());
		assert_eq!(
			serde_json::to_string(&ResolutionMode::QueryParam).unwrap(),
			"\"query_param\""
		);
	}

	#[test]
	fn test_params_first_occurrence_wins() {
		let params = RequestParams::from_pairs([
			("locale", "fr"),
			("locale", "en"),
			("other", "x"),
			("login_as", "2"),
		]);
		assert_eq!(params.locale.as_deref(), Some("fr"));
		assert_eq!(params.login_as.as_deref(), Some("2"));
		assert_eq!(params.timezone, None);
	}

	#[test]
	fn test_locale_param_scenario() {
		let resolution = resolver(ResolutionMode::UserPreference).resolve(&context(&[("locale", "fr")], ""));
		assert_eq!(resolution.locale, "fr");
		assert_eq!(resolution.locale_source, LocaleSource::Param);
		assert!(resolution.user.is_none());
	}

	#[test]
	fn test_user_locale_scenario() {
		let resolution = resolver(ResolutionMode::UserPreference).resolve(&context(&[("login_as", "1")], "en"));
		assert_eq!(resolution.locale, "fr");
		assert_eq!(resolution.locale_source, LocaleSource::User);
		assert_eq!(resolution.timezone, "Europe/Paris");
		assert_eq!(resolution.timezone_source, TimezoneSource::User);
	}

	#[test]
	fn test_unsupported_user_locale_scenario() {
		let resolution = resolver(ResolutionMode::UserPreference).resolve(&context(&[("login_as", "3")], "fr"));
		assert_eq!(resolution.locale, "fr");
		assert_eq!(resolution.locale_source, LocaleSource::AcceptLanguage);
		assert_eq!(resolution.timezone, "UTC");
		assert_eq!(
			resolution.fallthroughs,
			vec![
				Fallthrough {
					field: ResolvedField::Locale,
					tier: Tier::User,
					value: "kg".to_string(),
				},
				Fallthrough {
					field: ResolvedField::Timezone,
					tier: Tier::User,
					value: "Vulcan".to_string(),
				},
			]
		);
	}

	#[test]
	fn test_invalid_timezone_param_scenario() {
		let resolution = resolver(ResolutionMode::UserPreference)
			.resolve(&context(&[("timezone", "Not/AZone"), ("login_as", "1")], ""));
		assert_eq!(resolution.timezone, "Europe/Paris");
		assert_eq!(resolution.fallthroughs.len(), 1);
		assert_eq!(resolution.fallthroughs[0].tier, Tier::Param);
	}

	#[test]
	fn test_user_timezone_scenario() {
		let resolution = resolver(ResolutionMode::UserPreference).resolve(&context(&[("login_as", "4")], ""));
		assert_eq!(resolution.timezone, "Europe/London");
		assert_eq!(resolution.locale, "en");
		assert_eq!(resolution.locale_source, LocaleSource::Default);
	}

	#[test]
	fn test_no_input_scenario() {
		let resolution = resolver(ResolutionMode::UserPreference).resolve(&context(&[], ""));
		assert_eq!(resolution.locale, "en");
		assert_eq!(resolution.timezone, "UTC");
		assert_eq!(resolution.locale_source, LocaleSource::Default);
		assert_eq!(resolution.timezone_source, TimezoneSource::Default);
		assert!(resolution.fallthroughs.is_empty());
	}

	#[test]
	fn test_query_param_mode_ignores_user() {
		let resolution = resolver(ResolutionMode::QueryParam)
			.resolve(&context(&[("login_as", "1"), ("timezone", "Asia/Tokyo")], ""));
		assert!(resolution.user.is_none());
		assert_eq!(resolution.locale, "en");
		assert_eq!(resolution.timezone, "UTC");
	}

	#[test]
	fn test_login_as_mode_reports_user_without_preferences() {
		let resolution = resolver(ResolutionMode::LoginAs).resolve(&context(&[("login_as", "1")], ""));
		assert_eq!(resolution.user.as_ref().map(|u| u.name.as_str()), Some("Balou"));
		assert_eq!(resolution.locale, "en");
		assert_eq!(resolution.timezone, "UTC");
	}

	#[test]
	fn test_resolution_serializes_without_fallthroughs() {
		let resolution = resolver(ResolutionMode::UserPreference).resolve(&context(&[("login_as", "3")], ""));
		let json = serde_json::to_value(&resolution).unwrap();
		assert_eq!(json["locale"], "en");
		assert_eq!(json["locale_source"], "default");
		assert_eq!(json["user"]["name"], "Spock");
		assert!(json.get("fallthroughs").is_none());
	}
}

#[cfg(test)]
mod proptests {
	use super::*;
	use proptest::prelude::*;

	fn locale_set() -> impl Strategy<Value = SupportedLocaleSet> {
		proptest::collection::vec("[a-z]{2}(-[A-Z]{2})?", 1..5).prop_flat_map(|langs| {
			let len = langs.len();
			(Just(langs), 0..len).prop_map(|(langs, idx)| {
				let default = langs[idx].clone();
				SupportedLocaleSet::new(langs, default, "UTC").unwrap()
			})
		})
	}

	fn maybe_user() -> impl Strategy<Value = Option<UserRecord>> {
		proptest::option::of(
			(
				"[A-Za-z]{1,10}",
				proptest::option::of("[a-z]{2}"),
				proptest::option::of("[A-Za-z/_]{0,20}"),
			)
				.prop_map(|(name, locale, timezone)| UserRecord {
					name,
					locale,
					timezone,
				}),
		)
	}

	proptest! {
		#[test]
		fn locale_is_always_supported(
			set in locale_set(),
			param in proptest::option::of("[a-zA-Z-]{0,6}"),
			user in maybe_user(),
			header in "[a-zA-Z,;=.*0-9 -]{0,40}",
		) {
			let accept = AcceptLanguage::parse(&header);
			let locale = resolve_locale(param.as_deref(), user.as_ref(), &accept, &set);
			prop_assert!(set.contains(locale));
		}

		#[test]
		fn supported_param_always_wins(
			set in locale_set(),
			pick in any::<prop::sample::Index>(),
			user in maybe_user(),
			header in "[a-zA-Z,;=.*0-9 -]{0,40}",
		) {
			let param = pick.get(set.languages()).clone();
			let accept = AcceptLanguage::parse(&header);
			let locale = resolve_locale(Some(param.as_str()), user.as_ref(), &accept, &set);
			prop_assert_eq!(locale, param.as_str());
		}

		#[test]
		fn timezone_is_always_valid(
			param in proptest::option::of("[A-Za-z/_]{0,20}"),
			user in maybe_user(),
		) {
			let tz = resolve_timezone(param.as_deref(), user.as_ref(), &IanaTimezones, "UTC");
			prop_assert!(crate::timezone::is_valid_timezone(tz));
		}

		#[test]
		fn login_as_never_panics(raw in "\\PC{0,24}") {
			let dir = UserDirectory::fixtures();
			let params = RequestParams::from_pairs([("login_as", raw.as_str())]);
			let ctx = RequestContext::new(params, AcceptLanguage::default(), &dir);
			if let Some(user) = ctx.user {
				prop_assert!(dir.get(raw.parse().unwrap()) == Some(&user));
			}
		}
	}
}
