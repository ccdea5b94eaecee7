// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Internationalization (i18n) support for Lingo.
//!
//! This crate decides which locale and timezone apply to a request and
//! provides the translated strings for that locale. It has no HTTP
//! dependency; the server builds a [`RequestContext`] per request and hands
//! it to a shared [`LocaleResolver`].
//!
//! # Resolution order
//!
//! Locale: `locale` parameter (if supported), the user's stored locale (if
//! supported), `Accept-Language` negotiation, the default locale.
//!
//! Timezone: `timezone` parameter (if valid), the user's stored timezone (if
//! valid), the default timezone.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lingo_common_i18n::{
//! 	t, AcceptLanguage, LocaleResolver, RequestContext, RequestParams, ResolutionMode,
//! 	SupportedLocaleSet, UserDirectory,
//! };
//!
//! let resolver = LocaleResolver::new(Arc::new(SupportedLocaleSet::default()), ResolutionMode::UserPreference);
//! let directory = UserDirectory::fixtures();
//!
//! let params = RequestParams::from_pairs([("login_as", "1")]);
//! let ctx = RequestContext::new(params, AcceptLanguage::parse("en-US,en;q=0.9"), &directory);
//! let resolution = resolver.resolve(&ctx);
//!
//! assert_eq!(resolution.locale, "fr");
//! assert_eq!(resolution.timezone, "Europe/Paris");
//! assert_eq!(t(&resolution.locale, "server.index.header"), "Bonjour monde!");
//! ```

mod catalog;
mod error;
mod locale;
mod negotiate;
mod resolve;
mod timezone;
mod user;

pub use catalog::{catalog_locales, has_catalog, t, t_fmt};
pub use error::{I18nError, Result};
pub use locale::{SupportedLocaleSet, DEFAULT_LOCALE, DEFAULT_TIMEZONE, LOCALES};
pub use negotiate::{AcceptLanguage, LanguageRange};
pub use resolve::{
	resolve_locale, resolve_timezone, Fallthrough, LocaleResolver, LocaleSource, RequestContext,
	RequestParams, Resolution, ResolutionMode, ResolvedField, Tier, TimezoneSource,
};
pub use timezone::{is_valid_timezone, IanaTimezones, TimezoneDatabase};
pub use user::{resolve_user, UserDirectory, UserRecord};
