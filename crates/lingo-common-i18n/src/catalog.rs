// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Gettext catalogs compiled from the `.po` files under `locales/`.

use std::collections::HashMap;

use gettext::Catalog;
use once_cell::sync::Lazy;

const EN_MO: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/en.mo"));
const FR_MO: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/fr.mo"));

const CATALOGS: &[(&str, &[u8])] = &[("en", EN_MO), ("fr", FR_MO)];

const FALLBACK_LOCALE: &str = "en";

static LOADED: Lazy<HashMap<&'static str, Catalog>> = Lazy::new(|| {
	let mut loaded = HashMap::new();
	for (locale, bytes) in CATALOGS {
		match Catalog::parse(*bytes) {
			Ok(catalog) => {
				loaded.insert(*locale, catalog);
			}
			Err(e) => {
				tracing::error!(locale = %locale, error = %e, "failed to parse translation catalog");
			}
		}
	}
	loaded
});

/// Locales that ship a compiled catalog.
pub fn catalog_locales() -> Vec<&'static str> {
	CATALOGS.iter().map(|(locale, _)| *locale).collect()
}

/// Returns true if a translation catalog exists for `locale`.
pub fn has_catalog(locale: &str) -> bool {
	LOADED.contains_key(locale)
}

fn lookup(locale: &str, key: &'static str) -> Option<&'static str> {
	let catalog = LOADED.get(locale)?;
	let translated = catalog.gettext(key);
	// gettext hands the msgid back when there is no entry
	if std::ptr::eq(translated, key) {
		None
	} else {
		Some(translated)
	}
}

/// Translate `key` into `locale`.
///
/// Falls back to the English catalog, then to the key itself.
pub fn t(locale: &str, key: &'static str) -> &'static str {
	lookup(locale, key)
		.or_else(|| lookup(FALLBACK_LOCALE, key))
		.unwrap_or(key)
}

/// Translate `key` and substitute `{name}` placeholders.
///
/// ```
/// use lingo_common_i18n::t_fmt;
///
/// let line = t_fmt("en", "server.index.logged_in_as", &[("username", "Balou")]);
/// assert_eq!(line, "You are logged in as Balou.");
/// ```
pub fn t_fmt(locale: &str, key: &'static str, args: &[(&str, &str)]) -> String {
	let mut text = t(locale, key).to_string();
	for (name, value) in args {
		text = text.replace(&format!("{{{name}}}"), value);
	}
	text
}
