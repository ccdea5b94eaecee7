// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Simulated user directory keyed by the `login_as` query parameter.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A user with optional locale and timezone preferences.
///
/// Stored preferences are not validated; the resolver decides whether to use them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UserRecord {
	pub name: String,
	pub locale: Option<String>,
	pub timezone: Option<String>,
}

impl UserRecord {
	pub fn new(name: impl Into<String>, locale: Option<&str>, timezone: Option<&str>) -> Self {
		Self {
			name: name.into(),
			locale: locale.map(str::to_string),
			timezone: timezone.map(str::to_string),
		}
	}
}

/// Read-only lookup table from numeric id to [`UserRecord`].
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
	users: HashMap<u64, UserRecord>,
}

impl UserDirectory {
	pub fn new(users: impl IntoIterator<Item = (u64, UserRecord)>) -> Self {
		Self {
			users: users.into_iter().collect(),
		}
	}

	/// The four reference users.
	pub fn fixtures() -> Self {
		Self::new([
			(
				1,
				UserRecord::new("Balou", Some("fr"), Some("Europe/Paris")),
			),
			(2, UserRecord::new("Beyonce", Some("en"), Some("US/Central"))),
			(3, UserRecord::new("Spock", Some("kg"), Some("Vulcan"))),
			(4, UserRecord::new("Teletubby", None, Some("Europe/London"))),
		])
	}

	pub fn get(&self, id: u64) -> Option<&UserRecord> {
		self.users.get(&id)
	}

	pub fn len(&self) -> usize {
		self.users.len()
	}

	pub fn is_empty(&self) -> bool {
		self.users.is_empty()
	}
}

/// Look up the user named by a `login_as` value.
///
/// Only plain ASCII decimal digits are accepted. Anything else, including an
/// empty string, a sign, surrounding whitespace or a value too large for `u64`,
/// means "no user".
pub fn resolve_user<'a>(login_as: Option<&str>, directory: &'a UserDirectory) -> Option<&'a UserRecord> {
	let raw = login_as?;
	if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	let id: u64 = raw.parse().ok()?;
	directory.get(id)
}
