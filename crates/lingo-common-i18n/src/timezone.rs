// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Timezone identifier validation.

use chrono_tz::Tz;

/// Answers whether an identifier names a known timezone.
pub trait TimezoneDatabase: Send + Sync {
	fn is_valid(&self, id: &str) -> bool;
}

/// The IANA database bundled with `chrono-tz`, including backward-compatible
/// links such as `US/Central`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IanaTimezones;

impl TimezoneDatabase for IanaTimezones {
	fn is_valid(&self, id: &str) -> bool {
		is_valid_timezone(id)
	}
}

/// Case-sensitive lookup against the IANA timezone database.
pub fn is_valid_timezone(id: &str) -> bool {
	id.parse::<Tz>().is_ok()
}
