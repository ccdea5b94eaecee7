// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `Accept-Language` parsing and negotiation against a [`SupportedLocaleSet`].
//!
//! Matching runs in three passes, stopping at the first hit:
//!
//! 1. Exact tag match (`*` matches anything).
//! 2. Client tags reduced to their primary subtag (`fr-CA` matches `fr`).
//! 3. Supported locales reduced to their primary subtag (`en` matches `en-US`).
//!
//! Each supported locale is scored by the first client range that matches it,
//! with specific tags checked before `*`. A locale whose first match has weight
//! 0 is refused and stays refused in the fallback passes. Within a pass the
//! highest weight wins; ties go to a specific tag over `*`, then to the earlier
//! supported locale.

use crate::locale::SupportedLocaleSet;

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageRange {
	pub tag: String,
	pub quality: f32,
}

/// A client's weighted language preferences: specific tags before `*`, each
/// group ordered by weight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcceptLanguage {
	ranges: Vec<LanguageRange>,
}

impl AcceptLanguage {
	/// Parse an `Accept-Language` header value. Malformed entries are skipped.
	pub fn parse(header: &str) -> Self {
		let mut ranges = Vec::new();

		for part in header.split(',') {
			let mut components = part.split(';');
			let tag = normalize(components.next().unwrap_or_default());
			if tag.is_empty() {
				continue;
			}

			let mut quality = Some(1.0f32);
			for param in components {
				let param = param.trim();
				if let Some(value) = param.strip_prefix("q=").or_else(|| param.strip_prefix("Q=")) {
					quality = value
						.trim()
						.parse::<f32>()
						.ok()
						.filter(|q| q.is_finite())
						.map(|q| q.clamp(0.0, 1.0));
				}
			}

			if let Some(quality) = quality {
				ranges.push(LanguageRange { tag, quality });
			}
		}

		// stable: equal keys keep header order
		ranges.sort_by(|a, b| {
			is_specific(&b.tag)
				.cmp(&is_specific(&a.tag))
				.then(b.quality.total_cmp(&a.quality))
		});

		Self { ranges }
	}

	pub fn ranges(&self) -> &[LanguageRange] {
		&self.ranges
	}

	pub fn is_empty(&self) -> bool {
		self.ranges.is_empty()
	}

	/// Pick the best supported locale for these preferences.
	pub fn best_match<'a>(&self, supported: &'a SupportedLocaleSet) -> Option<&'a str> {
		let refused: Vec<&'a str> = supported
			.languages()
			.iter()
			.map(String::as_str)
			.filter(|item| {
				let item = normalize(item);
				self.ranges
					.iter()
					.find(|r| matches(&item, &r.tag))
					.is_some_and(|r| r.quality <= 0.0 && is_specific(&r.tag))
			})
			.collect();
		let server: Vec<&'a str> = supported
			.languages()
			.iter()
			.map(String::as_str)
			.filter(|item| !refused.contains(item))
			.collect();

		if let Some(found) = best_of(&self.ranges, &server) {
			return Some(found);
		}

		let primary_ranges = primary_ranges(&self.ranges);
		if let Some(found) = best_of(&primary_ranges, &server) {
			return Some(found);
		}

		let primary_server: Vec<String> = server.iter().map(|s| normalize(primary_subtag(s))).collect();
		let primary_refs: Vec<&str> = primary_server.iter().map(String::as_str).collect();
		let prefix = best_of(&self.ranges, &primary_refs)?;
		server
			.iter()
			.copied()
			.find(|s| normalize(primary_subtag(s)) == prefix)
	}
}

/// Reduce ranges to their primary subtags, keeping the highest weight for each.
fn primary_ranges(ranges: &[LanguageRange]) -> Vec<LanguageRange> {
	let mut reduced: Vec<LanguageRange> = Vec::new();
	for range in ranges {
		let tag = primary_subtag(&range.tag).to_string();
		match reduced.iter_mut().find(|r| r.tag == tag) {
			Some(existing) => existing.quality = existing.quality.max(range.quality),
			None => reduced.push(LanguageRange {
				tag,
				quality: range.quality,
			}),
		}
	}
	reduced.sort_by(|a, b| {
		is_specific(&b.tag)
			.cmp(&is_specific(&a.tag))
			.then(b.quality.total_cmp(&a.quality))
	});
	reduced
}

/// `ranges` must already be ordered specific-first, then by weight.
fn best_of<'a>(ranges: &[LanguageRange], server: &[&'a str]) -> Option<&'a str> {
	let mut result = None;
	let mut best_quality = 0.0f32;
	let mut best_specific = false;

	for &item in server {
		let item_normalized = normalize(item);
		let Some(range) = ranges.iter().find(|r| matches(&item_normalized, &r.tag)) else {
			continue;
		};
		if range.quality <= 0.0 {
			continue;
		}
		let specific = is_specific(&range.tag);
		let better = range.quality > best_quality
			|| (range.quality == best_quality && specific && !best_specific);
		if result.is_none() || better {
			best_quality = range.quality;
			best_specific = specific;
			result = Some(item);
		}
	}

	result
}

fn matches(server: &str, client: &str) -> bool {
	client == "*" || server == client
}

fn is_specific(tag: &str) -> bool {
	tag != "*"
}

fn normalize(tag: &str) -> String {
	tag.trim().replace('_', "-").to_ascii_lowercase()
}

fn primary_subtag(tag: &str) -> &str {
	tag.split(['-', '_']).next().unwrap_or(tag)
}
