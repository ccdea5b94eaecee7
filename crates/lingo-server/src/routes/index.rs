// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The localized landing page.

use std::fmt::Write;

use axum::{
	http::header::CONTENT_LANGUAGE,
	response::{Html, IntoResponse},
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use lingo_common_i18n::{t, t_fmt, Resolution};

use crate::i18n::ResolvedLocale;

/// GET / - Greeting page in the resolved locale, with the current time in the
/// resolved timezone.
pub async fn index(ResolvedLocale(resolution): ResolvedLocale) -> impl IntoResponse {
	let body = render_index(&resolution, Utc::now());
	([(CONTENT_LANGUAGE, resolution.locale)], Html(body))
}

pub fn render_index(resolution: &Resolution, now: DateTime<Utc>) -> String {
	let locale = resolution.locale.as_str();

	let login_line = match &resolution.user {
		Some(user) => t_fmt(locale, "server.index.logged_in_as", &[("username", &user.name)]),
		None => t(locale, "server.index.not_logged_in").to_string(),
	};
	let time_line = t_fmt(
		locale,
		"server.index.current_time",
		&[("current_time", &format_time(locale, &resolution.timezone, now))],
	);

	format!(
		"<!DOCTYPE html>\n\
		 <html lang=\"{lang}\">\n\
		 <head>\n\
		 <meta charset=\"utf-8\">\n\
		 <title>{title}</title>\n\
		 </head>\n\
		 <body>\n\
		 <h1>{header}</h1>\n\
		 <p>{login}</p>\n\
		 <p>{time}</p>\n\
		 </body>\n\
		 </html>\n",
		lang = escape_html(locale),
		title = escape_html(t(locale, "server.index.title")),
		header = escape_html(t(locale, "server.index.header")),
		login = escape_html(&login_line),
		time = escape_html(&time_line),
	)
}

/// Format `now` in `timezone` using the locale's `server.index.time_format`.
pub fn format_time(locale: &str, timezone: &str, now: DateTime<Utc>) -> String {
	let tz: Tz = timezone.parse().unwrap_or(Tz::UTC);
	let local = now.with_timezone(&tz);
	let pattern = t(locale, "server.index.time_format");

	let mut out = String::new();
	if write!(out, "{}", local.format(pattern)).is_err() {
		tracing::warn!(locale, pattern, "invalid time format in catalog");
		out = local.to_rfc3339();
	}
	out
}

pub fn escape_html(s: &str) -> String {
	let mut out = String::with_capacity(s.len());
	for c in s.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(c),
		}
	}
	out
}
