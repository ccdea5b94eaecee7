// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum I18nError {
	#[error("supported locale set is empty")]
	EmptyLocaleSet,

	#[error("default locale '{0}' is not in the supported locale set")]
	DefaultLocaleNotSupported(String),

	#[error("default timezone '{0}' is not a recognised timezone")]
	InvalidDefaultTimezone(String),

	#[error("unknown resolution mode '{0}' (expected query_param, login_as or user_preference)")]
	UnknownResolutionMode(String),
}

pub type Result<T> = std::result::Result<T, I18nError>;
