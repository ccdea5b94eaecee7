// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for Lingo server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`LINGO_SERVER_*`)
//!
//! The resolved [`ServerConfig`] is built once at startup and never mutated.
//!
//! # Usage
//!
//! ```ignore
//! use lingo_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}:{}", config.http.host, config.http.port);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use lingo_common_i18n::is_valid_timezone;
use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub i18n: I18nConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`LINGO_SERVER_*`)
/// 2. Config file (`/etc/lingo/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	];
	load_from_sources(sources)
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	let mut merged = ServerConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	];
	load_from_sources(sources)
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let i18n = layer.i18n.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&i18n)?;

	info!(
		host = %http.host,
		port = http.port,
		languages = ?i18n.languages,
		default_locale = %i18n.default_locale,
		default_timezone = %i18n.default_timezone,
		resolution_mode = %i18n.resolution_mode,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		i18n,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(i18n: &I18nConfig) -> Result<(), ConfigError> {
	if i18n.languages.is_empty() {
		return Err(ConfigError::Validation(
			"LINGO_SERVER_LANGUAGES must name at least one locale".to_string(),
		));
	}

	if !i18n.languages.contains(&i18n.default_locale) {
		return Err(ConfigError::Validation(format!(
			"default locale '{}' is not one of the supported languages {:?}",
			i18n.default_locale, i18n.languages
		)));
	}

	if !is_valid_timezone(&i18n.default_timezone) {
		return Err(ConfigError::Validation(format!(
			"default timezone '{}' is not a recognised IANA timezone",
			i18n.default_timezone
		)));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use lingo_common_i18n::ResolutionMode;

	#[test]
	fn test_default_config_is_valid() {
		assert!(validate_config(&I18nConfig::default()).is_ok());
	}

	#[test]
	fn test_empty_languages_rejected() {
		let i18n = I18nConfig {
			languages: vec![],
			..Default::default()
		};
		let result = validate_config(&i18n);
		assert!(result.unwrap_err().to_string().contains("at least one"));
	}

	#[test]
	fn test_default_locale_must_be_supported() {
		let i18n = I18nConfig {
			default_locale: "de".to_string(),
			..Default::default()
		};
		let result = validate_config(&i18n);
		assert!(result.unwrap_err().to_string().contains("'de'"));
	}

	#[test]
	fn test_default_timezone_must_be_valid() {
		let i18n = I18nConfig {
			default_timezone: "Vulcan".to_string(),
			..Default::default()
		};
		let result = validate_config(&i18n);
		assert!(result.unwrap_err().to_string().contains("Vulcan"));
	}

	#[test]
	fn test_finalize_applies_layers() {
		let layer: ServerConfigLayer = toml::from_str(
			r#"
			[http]
			port = 8080

			[i18n]
			languages = ["fr", "en"]
			default_locale = "fr"
			resolution_mode = "login_as"
			"#,
		)
		.unwrap();
		let config = finalize(layer).unwrap();
		assert_eq!(config.http.port, 8080);
		assert_eq!(config.http.host, "0.0.0.0");
		assert_eq!(config.i18n.default_locale, "fr");
		assert_eq!(config.i18n.default_timezone, "UTC");
		assert_eq!(config.i18n.resolution_mode, ResolutionMode::LoginAs);
		assert_eq!(config.logging.level, "info");
	}

	#[test]
	fn test_finalize_rejects_invalid_layer() {
		let layer: ServerConfigLayer =
			toml::from_str("[i18n]\ndefault_timezone = \"Not/AZone\"").unwrap();
		assert!(matches!(
			finalize(layer),
			Err(ConfigError::Validation(_))
		));
	}

	#[test]
	fn test_load_config_from_env() {
		std::env::set_var("LINGO_SERVER_PORT", "8123");
		std::env::set_var("LINGO_SERVER_LANGUAGES", "fr, en");
		std::env::set_var("LINGO_SERVER_DEFAULT_LOCALE", "fr");
		std::env::set_var("LINGO_SERVER_RESOLUTION_MODE", "Query_Param");

		let result = load_config_from_env();

		std::env::set_var("LINGO_SERVER_PORT", "not-a-port");
		let invalid = load_config_from_env();

		for name in [
			"LINGO_SERVER_PORT",
			"LINGO_SERVER_LANGUAGES",
			"LINGO_SERVER_DEFAULT_LOCALE",
			"LINGO_SERVER_RESOLUTION_MODE",
		] {
			std::env::remove_var(name);
		}

		let config = result.unwrap();
		assert_eq!(config.http.port, 8123);
		assert_eq!(config.http.host, "0.0.0.0");
		assert_eq!(config.i18n.languages, vec!["fr".to_string(), "en".to_string()]);
		assert_eq!(config.i18n.default_locale, "fr");
		assert_eq!(config.i18n.resolution_mode, ResolutionMode::QueryParam);
		assert!(matches!(
			invalid,
			Err(ConfigError::InvalidValue { ref key, .. }) if key == "LINGO_SERVER_PORT"
		));
	}

	#[test]
	fn test_socket_addr() {
		let config = ServerConfig {
			http: HttpConfig {
				host: "127.0.0.1".to_string(),
				port: 9000,
			},
			i18n: I18nConfig::default(),
			logging: LoggingConfig::default(),
		};
		assert_eq!(config.socket_addr(), "127.0.0.1:9000");
	}
}
