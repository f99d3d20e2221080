// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and shared CLI setup.

pub mod check_type;
pub mod codec;
pub mod inspect;
pub mod test;

use anyhow::Context;
use harness::HarnessConfig;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// Verbosity maps `0 → warn`, `1 → info`, `2 → debug`, `3+ → trace`;
/// `RUST_LOG`, when set, takes precedence.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration file if one was given, defaults otherwise.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<HarnessConfig> {
    match path {
        Some(path) => {
            let config = HarnessConfig::from_file(path)
                .with_context(|| format!("loading config '{}'", path.display()))?;
            tracing::info!("loaded configuration from {}", path.display());
            Ok(config)
        }
        None => Ok(HarnessConfig::default()),
    }
}

/// Truncates a string to `max_len` characters with an ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("data:image/png;base64,AAAA", 10), "data:im...");
    }

    #[test]
    fn test_default_config() {
        let config = load_config(None).unwrap();
        assert_eq!(config.fetch_timeout_ms, 10_000);
    }
}
