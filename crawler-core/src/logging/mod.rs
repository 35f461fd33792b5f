//! Structured logging for the crawler core.
//!
//! `tracing` events are emitted at state transitions (mission start, arena
//! sealed, boss defeated, death, level up); per-tick paths only log at
//! `trace`. Initialization is idempotent so tests, the headless binary and
//! a host app can all call it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Once;

use serde::{Deserialize, Serialize};
use tracing::span::EnteredSpan;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        })
    }
}

/// Crate areas that can be filtered independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Subsystem {
    Generation,
    Monster,
    Combat,
    World,
    Gameflow,
    Engine,
}

impl Subsystem {
    pub fn target(&self) -> &'static str {
        match self {
            Subsystem::Generation => "crawler_core::generation",
            Subsystem::Monster => "crawler_core::monster",
            Subsystem::Combat => "crawler_core::combat",
            Subsystem::World => "crawler_core::world",
            Subsystem::Gameflow => "crawler_core::gameflow",
            Subsystem::Engine => "crawler_core::engine",
        }
    }
}

/// Subscriber settings; `RUST_LOG` replaces the whole filter when set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub level: LogLevel,
    pub overrides: BTreeMap<Subsystem, LogLevel>,
    pub show_targets: bool,
    /// File and line of each event
    pub show_source: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            overrides: BTreeMap::from([(Subsystem::Gameflow, LogLevel::Debug)]),
            show_targets: true,
            show_source: false,
        }
    }
}

impl TracingConfig {
    /// `EnvFilter` directive string, e.g. `info,crawler_core::gameflow=debug`
    pub fn directives(&self) -> String {
        std::iter::once(self.level.to_string())
            .chain(
                self.overrides
                    .iter()
                    .map(|(subsystem, level)| format!("{}={level}", subsystem.target())),
            )
            .collect::<Vec<_>>()
            .join(",")
    }
}

static TRACING_INIT: Once = Once::new();

pub fn init_tracing_default() {
    init_tracing(&TracingConfig::default());
}

/// Install the global subscriber; the first call wins
pub fn init_tracing(config: &TracingConfig) {
    let config = config.clone();
    TRACING_INIT.call_once(move || {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.directives()));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(config.show_targets)
            .with_file(config.show_source)
            .with_line_number(config.show_source)
            .compact();

        // a host app may have installed its own subscriber already
        let _ = subscriber.try_init();
    });
}

/// Debug span around one simulation stage; closes when the guard drops
pub fn stage_span(stage: &'static str) -> EnteredSpan {
    tracing::debug_span!("stage", stage).entered()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_display() {
        assert_eq!(LogLevel::Trace.to_string(), "trace");
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert!(LogLevel::Debug < LogLevel::Error);
    }

    #[test]
    fn test_default_directives() {
        assert_eq!(
            TracingConfig::default().directives(),
            "info,crawler_core::gameflow=debug"
        );
    }

    #[test]
    fn test_overrides_in_target_order() {
        let config = TracingConfig {
            level: LogLevel::Warn,
            overrides: BTreeMap::from([
                (Subsystem::World, LogLevel::Trace),
                (Subsystem::Generation, LogLevel::Info),
            ]),
            ..TracingConfig::default()
        };
        assert_eq!(
            config.directives(),
            "warn,crawler_core::generation=info,crawler_core::world=trace"
        );
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: TracingConfig =
            serde_json::from_str(r#"{ "overrides": { "Monster": "Trace" } }"#).unwrap();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.overrides.get(&Subsystem::Monster), Some(&LogLevel::Trace));
        assert!(config.show_targets);
    }

    #[test]
    fn test_init_tracing_idempotent() {
        init_tracing_default();
        init_tracing(&TracingConfig {
            level: LogLevel::Trace,
            ..TracingConfig::default()
        });
        let _stage = stage_span("test");
    }
}
