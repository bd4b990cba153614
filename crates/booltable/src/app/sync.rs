//! Keeping the option text and the navigation location in agreement.

use std::str::FromStr;
use std::sync::mpsc::Receiver;

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::errors::SyncError;
use crate::domain::model::HistoryUpdate;
use crate::infra::location::{self, NavigationEvent, Navigator};

/// How the synchronizer decides whether one text contains another.
///
/// The option text is used as a regular expression, so names containing metacharacters can
/// produce surprising judgments. `Pattern` falls back to a literal comparison when the text is
/// not a valid expression; `Strict` reports the error instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum MatchMode {
    #[default]
    Pattern,
    Strict,
    Literal,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Pattern => "pattern",
            MatchMode::Strict => "strict",
            MatchMode::Literal => "literal",
        }
    }
}

impl FromStr for MatchMode {
    type Err = MatchModeParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pattern" | "regex" => Ok(MatchMode::Pattern),
            "strict" => Ok(MatchMode::Strict),
            "literal" | "plain" => Ok(MatchMode::Literal),
            other => Err(MatchModeParseError::UnknownMode(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum MatchModeParseError {
    #[error("unknown match mode '{0}'")]
    UnknownMode(String),
}

/// Writes option text into the navigation history and reads it back on navigation.
#[derive(Debug)]
pub struct LocationSynchronizer<N: Navigator> {
    navigator: N,
    mode: MatchMode,
    current: String,
}

impl<N: Navigator> LocationSynchronizer<N> {
    pub fn new(navigator: N, mode: MatchMode) -> Self {
        let current = read_location(&navigator);
        Self {
            navigator,
            mode,
            current,
        }
    }

    /// Option text held by the location at startup, empty when unavailable.
    pub fn initial_text(&self) -> String {
        read_location(&self.navigator)
    }

    /// Text most recently read from the location.
    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    pub fn subscribe(&mut self) -> Receiver<NavigationEvent> {
        self.navigator.subscribe()
    }

    /// Record a new option text.
    ///
    /// Growing text that ends in a comma, or no longer contains the previous location, pushes a
    /// new entry. Shrinking or same-length text pushes when the previous location does not
    /// contain it. Every non-blank change then overwrites the current entry with the live text.
    /// Text equal to the location is only rewritten, so it is never compiled as a pattern.
    pub fn sync(&mut self, text: &str) -> Result<HistoryUpdate, SyncError> {
        if text.trim().is_empty() {
            return Ok(HistoryUpdate::Skipped);
        }

        self.current = read_location(&self.navigator);
        if text == self.current {
            self.navigator.replace(&location::options_query(text))?;
            return Ok(HistoryUpdate::Replaced);
        }

        let current = self.current.as_str();
        let next = text.strip_suffix(',').unwrap_or(text);

        let push = if text.chars().count() > current.chars().count() {
            text.ends_with(',') || !self.contains(text, current)?
        } else {
            !self.contains(current, text)?
        };

        if push {
            self.navigator.push(&location::options_query(next))?;
            tracing::debug!(previous = %current, pushed = %next, "history entry pushed");
        }
        self.navigator.replace(&location::options_query(text))?;

        Ok(if push {
            HistoryUpdate::Pushed
        } else {
            HistoryUpdate::Replaced
        })
    }

    /// Re-read the location after a back/forward movement.
    pub fn on_navigation(&mut self) -> String {
        self.current = read_location(&self.navigator);
        tracing::debug!(options = %self.current, "restored options from history");
        self.current.clone()
    }

    fn contains(&self, haystack: &str, needle: &str) -> Result<bool, SyncError> {
        match self.mode {
            MatchMode::Literal => Ok(haystack.contains(needle)),
            MatchMode::Strict => pattern_match(haystack, needle),
            MatchMode::Pattern => pattern_match(haystack, needle).or_else(|err| {
                tracing::warn!(error = %err, "falling back to literal comparison");
                Ok(haystack.contains(needle))
            }),
        }
    }
}

fn read_location<N: Navigator>(navigator: &N) -> String {
    navigator
        .location()
        .map(|query| location::read_options(&query))
        .unwrap_or_default()
}

fn pattern_match(haystack: &str, pattern: &str) -> Result<bool, SyncError> {
    Regex::new(pattern)
        .map(|regex| regex.is_match(haystack))
        .map_err(|source| SyncError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })
}
