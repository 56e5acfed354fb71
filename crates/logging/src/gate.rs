//! crates/logging/src/gate.rs
//! Emit/suppress decision for a requested log call.
//!
//! Category overrides are consulted before the global threshold, so a noisy
//! category can be opened while global verbosity is reduced and a category
//! can be closed while global logging stays on. The global switch dominates
//! both.

use crate::config::Configuration;
use crate::level::Level;

mod ledger;

pub use ledger::{DuplicateLedger, LEDGER_SWEEP_THRESHOLD, SUPPRESSION_WINDOW};

/// Outcome of a log call.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Decision {
    /// The event passed the gate and was handed to the sink.
    Emitted,
    /// The configuration rejected the event.
    Suppressed,
    /// An identical event was accepted within the suppression window.
    Duplicate,
}

impl Decision {
    /// Reports whether the event reached the sink.
    #[must_use]
    pub const fn is_emitted(self) -> bool {
        matches!(self, Self::Emitted)
    }
}

/// Decides whether a message at `requested` in `category` passes the
/// configuration. Duplicate suppression is a separate step.
///
/// # Examples
///
/// ```
/// use dualog::{Configuration, Environment, Level, gate::should_emit};
///
/// let mut config = Configuration::defaults_for(&Environment::from_parts(false, true, false));
/// assert!(!should_emit(&config, None, Level::Info));
///
/// config.categories.insert("net".into(), dualog::CategoryConfig::enabled(Level::Debug));
/// assert!(should_emit(&config, Some("net"), Level::Debug));
/// ```
pub fn should_emit(config: &Configuration, category: Option<&str>, requested: Level) -> bool {
    if !config.enabled || !requested.is_message_level() {
        return false;
    }

    match category.and_then(|name| config.category(name)) {
        Some(category) if !category.enabled => false,
        Some(category) => passes_threshold(requested, category.level),
        None => passes_threshold(requested, config.level),
    }
}

// A Silent threshold already fails the first clause for every message level;
// both clauses are kept so the rule reads the same for any threshold.
const fn passes_threshold(requested: Level, threshold: Level) -> bool {
    (threshold as u8) < (Level::Silent as u8) && (requested as u8) >= (threshold as u8)
}
