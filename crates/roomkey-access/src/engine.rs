//! Hot-reloadable policy engine.
//!
//! Holds the active rule table behind a lock and hands out `Arc` snapshots.
//! An evaluation works on the snapshot it took, so a reload that lands
//! mid-evaluation never mixes rules from two tables.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use roomkey_policy::{Decision, EvaluationContext, RuleTable};
use tracing::info;

use crate::error::{AccessError, Result};

/// The active rule table plus evaluation bookkeeping.
#[derive(Debug)]
pub struct PolicyEngine {
    table: RwLock<Arc<RuleTable>>,
    evaluations: AtomicU64,
}

impl PolicyEngine {
    /// Creates an engine serving `table`.
    pub fn new(table: RuleTable) -> Self {
        Self {
            table: RwLock::new(Arc::new(table)),
            evaluations: AtomicU64::new(0),
        }
    }

    /// Creates an engine serving [`RuleTable::standard`].
    pub fn standard() -> Self {
        Self::new(RuleTable::standard())
    }

    /// Returns the table currently in force.
    pub fn snapshot(&self) -> Result<Arc<RuleTable>> {
        let table = self
            .table
            .read()
            .map_err(|_| AccessError::EngineUnavailable("lock poisoned".to_string()))?;
        Ok(Arc::clone(&table))
    }

    /// Replaces the active table and returns the one it displaced.
    ///
    /// `table` has already been validated by construction, so the swap
    /// itself cannot leave the engine half-updated.
    pub fn reload(&self, table: RuleTable) -> Result<Arc<RuleTable>> {
        let version = table.version().map(str::to_string);
        let rules = table.len();

        let mut slot = self
            .table
            .write()
            .map_err(|_| AccessError::EngineUnavailable("lock poisoned".to_string()))?;
        let previous = std::mem::replace(&mut *slot, Arc::new(table));
        drop(slot);

        info!(
            version = version.as_deref().unwrap_or("unversioned"),
            rules,
            previous_version = previous.version().unwrap_or("unversioned"),
            "Rule table reloaded"
        );
        Ok(previous)
    }

    /// Parses and validates `source`, then swaps it in.
    ///
    /// A source that fails to load leaves the active table untouched.
    pub fn reload_from_str(&self, source: &str) -> Result<Arc<RuleTable>> {
        let table = RuleTable::load(source)?;
        self.reload(table)
    }

    /// Evaluates `context` against the current snapshot.
    pub fn evaluate(&self, context: &EvaluationContext) -> Result<Decision> {
        let table = self.snapshot()?;
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        Ok(roomkey_policy::evaluate(context, &table)?)
    }

    /// Number of evaluations served since construction.
    pub fn evaluations(&self) -> u64 {
        self.evaluations.load(Ordering::Relaxed)
    }
}

impl Default for PolicyEngine {
    fn default() -> Self {
        Self::standard()
    }
}
