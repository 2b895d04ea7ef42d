//! State

use std::sync::Arc;

use reprice::{solvers::MilpSolver, tiers::TierTable};

/// Per-process state handed to every handler.
///
/// Requests share nothing mutable: each one assembles and solves its own
/// model, so the state only carries configuration and the backend handle.
#[derive(Debug, Clone)]
pub(crate) struct State {
    /// Active tier-to-interval table.
    pub(crate) table: TierTable,

    /// Solver backend used for every request.
    pub(crate) solver: MilpSolver,
}

impl State {
    #[must_use]
    pub(crate) fn new(table: TierTable) -> Self {
        Self {
            table,
            solver: MilpSolver,
        }
    }

    #[must_use]
    pub(crate) fn shared() -> Arc<Self> {
        Arc::new(Self::new(TierTable::default()))
    }
}
