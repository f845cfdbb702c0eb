//! Run lifecycle state machine

use std::fmt;

use tracing::{info, warn};

use crate::io::error::{MosaicError, Result};

/// Lifecycle of one mosaic run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Configuration accepted, nothing loaded yet
    Init,
    /// Element catalog and color index are ready
    CatalogBuilt,
    /// Target image decoded and resized to the canvas
    CanvasPrepared,
    /// Region tasks handed to the worker pool
    TilesDispatched,
    /// Every region task finished
    TilesComplete,
    /// Canvas assembled and written to the output path
    Written,
    /// The run stopped on an error
    Failed,
}

impl RunState {
    /// The only state that may follow this one on success
    pub const fn successor(self) -> Option<Self> {
        match self {
            Self::Init => Some(Self::CatalogBuilt),
            Self::CatalogBuilt => Some(Self::CanvasPrepared),
            Self::CanvasPrepared => Some(Self::TilesDispatched),
            Self::TilesDispatched => Some(Self::TilesComplete),
            Self::TilesComplete => Some(Self::Written),
            Self::Written | Self::Failed => None,
        }
    }

    /// Whether no further transition is possible
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Written | Self::Failed)
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::CatalogBuilt => "CATALOG_BUILT",
            Self::CanvasPrepared => "CANVAS_PREPARED",
            Self::TilesDispatched => "TILES_DISPATCHED",
            Self::TilesComplete => "TILES_COMPLETE",
            Self::Written => "WRITTEN",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Enforces the transition order of a run and records its history
#[derive(Debug, Clone)]
pub struct RunTracker {
    history: Vec<RunState>,
}

impl Default for RunTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RunTracker {
    /// Start a run in [`RunState::Init`]
    pub fn new() -> Self {
        Self {
            history: vec![RunState::Init],
        }
    }

    /// Current state
    pub fn state(&self) -> RunState {
        self.history.last().copied().unwrap_or(RunState::Init)
    }

    /// Every state visited so far, oldest first
    pub fn history(&self) -> &[RunState] {
        &self.history
    }

    /// Move to `next`, which must be the successor of the current state
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if `next` would skip or repeat a state.
    pub fn advance(&mut self, next: RunState) -> Result<()> {
        let current = self.state();
        if current.successor() != Some(next) {
            return Err(MosaicError::InvalidTransition {
                from: current,
                to: next,
            });
        }
        info!(from = %current, to = %next, "run state transition");
        self.history.push(next);
        Ok(())
    }

    /// Record a terminal failure; a finished run stays finished
    pub fn fail(&mut self) {
        let current = self.state();
        if current.is_terminal() {
            return;
        }
        warn!(state = %current, "run failed");
        self.history.push(RunState::Failed);
    }
}
