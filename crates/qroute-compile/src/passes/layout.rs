//! Initial layout strategies for the final routing pass.
//!
//! The router always runs a trial pass from the identity mapping. A
//! [`LayoutStrategy`] then decides where the final pass starts.

use qroute_ir::Operation;

use crate::config::WarmStart;
use crate::error::CompileResult;
use crate::mapping::QubitMapping;
use crate::passes::routing::{RoutingEngine, RoutingOutcome};
use crate::scheduler::DependencyScheduler;

/// Derives the initial mapping of the final pass from a trial pass.
pub trait LayoutStrategy: Send + Sync {
    /// Name of the strategy, for logging.
    fn name(&self) -> &'static str;

    /// Compute the adjusted initial mapping.
    ///
    /// `scheduler` is the untouched scheduler of the instance; strategies
    /// that route again must clone or derive from it.
    fn derive(
        &self,
        engine: &RoutingEngine<'_>,
        scheduler: &DependencyScheduler,
        trial: &RoutingOutcome,
    ) -> CompileResult<QubitMapping>;
}

/// Trivial layout.
///
/// Maps logical qubit i to physical qubit i, so the final pass repeats the
/// trial.
pub struct TrivialLayout;

impl LayoutStrategy for TrivialLayout {
    fn name(&self) -> &'static str {
        "TrivialLayout"
    }

    #[allow(clippy::cast_possible_truncation)]
    fn derive(
        &self,
        _engine: &RoutingEngine<'_>,
        _scheduler: &DependencyScheduler,
        trial: &RoutingOutcome,
    ) -> CompileResult<QubitMapping> {
        Ok(QubitMapping::identity(trial.initial_mapping.len() as u32))
    }
}

/// Undo the trial's swaps.
///
/// Walks the trial's operation stream backwards from its final mapping and
/// reverts every `SWAP`. The result is the placement the trial started
/// from, so the final pass reproduces the trial exactly.
pub struct UndoSwapsLayout;

impl LayoutStrategy for UndoSwapsLayout {
    fn name(&self) -> &'static str {
        "UndoSwapsLayout"
    }

    fn derive(
        &self,
        _engine: &RoutingEngine<'_>,
        _scheduler: &DependencyScheduler,
        trial: &RoutingOutcome,
    ) -> CompileResult<QubitMapping> {
        let mut mapping = trial.final_mapping.clone();
        for op in trial.operations.iter().rev() {
            if let Operation::Swap(a, b) = *op {
                mapping.swap(a, b);
            }
        }
        Ok(mapping)
    }
}

/// Start the final pass from the trial pass's final mapping.
pub struct TrialFinalLayout;

impl LayoutStrategy for TrialFinalLayout {
    fn name(&self) -> &'static str {
        "TrialFinalLayout"
    }

    fn derive(
        &self,
        _engine: &RoutingEngine<'_>,
        _scheduler: &DependencyScheduler,
        trial: &RoutingOutcome,
    ) -> CompileResult<QubitMapping> {
        Ok(trial.final_mapping.clone())
    }
}

/// Reverse-traversal layout.
///
/// Routes the circuit backwards (every dependency reversed) starting from the
/// trial's final mapping. Where that backward pass ends is a placement that
/// already suits the first gates of the circuit.
pub struct ReverseTraversalLayout;

impl LayoutStrategy for ReverseTraversalLayout {
    fn name(&self) -> &'static str {
        "ReverseTraversalLayout"
    }

    fn derive(
        &self,
        engine: &RoutingEngine<'_>,
        scheduler: &DependencyScheduler,
        trial: &RoutingOutcome,
    ) -> CompileResult<QubitMapping> {
        let backward = engine.run(scheduler.reversed()?, trial.final_mapping.clone())?;
        Ok(backward.final_mapping)
    }
}

/// The strategy selected by a [`WarmStart`] setting.
pub fn layout_for(warm_start: WarmStart) -> Box<dyn LayoutStrategy> {
    match warm_start {
        WarmStart::Off => Box::new(TrivialLayout),
        WarmStart::UndoSwaps => Box::new(UndoSwapsLayout),
        WarmStart::TrialFinal => Box::new(TrialFinalLayout),
        WarmStart::ReverseTraversal => Box::new(ReverseTraversalLayout),
    }
}
