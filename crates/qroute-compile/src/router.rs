//! Two-pass routing driver.

use tracing::{debug, info, instrument};

use qroute_ir::Instance;

use crate::config::RoutingConfig;
use crate::coupling::CouplingGraph;
use crate::distance::DistanceTable;
use crate::error::CompileResult;
use crate::mapping::QubitMapping;
use crate::passes::layout::{LayoutStrategy, layout_for};
use crate::passes::routing::{RoutingEngine, RoutingOutcome};
use crate::scheduler::DependencyScheduler;

/// Routes whole instances.
///
/// A trial pass runs from the identity mapping, the layout strategy derives
/// an adjusted initial mapping from it, and a final pass from that mapping
/// produces the emitted operations.
pub struct Router {
    config: RoutingConfig,
    layout: Box<dyn LayoutStrategy>,
}

impl Router {
    /// Create a router; the layout strategy follows `config.warm_start`.
    pub fn new(config: RoutingConfig) -> CompileResult<Self> {
        config.validate()?;
        let layout = layout_for(config.warm_start);
        Ok(Self { config, layout })
    }

    /// Replace the layout strategy.
    #[must_use]
    pub fn with_layout(mut self, layout: Box<dyn LayoutStrategy>) -> Self {
        self.layout = layout;
        self
    }

    /// The routing configuration.
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Route an instance.
    ///
    /// # Errors
    ///
    /// Fails on malformed instances, cyclic dependencies, and gates whose
    /// operands lie in different components of the coupling graph.
    #[instrument(skip(self, instance), fields(qubits = instance.num_logical(), gates = instance.num_gates()))]
    pub fn route(&self, instance: &Instance) -> CompileResult<RoutingOutcome> {
        instance.validate()?;
        DependencyScheduler::check_acyclic(instance.num_gates(), instance.dependencies())?;

        let graph = CouplingGraph::from_instance(instance)?;
        let distances = DistanceTable::new(&graph);
        let scheduler = DependencyScheduler::new(instance.num_gates(), instance.dependencies())?;
        let engine = RoutingEngine::new(&graph, &distances, instance.gates(), &self.config);

        let trial = engine.run(
            scheduler.clone(),
            QubitMapping::identity(instance.num_physical()),
        )?;
        debug!(
            swaps = trial.swap_count(),
            forced = trial.forced_releases,
            "trial pass complete"
        );

        let adjusted = self.layout.derive(&engine, &scheduler, &trial)?;
        let outcome = if adjusted == trial.initial_mapping {
            trial
        } else {
            let outcome = engine.run(scheduler, adjusted)?;
            debug!(
                swaps = outcome.swap_count(),
                forced = outcome.forced_releases,
                "final pass complete"
            );
            outcome
        };

        info!(
            layout = self.layout.name(),
            swaps = outcome.swap_count(),
            cnots = outcome.cnot_count(),
            "routing complete"
        );
        Ok(outcome)
    }
}

impl Default for Router {
    fn default() -> Self {
        let config = RoutingConfig::default();
        let layout = layout_for(config.warm_start);
        Self { config, layout }
    }
}
