//! Routing, layout and verification passes.

pub mod layout;
pub mod routing;
pub mod verification;

pub use layout::{
    LayoutStrategy, ReverseTraversalLayout, TrialFinalLayout, TrivialLayout, UndoSwapsLayout,
    layout_for,
};
pub use routing::{RoutingEngine, RoutingOutcome};
pub use verification::{ReplayVerifier, VerificationReport, Violation};
