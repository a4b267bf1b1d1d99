//! AI layer
//!
//! - [`decision`]: weighted choice among the carrier's options
//! - [`options`]: builds those options from the match state
//! - [`adaptation`]: score/possession driven slider changes during a match

pub mod adaptation;
pub mod decision;
pub mod options;

use serde::{Deserialize, Serialize};

pub use adaptation::{
    adapt, evaluate_effectiveness, AdaptationInput, AdaptationTrigger, MatchAdaptation, TacticalAdapter,
};
pub use decision::{decide, AIDecision, AIOption, DecisionContext, DecisionOutcome, OptionKind, RiskLevel};
pub use options::build_options;

use crate::tactics::AIProfile;

/// AI control of one team: the profile plus its adaptation throttle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAi {
    pub profile: AIProfile,
    pub adapter: TacticalAdapter,
}

impl TeamAi {
    pub fn new(profile: AIProfile) -> Self {
        Self { profile, adapter: TacticalAdapter::new() }
    }
}
