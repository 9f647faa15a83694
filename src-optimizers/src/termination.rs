use std::fmt;

use serde::{Deserialize, Serialize};

/// Why an optimization run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationSignal {
    /// The evaluation budget is spent
    MaxFunctionEvaluations,
    /// The runtime budget is spent
    MaxRuntime,
    /// The best fitness reached the threshold
    FitnessThreshold,
    /// No sufficient improvement over the early-stopping window
    EarlyStopping,
    /// The user callback returned [`crate::CallbackAction::Stop`]
    Callback,
    /// The search distribution degenerated (NaN/inf in the state)
    NumericalInstability,
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TerminationSignal::MaxFunctionEvaluations => "max function evaluations",
            TerminationSignal::MaxRuntime => "max runtime",
            TerminationSignal::FitnessThreshold => "fitness threshold",
            TerminationSignal::EarlyStopping => "early stopping",
            TerminationSignal::Callback => "callback",
            TerminationSignal::NumericalInstability => "numerical instability",
        };
        f.write_str(s)
    }
}
