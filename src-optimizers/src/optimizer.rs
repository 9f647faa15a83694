use crate::error::Result;
use crate::results::{Callback, OptimizationResults};

/// A black-box minimizer bound to one problem and one set of options
pub trait Optimizer {
    /// Short algorithm name, e.g. `SCEM`
    fn name(&self) -> &'static str;

    /// Install a per-generation callback; returning
    /// [`crate::CallbackAction::Stop`] ends the run
    fn set_callback(&mut self, callback: Callback);

    /// Run until a termination criterion fires
    fn optimize(&mut self) -> Result<OptimizationResults>;
}
