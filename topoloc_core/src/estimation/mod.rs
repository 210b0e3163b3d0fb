// topoloc_core/src/estimation/mod.rs

use crate::error::LocalizationError;
use crate::messages::ModuleInput;
use crate::types::Belief;

/// The contract for any algorithm that performs the "Localizer" role.
/// Its sole responsibility is to estimate which map node the agent occupies.
pub trait Localizer: Send + Sync {
    /// The single, unified method for processing all types of input data.
    /// On error the estimate must be left exactly as it was.
    fn process(&mut self, input: &ModuleInput) -> Result<(), LocalizationError>;

    /// Returns a reference to the current belief over the map nodes.
    fn belief(&self) -> &Belief;
}

pub mod filters;
pub mod shared;
