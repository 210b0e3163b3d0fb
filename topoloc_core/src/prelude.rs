// topoloc_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::error::{ConfigError, LocalizationError};
pub use crate::estimation::Localizer;
pub use crate::messages::{EncodedReading, FeatureObservation, ModuleInput, Reading};
pub use crate::types::{Belief, LikelihoodTable, NodeId};

// --- Configuration ---
pub use crate::config::{FeatureClassConfig, MapConfig};

// --- Sensor Model & Estimation ---
pub use crate::estimation::filters::{BeliefFilter, FilterState};
pub use crate::estimation::shared::SharedBeliefFilter;
pub use crate::models::likelihood::SensorLikelihoodModel;
