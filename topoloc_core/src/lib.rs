// topoloc_core/src/lib.rs

//! Discrete Bayesian localization over the nodes of a topological map.
//!
//! A [`SensorLikelihoodModel`](models::likelihood::SensorLikelihoodModel) holds
//! per-node likelihood tables for each structural feature class. A
//! [`BeliefFilter`](estimation::filters::BeliefFilter) fuses each sensor
//! reading into its belief with Bayes' rule.

// This file defines the public modules of the library.
pub mod config;
pub mod error;
pub mod estimation;
pub mod messages;
pub mod models;
pub mod prelude;
pub mod types;
pub mod utils;
