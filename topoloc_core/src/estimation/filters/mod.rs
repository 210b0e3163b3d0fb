// topoloc_core/src/estimation/filters/mod.rs

pub mod discrete_bayes;

pub use discrete_bayes::{BeliefFilter, FilterState};
