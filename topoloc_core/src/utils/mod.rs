// topoloc_core/src/utils/mod.rs

pub mod distribution;
