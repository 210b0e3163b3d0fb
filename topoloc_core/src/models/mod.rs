// topoloc_core/src/models/mod.rs

pub mod likelihood;
