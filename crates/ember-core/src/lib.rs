//! # ember-core
//! Foundation types, parameters and traits for the Ember emission engine.

pub mod constants;
pub mod error;
pub mod math;
pub mod params;
pub mod traits;
pub mod types;
