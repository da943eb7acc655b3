//! Ember Core - Foundational types for the Ember particle simulation
//!
//! This crate provides the types that all other Ember crates depend on:
//! - `Vec3` - World-space vectors with the arithmetic the integrator needs
//! - `Color` - 8-bit RGBA particle color
//! - Error types and Result alias

mod error;
mod types;

pub use error::{EmberError, Result};
pub use types::{Color, Vec3};
