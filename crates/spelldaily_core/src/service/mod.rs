//! Core use-case services.
//!
//! # Responsibility
//! - Sampling, eviction and rotation orchestration over repository traits.
//! - Keep CLI/trigger layers decoupled from storage details.

pub mod evictor;
pub mod rotation;
pub mod sampler;
