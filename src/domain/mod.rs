//! Domain layer: entities, errors, and ports.

/// Domain entity definitions.
pub mod entities;
/// Domain error types.
pub mod errors;
/// Port definitions for external collaborators.
pub mod ports;
