// crates/cmdgate-config/src/lib.rs
// ============================================================================
// Module: cmdgate Config Library
// Description: Canonical config model and validation for cmdgate.toml.
// Purpose: Single source of truth for command service configuration.
// Dependencies: cmdgate-core, serde, toml
// ============================================================================

//! ## Overview
//! `cmdgate-config` defines the configuration model for a command service:
//! service options, permission failure message formats and audit sink
//! selection. Validation is strict and fails closed.
//!
//! Security posture: config inputs are untrusted; limits are enforced before
//! parsing.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
