//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions and gateway events
//! that are not command invocations.

/// Autocomplete handlers for track searches
pub mod autocomplete;
/// Gateway event handling (voice updates)
pub mod events;
