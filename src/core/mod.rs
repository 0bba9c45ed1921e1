//! Core business logic - framework-agnostic playlist, editor, and search operations.
//!
//! Nothing in here talks to Discord. Commands in [`crate::bot`] call these
//! functions and turn their outcomes into localized replies.

/// Duration parsing and formatting
pub mod duration;
/// Ownership-gated playlist editing
pub mod editor;
/// Guild locale preference
pub mod language;
/// Per-user track duration caps
pub mod max_length;
/// Playlist persistence
pub mod playlist;
/// Track search policy: filtering, selection, input checks
pub mod search;
