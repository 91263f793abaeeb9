//! Foundation types for the Ember front-end.
//!
//! This module provides the fundamental types used throughout the
//! compiler:
//! - [`Position`], [`Span`] - line/column source locations
//!
//! This module has NO dependencies on other ember modules.

mod position;

pub use position::{Position, Span};
