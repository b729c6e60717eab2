//! Shared domain types for the party favor photo booth.
//!
//! Holds the static theme catalog, the relay wire types, gallery record
//! types, and the data-URI helpers used on both sides of the relay.

pub mod error;
pub mod gallery;
pub mod image;
pub mod theme;
pub mod transform;
