//! Geometry and ray intersection primitives for `block-testbed`:
//! the coordinate types shared by the renderer, the unit-voxel entry test,
//! and the grid traversal used to intersect rays with sprite masks.
//!
//! This crate does no rendering of its own; see `block-testbed-render`.

#![no_std]
// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![cfg_attr(
    not(test),
    warn(clippy::std_instead_of_core, clippy::std_instead_of_alloc)
)]
#![warn(clippy::missing_inline_in_public_items)]
#![forbid(unsafe_code)]

#[cfg(any(feature = "std", test))]
#[cfg_attr(test, macro_use)]
extern crate std;

pub mod math;

pub mod raycast;

// reexport for convenience of dependents and our tests
#[doc(hidden)]
pub use euclid;
