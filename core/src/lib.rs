// #![warn(clippy::pedantic)]

// #![warn(clippy::nursery)]
// #![warn(clippy::cargo)]
#![warn(clippy::complexity)]
#![warn(clippy::correctness)]
#![warn(clippy::perf)]
#![warn(clippy::style)]
#![warn(clippy::suspicious)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::todo)]
#![warn(clippy::unimplemented)]
#![warn(clippy::dbg_macro)]

// #![warn(clippy::unwrap_used)]
// #![warn(clippy::expect_used)]

//! numpy style slicing of 3D scalar fields held by a volumetric engine that can
//! only cut out axis aligned planes.
//!
//! Index expressions are normalized by [`view::normalize`], then served by
//! [`extract::SliceField`] as a single plane or as a volume stacked from planes.

pub mod component;
pub mod extract;
pub mod geom;
pub mod grid;
pub mod provider;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;
