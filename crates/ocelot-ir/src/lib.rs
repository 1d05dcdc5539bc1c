#![doc = include_str!("../README.md")]

//! Ocelot intermediate representation.
//!
//! This crate defines the word-level expression tree for hardware transition
//! systems, the symbol table used to resolve types, property records with
//! their verification status, and the property normalization pass that runs
//! before bounded instantiation.

pub mod expr;
pub mod normalize;
pub mod properties;
#[cfg(any(test, feature = "proptest"))]
pub mod proptest_generators;
pub mod symbols;
pub mod transition_system;
pub mod types;
