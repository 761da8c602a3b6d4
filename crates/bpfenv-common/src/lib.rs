//! # bpfenv-common
//!
//! Shared types, error definitions, configuration models, and constants
//! used across the entire bpfenv workspace.
//!
//! This crate is the leaf of the dependency graph. It depends on no other
//! internal crate and provides the primitives the resolvers in
//! `bpfenv-core` and the `bpfenv` binary build upon.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
