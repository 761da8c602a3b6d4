//! # bpfenv-core
//!
//! Bootstrap primitives for programs that pin objects on bpffs.
//!
//! This crate provides:
//! - **Mount resolution**: locate or establish the bpffs mount point and
//!   derive working directories beneath it.
//! - **Lock limits**: best-effort escalation of `RLIMIT_MEMLOCK`.
//! - **Version discovery**: the libbpf version actually mapped into the
//!   process, with a compile-time fallback.
//! - **Privilege checks**: the effective-uid gate run before any kernel
//!   object operation.
//!
//! Host access goes through the [`mount::MountProbe`] and
//! [`rlimit::LimitSource`] traits so every decision branch is testable
//! without root.

pub mod bootstrap;
pub mod mount;
pub mod path;
pub mod privilege;
pub mod rlimit;
pub mod version;

pub use bootstrap::Bootstrap;
