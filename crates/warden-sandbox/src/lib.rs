//! # warden-sandbox
//!
//! Path sandboxing for Warden.
//!
//! Every filesystem operation in the system goes through this crate first.
//! [`AllowedRoots`] holds the operator-configured directory allow-list,
//! fixed at startup. [`PathValidator::validate`] turns an untrusted,
//! caller-supplied path into a [`ValidatedPath`] — or refuses. The
//! constructor of [`ValidatedPath`] is crate-private, so holding one is
//! proof the path was checked, symlinks included.

pub mod error;
pub mod roots;
pub mod validate;

pub use error::SandboxError;
pub use roots::AllowedRoots;
pub use validate::{PathValidator, ValidatedPath};
