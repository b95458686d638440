//! Metadata and data layer for a POSIX filesystem backed by a
//! content-addressed, append-only object store (§1).
//!
//! This crate implements the path resolver, permission model, and POSIX
//! operation surface described in §2–§4; the object store itself, the
//! kernel/FUSE bridge, and the CLI launcher are external collaborators
//! (§1). [`fs::Filesystem`] is the entry point: mount it over an
//! [`backend::ObjectStore`] and call its operation methods.

pub mod backend;
pub mod config;
pub mod dirent;
pub mod error;
pub mod fs;
pub mod inode;
pub mod inspector;
pub mod node;
pub mod perm;
pub mod xattr;

pub use backend::{ObjectStore, Ref};
pub use error::{Error, Result};
pub use fs::{Attr, Filesystem};
pub use perm::Caller;
