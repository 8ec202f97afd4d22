//! Process execution and git porcelain layer for tagpush.
//!
//! This crate provides:
//! - Subprocess execution with captured output
//! - The porcelain git operations used by a release
//! - Credential masking for logged command lines

mod error;
mod executor;
mod git;

pub use error::{GitError, GitResult};
pub use executor::{CommandRunner, ProcessResult, SystemRunner, mask_userinfo};
pub use git::{Git, Identity};
