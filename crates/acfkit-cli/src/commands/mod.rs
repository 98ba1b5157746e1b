//! CLI command implementations

pub mod build;
pub mod group;
pub mod init;
pub mod validate;
