//! CLI commands

pub mod format;
pub mod learn;
pub mod propose;
pub mod verify;
