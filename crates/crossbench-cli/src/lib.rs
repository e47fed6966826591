//! crossbench CLI library
//!
//! This library exposes the command implementations and configuration so
//! they can be tested without spawning the binary.

pub mod commands;
pub mod config;
pub mod exit;
pub mod output;
