//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`cache`] - Cache inspection (stats)
//! - [`config`] - Configuration management (get, set, list, path)
//! - [`init`] - Configuration initialization
//! - [`plan`] - Dry run (what a warm run would fetch)
//! - [`warm`] - Main command (expand seeds and fetch missing tiles)

pub mod cache;
pub mod common;
pub mod config;
pub mod init;
pub mod plan;
pub mod warm;
