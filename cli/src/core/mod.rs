//! # Hey Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the components with real decision logic in `hey`.
//! Everything under `commands` is a thin wrapper that assembles a command
//! line; everything here decides *which* command runs and *where*.
//!
//! ## Architecture
//!
//! - `config`: Config file discovery (walking up to `hey.yml`) and loading
//! - `error`: Error types and the crate-wide `Result` alias
//! - `registry`: The ordered table of interactive/noninteractive operations
//! - `resolve`: Menu number / exact name / prefix resolution
//! - `context`: The object owning config, working directory and registry
//! - `shell`: The interactive menu loop
//! - `tags`: Version tag parsing and next-tag arithmetic
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For locating and loading hey.yml
//! use crate::core::error::{HeyError, Result}; // For error handling
//! use crate::core::registry::{Category, Invocation, Registry}; // For registering commands
//! ```
//!
pub mod config;
pub mod context;
pub mod error;
pub mod registry;
pub mod resolve;
pub mod shell;
pub mod tags;
