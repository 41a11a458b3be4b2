//! SkyRoute Manager Library
//!
//! Command implementations behind the `skyroute` binary.

pub mod commands;
