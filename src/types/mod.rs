//! Shared type definitions
//!
//! Configuration structures shared by the loader, the engine and the settings store.

pub mod config;
