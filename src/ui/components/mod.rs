//! Shared UI building blocks

pub mod banner;
pub mod loading;
