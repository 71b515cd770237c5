//! UI components for the PDF question-answer window
//!
//! This module contains all user interface components built with Dioxus.

pub mod components;
pub mod qa;

pub use qa::QaView;
