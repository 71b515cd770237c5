//! PDF Q&A Library
//!
//! Core library for the PDF question-answer desktop application.

pub mod app;
pub mod document;
pub mod inference;
pub mod qa;
pub mod session;
pub mod storage;
pub mod types;
pub mod ui;
