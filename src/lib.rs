//! Alternate-history narrative generator.
//!
//! `engine` holds the generation pipeline (prompt, backend with retry and
//! fallback, sanitizing, analysis, session orchestration); `model` holds the
//! data it passes around; `ui` is the eframe front-end.

pub mod engine;
pub mod model;
pub mod ui;
