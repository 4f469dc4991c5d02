//! Clickable-word reading for EPUB and HTML books.
//!
//! Rendered sections are annotated so every word becomes a clickable unit;
//! clicking one highlights it, extracts the surrounding sentence and hands
//! both to the host for translation and read-aloud.

pub mod annotator;
pub mod cache;
pub mod config;
pub mod content;
pub mod epub_loader;
pub mod events;
pub mod reader;
pub mod render;
pub mod settings;
pub mod speech;
pub mod theme;
pub mod translator;
