//! # resume-forge – data-driven resume → HTML → PDF
//!
//! A build run moves a resume document through these stages:
//!
//! 1. **Load** – YAML/JSON data file → mapping ([`data`])
//! 2. **Render** – Jinja template expansion with minijinja ([`render`])
//! 3. **Normalize** – `<%…%>` emphasis markup → `<b>…</b>` ([`tags`])
//! 4. **Write** – `build/<uuid>/resume.html` ([`output`])
//! 5. **Convert** – headless Chrome print-to-PDF ([`convert`])
//!
//! [`pipeline`] wires the stages together. The tag normalizer is also exposed
//! through a C-compatible FFI surface in [`ffi`].

pub mod convert;
pub mod data;
pub mod error;
pub mod ffi;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod tags;
pub mod templates;

// Re-exports for convenience
pub use error::BuildError;
pub use pipeline::{build_resume, Pipeline, PipelineConfig, TemplateSource};
pub use tags::{normalize_tags, TagError};
