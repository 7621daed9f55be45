//! Diagnostic creation, severity management, and rendering.
//!
//! Backend diagnostics do not point into source text: by the time resource
//! reporting runs, every user-facing check has passed, so a [`Diagnostic`]
//! names the pipeline object it is about through a [`Subject`] (a table, a
//! stage, or a file). [`DiagnosticRenderer`] implementations format them for a
//! terminal or as JSON.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod subject;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use subject::Subject;
