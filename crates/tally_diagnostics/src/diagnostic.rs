//! Structured diagnostic messages with severity, codes, and subjects.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use crate::subject::Subject;
use serde::{Deserialize, Serialize};

/// A structured diagnostic message.
///
/// Each diagnostic carries a severity, a stable code, a message, the pipeline
/// object it concerns, and optional notes and help lines.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The unique code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The table, stage, or file this diagnostic is about.
    pub subject: Option<Subject>,
    /// Explanatory footnotes.
    pub notes: Vec<String>,
    /// Actionable suggestions.
    pub help: Vec<String>,
}

impl Diagnostic {
    fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            subject: None,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Sets the subject of this diagnostic.
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;
    use tally_common::StageId;

    #[test]
    fn create_error() {
        let code = DiagnosticCode::new(Category::Error, 301);
        let diag = Diagnostic::error(code, "duplicate logical id");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.code.to_string(), "E301");
        assert!(diag.subject.is_none());
    }

    #[test]
    fn builder_methods() {
        let diag = Diagnostic::warning(DiagnosticCode::new(Category::Warning, 10), "odd")
            .with_subject(Subject::Stage {
                stage: StageId::from_raw(2),
            })
            .with_note("first note")
            .with_help("do something");
        assert_eq!(diag.notes, vec!["first note"]);
        assert_eq!(diag.help, vec!["do something"]);
        assert!(matches!(diag.subject, Some(Subject::Stage { .. })));
    }
}
