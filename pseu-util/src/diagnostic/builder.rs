use super::{Diagnostic, DiagnosticCode, Level};
use crate::Span;

/// Fluent constructor for a [`Diagnostic`], mirroring the teacher's
/// `DiagnosticBuilder` API.
pub struct DiagnosticBuilder {
    level: Level,
    message: String,
    code: Option<DiagnosticCode>,
    span: Option<Span>,
}

impl DiagnosticBuilder {
    pub fn error(message: impl Into<String>) -> Self {
        Self { level: Level::Error, message: message.into(), code: None, span: None }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: Level::Warning, message: message.into(), code: None, span: None }
    }

    pub fn code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn build(self) -> Diagnostic {
        Diagnostic {
            level: self.level,
            message: self.message,
            code: self.code,
            span: self.span.unwrap_or(Span::DUMMY),
        }
    }
}
