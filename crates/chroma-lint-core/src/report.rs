//! Diagnostics emitted by the rule engine and their conversion to violations.

use std::path::PathBuf;

use crate::tree::Span;
use crate::types::{Location, Severity, Suggestion, Violation};

/// A raw color found by the matcher, before exemptions are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// Span of the literal (or template segment) holding the token.
    pub span: Span,
    /// The matched token, verbatim.
    pub matched_token: String,
}

/// A single unexempted occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Where the violation was found.
    pub span: Span,
    /// Severity assigned by the rule.
    pub severity: Severity,
    /// Rendered message.
    pub message: String,
    /// The offending token.
    pub matched_token: String,
}

impl Diagnostic {
    /// Promotes an occurrence that passed every exemption.
    #[must_use]
    pub fn from_occurrence(occurrence: Occurrence, severity: Severity) -> Self {
        Self {
            span: occurrence.span,
            severity,
            message: message_for(&occurrence.matched_token),
            matched_token: occurrence.matched_token,
        }
    }
}

/// Renders the fixed message template for `token`.
#[must_use]
pub fn message_for(token: &str) -> String {
    format!("Raw color utility \"{token}\" detected. Use a design token instead.")
}

/// Converts diagnostics into [`Violation`]s for one file.
///
/// Every diagnostic yields exactly one violation: nothing is merged or dropped.
#[derive(Debug, Clone)]
pub struct Reporter {
    code: &'static str,
    rule: &'static str,
    file: PathBuf,
    doc_ref: Option<String>,
}

impl Reporter {
    /// Creates a reporter for violations of `rule` in `file`.
    #[must_use]
    pub fn new(code: &'static str, rule: &'static str, file: PathBuf) -> Self {
        Self {
            code,
            rule,
            file,
            doc_ref: None,
        }
    }

    /// Attaches a contract document reference to every violation.
    #[must_use]
    pub fn with_doc_ref(mut self, doc_ref: Option<String>) -> Self {
        self.doc_ref = doc_ref;
        self
    }

    /// Converts one diagnostic.
    #[must_use]
    pub fn to_violation(&self, diagnostic: Diagnostic) -> Violation {
        let violation = Violation::new(
            self.code,
            self.rule,
            diagnostic.severity,
            Location::from_span(self.file.clone(), diagnostic.span),
            diagnostic.message,
        )
        .with_token(diagnostic.matched_token)
        .with_suggestion(Suggestion::new(
            "Replace it with a semantic design token, or move it into an exempt context",
        ));

        match &self.doc_ref {
            Some(doc_ref) => violation.with_doc_ref(doc_ref.clone()),
            None => violation,
        }
    }

    /// Converts all diagnostics, preserving order.
    #[must_use]
    pub fn report(&self, diagnostics: Vec<Diagnostic>) -> Vec<Violation> {
        diagnostics
            .into_iter()
            .map(|d| self.to_violation(d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostic(token: &str, line: usize) -> Diagnostic {
        Diagnostic::from_occurrence(
            Occurrence {
                span: Span {
                    start: 10,
                    end: 22,
                    line,
                    column: 7,
                },
                matched_token: token.to_string(),
            },
            Severity::Error,
        )
    }

    #[test]
    fn message_template_is_fixed() {
        insta::assert_snapshot!(
            message_for("bg-red-500"),
            @r#"Raw color utility "bg-red-500" detected. Use a design token instead."#
        );
    }

    #[test]
    fn report_preserves_location_and_token() {
        let reporter = Reporter::new("CC001", "no-raw-color", PathBuf::from("src/a.tsx"));
        let violations = reporter.report(vec![diagnostic("bg-red-500", 3)]);

        assert_eq!(violations.len(), 1);
        let v = &violations[0];
        assert_eq!(v.code, "CC001");
        assert_eq!(v.rule, "no-raw-color");
        assert_eq!(v.token.as_deref(), Some("bg-red-500"));
        assert_eq!((v.location.line, v.location.column), (3, 7));
        assert_eq!((v.location.offset, v.location.length), (10, 12));
        assert!(v.doc_ref.is_none());
    }

    #[test]
    fn report_does_not_deduplicate() {
        let reporter = Reporter::new("CC001", "no-raw-color", PathBuf::from("src/a.tsx"))
            .with_doc_ref(Some("COLOR_CONTRACT.md".to_string()));
        let violations =
            reporter.report(vec![diagnostic("bg-red-500", 3), diagnostic("bg-red-500", 3)]);

        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .all(|v| v.doc_ref.as_deref() == Some("COLOR_CONTRACT.md")));
    }
}
