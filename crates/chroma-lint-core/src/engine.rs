//! The `no-raw-color` rule.
//!
//! # Rationale
//!
//! Colors are expressed through design tokens. Raw utilities such as
//! `bg-red-500` bypass the contract and drift out of sync with the theme.
//!
//! # Configuration
//!
//! - `allowedFiles`: path substrings whose files are skipped entirely
//! - `allowedProperties`: property names whose values may hold raw colors
//!   (default: `color`, `gradient`, `iconBg`, `iconColor`)
//! - `doc_ref`: contract document attached to every violation
//!
//! # Exemptions
//!
//! - Direct elements of array literals
//! - Values of whitelisted, non-computed object properties
//! - `// chroma-lint: allow(no-raw-color) reason="..."` (handled by the analyzer)

use std::path::Path;

use tracing::{debug, trace};

use crate::config::ResolvedOptions;
use crate::context::FileContext;
use crate::gate::is_file_exempt;
use crate::palette::find_raw_color;
use crate::policy::is_exempt;
use crate::report::{Diagnostic, Occurrence, Reporter};
use crate::rule::Rule;
use crate::tree::{NodeId, NodeKind, Span, SyntaxTree, TemplatePart};
use crate::types::{Severity, Violation};

/// Rule code for no-raw-color.
pub const CODE: &str = "CC001";

/// Rule name for no-raw-color.
pub const NAME: &str = "no-raw-color";

/// Phases of a single file's check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Gating,
    Walking,
    Done,
}

/// Flags raw color utilities outside exempt contexts.
#[derive(Debug, Clone)]
pub struct NoRawColor {
    options: ResolvedOptions,
    severity: Severity,
}

impl Default for NoRawColor {
    fn default() -> Self {
        Self::new()
    }
}

impl NoRawColor {
    /// Creates a new rule with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ResolvedOptions::default())
    }

    /// Creates a rule with resolved options.
    #[must_use]
    pub fn with_options(options: ResolvedOptions) -> Self {
        Self {
            options,
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Options this rule runs with.
    #[must_use]
    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    /// Runs the rule over one file and returns its diagnostics in source order.
    ///
    /// Pure: the same `(path, tree)` always yields the same diagnostics.
    #[must_use]
    pub fn check_tree(&self, path: &Path, tree: &SyntaxTree) -> Vec<Diagnostic> {
        let mut walk = Walk {
            rule: self,
            tree,
            phase: Phase::Idle,
            diagnostics: Vec::new(),
        };

        walk.enter(Phase::Gating);
        if is_file_exempt(path, &self.options.allowed_files) {
            debug!("Skipping exempt file: {}", path.display());
            walk.enter(Phase::Done);
            return walk.diagnostics;
        }

        walk.enter(Phase::Walking);
        for (id, node) in tree.preorder() {
            match &node.kind {
                NodeKind::StringLiteral { value } => walk.visit_literal(id, value, node.span),
                NodeKind::TemplateLiteral { parts } => walk.visit_template(id, parts),
                NodeKind::Array | NodeKind::Property { .. } | NodeKind::Other { .. } => {}
            }
        }
        walk.enter(Phase::Done);

        walk.diagnostics
    }
}

struct Walk<'a> {
    rule: &'a NoRawColor,
    tree: &'a SyntaxTree,
    phase: Phase,
    diagnostics: Vec<Diagnostic>,
}

impl Walk<'_> {
    fn enter(&mut self, next: Phase) {
        trace!("{NAME}: {:?} -> {next:?}", self.phase);
        self.phase = next;
    }

    /// At most one diagnostic per plain literal: only the first match counts.
    fn visit_literal(&mut self, id: NodeId, value: &str, span: Span) {
        if let Some(token) = find_raw_color(value) {
            self.emit(id, span, token);
        }
    }

    /// Each static segment is matched on its own; interpolations are skipped.
    fn visit_template(&mut self, id: NodeId, parts: &[TemplatePart]) {
        for part in parts {
            if let TemplatePart::Static { text, span } = part {
                if let Some(token) = find_raw_color(text) {
                    self.emit(id, *span, token);
                }
            }
        }
    }

    /// Context always comes from the literal's (or template's) parent.
    fn emit(&mut self, id: NodeId, span: Span, token: &str) {
        let occurrence = Occurrence {
            span,
            matched_token: token.to_string(),
        };
        let context = self.tree.context_of(id);
        if is_exempt(&context, &self.rule.options) {
            trace!("{NAME}: {token} exempt in {context:?}");
            return;
        }
        self.diagnostics
            .push(Diagnostic::from_occurrence(occurrence, self.rule.severity));
    }
}

impl Rule for NoRawColor {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids raw color utilities (e.g. bg-red-500) outside exempt contexts"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, tree: &SyntaxTree) -> Vec<Violation> {
        let diagnostics = self.check_tree(ctx.path, tree);
        Reporter::new(CODE, NAME, ctx.relative_path.clone())
            .with_doc_ref(self.options.doc_ref.clone())
            .report(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Field, PropertyKey};

    fn span(line: usize) -> Span {
        Span {
            start: line * 100,
            end: line * 100 + 10,
            line,
            column: 1,
        }
    }

    fn lit(value: &str) -> NodeKind {
        NodeKind::StringLiteral {
            value: value.to_string(),
        }
    }

    fn other(kind: &str) -> NodeKind {
        NodeKind::Other {
            kind: kind.to_string(),
        }
    }

    fn tokens(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics
            .iter()
            .map(|d| d.matched_token.as_str())
            .collect()
    }

    fn check(tree: &SyntaxTree) -> Vec<Diagnostic> {
        NoRawColor::new().check_tree(Path::new("src/app/page.tsx"), tree)
    }

    #[test]
    fn plain_literal_reports_first_token_only() {
        let mut tree = SyntaxTree::new("program", span(0));
        let attr = tree.push(NodeId::ROOT, None, other("jsx_attribute"), span(1));
        tree.push(
            attr,
            None,
            lit("flex bg-blue-100 text-blue-600 rounded-lg"),
            span(1),
        );

        let diagnostics = check(&tree);
        assert_eq!(tokens(&diagnostics), vec!["bg-blue-100"]);
        assert_eq!(diagnostics[0].span, span(1));
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(
            diagnostics[0].message,
            "Raw color utility \"bg-blue-100\" detected. Use a design token instead."
        );
    }

    #[test]
    fn project_token_family_is_not_reported() {
        let mut tree = SyntaxTree::new("program", span(0));
        tree.push(NodeId::ROOT, None, lit("text-admin-primary-700"), span(1));
        assert!(check(&tree).is_empty());
    }

    #[test]
    fn array_elements_are_exempt() {
        let mut tree = SyntaxTree::new("program", span(0));
        let array = tree.push(NodeId::ROOT, None, NodeKind::Array, span(1));
        tree.push(array, None, lit("bg-red-500"), span(1));
        tree.push(array, None, lit("bg-blue-500"), span(1));

        let mut options = ResolvedOptions::default();
        options.allowed_properties.clear();
        let rule = NoRawColor::with_options(options);
        assert!(rule.check_tree(Path::new("a.tsx"), &tree).is_empty());
    }

    fn property_tree(key: &str, value: &str) -> SyntaxTree {
        let mut tree = SyntaxTree::new("program", span(0));
        let object = tree.push(NodeId::ROOT, None, other("object"), span(1));
        let prop = tree.push(
            object,
            None,
            NodeKind::Property {
                key: PropertyKey::named(key),
            },
            span(1),
        );
        tree.push(prop, Some(Field::Value), lit(value), span(1));
        tree
    }

    #[test]
    fn whitelisted_property_value_is_exempt() {
        let tree = property_tree("color", "bg-red-500");
        assert!(check(&tree).is_empty());
    }

    #[test]
    fn property_value_is_reported_when_not_whitelisted() {
        let tree = property_tree("color", "bg-red-500");
        let mut options = ResolvedOptions::default();
        options.allowed_properties.remove("color");
        let diagnostics = NoRawColor::with_options(options).check_tree(Path::new("a.tsx"), &tree);
        assert_eq!(tokens(&diagnostics), vec!["bg-red-500"]);
    }

    #[test]
    fn exempt_file_short_circuits() {
        let mut tree = SyntaxTree::new("program", span(0));
        for line in 1..=10 {
            tree.push(NodeId::ROOT, None, lit("bg-red-500"), span(line));
        }
        let rule =
            NoRawColor::with_options(ResolvedOptions::default().with_allowed_file("style-guide/page"));

        assert!(rule
            .check_tree(Path::new("src/app/style-guide/page.tsx"), &tree)
            .is_empty());
        assert_eq!(
            rule.check_tree(Path::new("src/app/dashboard/page.tsx"), &tree)
                .len(),
            10
        );
    }

    #[test]
    fn template_segments_report_independently() {
        let mut tree = SyntaxTree::new("program", span(0));
        let attr = tree.push(NodeId::ROOT, None, other("jsx_expression"), span(1));
        tree.push(
            attr,
            None,
            NodeKind::TemplateLiteral {
                parts: vec![
                    TemplatePart::Static {
                        text: "p-2 bg-red-500 ".to_string(),
                        span: span(1),
                    },
                    TemplatePart::Dynamic { span: span(2) },
                    TemplatePart::Static {
                        text: " text-blue-600".to_string(),
                        span: span(3),
                    },
                ],
            },
            span(1),
        );

        let diagnostics = check(&tree);
        assert_eq!(tokens(&diagnostics), vec!["bg-red-500", "text-blue-600"]);
        assert_eq!(diagnostics[1].span, span(3));
    }

    #[test]
    fn template_in_array_uses_template_parent_context() {
        let mut tree = SyntaxTree::new("program", span(0));
        let array = tree.push(NodeId::ROOT, None, NodeKind::Array, span(1));
        tree.push(
            array,
            None,
            NodeKind::TemplateLiteral {
                parts: vec![TemplatePart::Static {
                    text: "bg-red-500".to_string(),
                    span: span(1),
                }],
            },
            span(1),
        );
        assert!(check(&tree).is_empty());
    }

    #[test]
    fn nested_array_exemption_is_one_level_only() {
        // ["a", cond ? "bg-red-500" : "x"]: the literal's parent is the ternary.
        let mut tree = SyntaxTree::new("program", span(0));
        let array = tree.push(NodeId::ROOT, None, NodeKind::Array, span(1));
        let ternary = tree.push(array, None, other("ternary_expression"), span(1));
        tree.push(ternary, None, lit("bg-red-500"), span(1));
        assert_eq!(tokens(&check(&tree)), vec!["bg-red-500"]);
    }

    #[test]
    fn check_is_idempotent() {
        let mut tree = SyntaxTree::new("program", span(0));
        tree.push(NodeId::ROOT, None, lit("bg-red-500"), span(1));
        tree.push(NodeId::ROOT, None, lit("ring-sky-300"), span(2));
        let rule = NoRawColor::new();
        let first = rule.check_tree(Path::new("a.tsx"), &tree);
        let second = rule.check_tree(Path::new("a.tsx"), &tree);
        assert_eq!(first, second);
        assert_eq!(tokens(&first), vec!["bg-red-500", "ring-sky-300"]);
    }

    #[test]
    fn rule_check_converts_to_violations() {
        let mut tree = SyntaxTree::new("program", span(0));
        tree.push(NodeId::ROOT, None, lit("bg-red-500"), span(4));

        let mut options = ResolvedOptions::default();
        options.doc_ref = Some("COLOR_CONTRACT.md".to_string());
        let rule = NoRawColor::with_options(options).severity(Severity::Warning);

        let path = Path::new("/repo/src/a.tsx");
        let ctx = FileContext::new(path, "", Path::new("/repo"));
        let violations = rule.check(&ctx, &tree);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, CODE);
        assert_eq!(violations[0].severity, Severity::Warning);
        assert_eq!(violations[0].location.file, Path::new("src/a.tsx"));
        assert_eq!(violations[0].location.line, 4);
        assert_eq!(violations[0].doc_ref.as_deref(), Some("COLOR_CONTRACT.md"));
    }
}
