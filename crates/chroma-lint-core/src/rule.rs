//! Rule trait for defining lint rules.

use crate::context::FileContext;
use crate::tree::SyntaxTree;
use crate::types::{Severity, Violation};

/// A per-file lint rule over the language-agnostic [`SyntaxTree`].
///
/// # Example
///
/// ```ignore
/// use chroma_lint_core::{FileContext, Rule, SyntaxTree, Violation};
///
/// pub struct NoEmptyStrings;
///
/// impl Rule for NoEmptyStrings {
///     fn name(&self) -> &'static str { "no-empty-strings" }
///     fn code(&self) -> &'static str { "CC900" }
///
///     fn check(&self, ctx: &FileContext, tree: &SyntaxTree) -> Vec<Violation> {
///         // walk tree.preorder() and collect violations
///         Vec::new()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "no-raw-color").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "CC001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this rule requires a reason when using allow directives.
    ///
    /// By default, rules with `Severity::Error` require a reason.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Checks a single file and returns any violations found.
    fn check(&self, ctx: &FileContext, tree: &SyntaxTree) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
