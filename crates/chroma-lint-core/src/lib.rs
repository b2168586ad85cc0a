//! # chroma-lint-core
//!
//! Core framework for color-token compliance linting.
//!
//! Source files are lowered by a [`SourceParser`] into a language-agnostic
//! [`SyntaxTree`](tree::SyntaxTree); rules walk that tree and report
//! [`Violation`]s. It includes:
//!
//! - [`palette`] for recognizing raw color utilities such as `bg-red-500`
//! - [`policy`] and [`gate`] for exempt syntactic contexts and exempt files
//! - [`NoRawColor`], the rule that ties them together
//! - [`Analyzer`] for discovering files and orchestrating lint execution
//!
//! ## Example
//!
//! ```ignore
//! use chroma_lint_core::{Analyzer, Config, NoRawColor};
//!
//! let config = Config::from_file("chroma-lint.toml".as_ref())?;
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .parser(MyParser::new())
//!     .rule(NoRawColor::with_options(config.rule_options("no-raw-color")))
//!     .config(config)
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! println!("{}", result.format_test_report(Severity::Error));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod engine;
mod rule;
mod types;

/// Comment-based allow directives.
pub mod allowance;
/// File-level exemption.
pub mod gate;
/// Color utility vocabulary and matcher.
pub mod palette;
/// Context-level exemption.
pub mod policy;
/// Diagnostic construction.
pub mod report;
/// Language front-end trait.
pub mod source;
/// Language-agnostic syntax tree.
pub mod tree;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{
    AnalyzerConfig, Config, ConfigError, ResolvedOptions, RuleConfig, RuleOptions,
    DEFAULT_ALLOWED_PROPERTIES, DEFAULT_EXTENSIONS,
};
pub use context::FileContext;
pub use engine::{NoRawColor, CODE, NAME};
pub use rule::{Rule, RuleBox};
pub use source::{ParseError, SourceParser, SourceParserBox};
pub use types::{LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic};
