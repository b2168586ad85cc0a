//! Source parser trait.
//!
//! `SourceParser` is the extension point for adding languages. A parser
//! turns raw source text into the [`SyntaxTree`] that rules walk.

use std::path::Path;

use crate::tree::SyntaxTree;

/// Errors a parser can report for a single file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The grammar could not be loaded.
    #[error("failed to load {language} grammar: {message}")]
    Language {
        /// Language identifier.
        language: &'static str,
        /// Loader message.
        message: String,
    },

    /// The source contains syntax errors.
    #[error("syntax error at {line}:{column}")]
    Syntax {
        /// Line of the first error (1-indexed).
        line: usize,
        /// Column of the first error (1-indexed).
        column: usize,
    },

    /// The parser produced no tree (e.g. cancelled).
    #[error("parser produced no tree")]
    NoTree,

    /// No grammar handles this file extension.
    #[error("unsupported file extension: {0}")]
    Unsupported(String),
}

/// Language front end.
pub trait SourceParser: Send + Sync {
    /// Language identifier (e.g., `"typescript"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this parser handles, without the dot (e.g., `&["ts", "tsx"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Parses `source`, read from `path`, into a syntax tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be parsed without errors.
    fn parse(&self, path: &Path, source: &str) -> Result<SyntaxTree, ParseError>;

    /// Whether this parser handles `path`.
    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext))
    }
}

/// Type alias for boxed `SourceParser` trait objects.
pub type SourceParserBox = Box<dyn SourceParser>;
