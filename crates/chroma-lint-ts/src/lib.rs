//! # chroma-lint-ts
//!
//! Tree-sitter front end for chroma-lint.
//!
//! Parses TypeScript, TSX and JavaScript sources and lowers them into the
//! language-agnostic [`SyntaxTree`](chroma_lint_core::tree::SyntaxTree) that
//! `chroma-lint-core` rules walk. Only the shapes the color rule cares about
//! survive lowering as-is:
//!
//! - string literals (quotes stripped)
//! - template strings, split into static text and `${...}` substitutions
//! - array literals
//! - object properties, with their key
//!
//! Everything else becomes an opaque node. Parenthesized expressions are
//! dropped so `{ color: ("bg-red-500") }` reads like `{ color: "bg-red-500" }`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod parser;

pub use parser::TypeScriptParser;
