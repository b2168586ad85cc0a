//! Structural exemptions for raw color literals.

use crate::config::ResolvedOptions;

/// What a literal sits directly inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxContext {
    /// Direct element of an array literal.
    ArrayElement,
    /// Value of an object property.
    PropertyValue {
        /// Key name (empty when computed).
        key: String,
        /// Whether the key is computed (`[expr]: value`).
        computed: bool,
    },
    /// Anything else.
    Other,
}

/// Decides whether a match in `context` is forgiven.
///
/// Array elements are always exempt: decorative palettes such as avatar
/// color cycles live outside the token contract. Property values are exempt
/// when the key is a plain (non-computed) name listed in
/// `allowed_properties`. Only the immediate parent is considered.
#[must_use]
pub fn is_exempt(context: &SyntaxContext, options: &ResolvedOptions) -> bool {
    match context {
        SyntaxContext::ArrayElement => true,
        SyntaxContext::PropertyValue { key, computed } => {
            !computed && options.allowed_properties.contains(key)
        }
        SyntaxContext::Other => false,
    }
}
