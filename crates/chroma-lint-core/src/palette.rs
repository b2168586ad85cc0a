//! Raw color-utility token matching.
//!
//! A raw color utility is a `<visual-property>-<color-family>-<shade>`
//! fragment such as `bg-red-500` or `hover:text-sky-700`. The vocabularies
//! below are closed: anything outside them (e.g. `bg-neutral-500`,
//! `text-white`, `text-admin-primary-700`) is never reported.

use once_cell::sync::Lazy;
use regex::Regex;

/// Utility prefixes that paint a color.
///
/// `from`, `via` and `to` are the gradient-stop markers.
pub const VISUAL_PROPERTIES: &[&str] = &[
    "bg",
    "text",
    "border",
    "ring",
    "from",
    "via",
    "to",
    "outline",
    "shadow",
    "divide",
    "placeholder",
    "decoration",
    "accent",
    "caret",
    "fill",
    "stroke",
];

/// Hue families that must go through design tokens.
///
/// `neutral` is reserved for the token layer and `black`/`white` are
/// structural, so none of them appear here.
pub const COLOR_FAMILIES: &[&str] = &[
    "slate", "gray", "zinc", "stone", "red", "orange", "amber", "yellow", "lime", "green",
    "emerald", "teal", "cyan", "sky", "blue", "indigo", "violet", "purple", "fuchsia", "pink",
    "rose",
];

/// The closed shade scale.
pub const SHADES: &[&str] = &[
    "50", "100", "200", "300", "400", "500", "600", "700", "800", "900", "950",
];

/// Word boundaries are ASCII-only, as in JavaScript regexes: a non-ASCII
/// letter next to a token does not hide it.
static RAW_COLOR: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"(?-u:\b)(?:{})-(?:{})-(?:{})(?-u:\b)",
        VISUAL_PROPERTIES.join("|"),
        COLOR_FAMILIES.join("|"),
        SHADES.join("|"),
    );
    // Built from the constant tables above; cannot fail.
    Regex::new(&pattern).expect("raw color pattern must compile")
});

/// Returns the first raw color utility in `text`, verbatim.
///
/// ```
/// use chroma_lint_core::palette::find_raw_color;
///
/// assert_eq!(find_raw_color("flex bg-blue-100 text-blue-600"), Some("bg-blue-100"));
/// assert_eq!(find_raw_color("bg-neutral-500"), None);
/// ```
#[must_use]
pub fn find_raw_color(text: &str) -> Option<&str> {
    RAW_COLOR.find(text).map(|m| m.as_str())
}

/// Iterates over every raw color utility in `text`, in order.
pub fn find_all_raw_colors(text: &str) -> impl Iterator<Item = &str> {
    RAW_COLOR.find_iter(text).map(|m| m.as_str())
}

/// A recognized token split into its three parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorToken<'a> {
    /// Visual property prefix (e.g. `bg`).
    pub property: &'a str,
    /// Color family (e.g. `red`).
    pub family: &'a str,
    /// Shade (e.g. `500`).
    pub shade: &'a str,
}

impl<'a> ColorToken<'a> {
    /// Splits a token returned by [`find_raw_color`].
    ///
    /// Returns `None` if `token` is not exactly one raw color utility.
    #[must_use]
    pub fn parse(token: &'a str) -> Option<Self> {
        let (property, rest) = token.split_once('-')?;
        let (family, shade) = rest.split_once('-')?;
        let known = VISUAL_PROPERTIES.contains(&property)
            && COLOR_FAMILIES.contains(&family)
            && SHADES.contains(&shade);
        known.then_some(Self {
            property,
            family,
            shade,
        })
    }
}

impl std::fmt::Display for ColorToken<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.property, self.family, self.shade)
    }
}
