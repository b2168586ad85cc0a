//! TypeScript / TSX / JavaScript front end using Tree-sitter.

use std::path::Path;

use chroma_lint_core::source::{ParseError, SourceParser};
use chroma_lint_core::tree::{Field, NodeId, NodeKind, PropertyKey, Span, SyntaxTree, TemplatePart};
use tracing::trace;
use tree_sitter::{Language, Node, Parser, Point};

/// Extensions parsed with the plain TypeScript grammar.
const TYPESCRIPT_EXTENSIONS: &[&str] = &["ts", "mts", "cts"];

/// Every extension this front end handles. JSX-capable files use the TSX
/// grammar, which also accepts plain JavaScript.
const ALL_EXTENSIONS: &[&str] = &["ts", "mts", "cts", "tsx", "js", "jsx", "mjs", "cjs"];

/// Lowers TypeScript, TSX and JavaScript sources into a [`SyntaxTree`].
pub struct TypeScriptParser {
    typescript: Language,
    tsx: Language,
}

impl TypeScriptParser {
    /// Creates a new parser with both grammars loaded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            typescript: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            tsx: tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Picks the grammar for `path` by extension.
    fn language_for(&self, path: &Path) -> &Language {
        let is_typescript = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| TYPESCRIPT_EXTENSIONS.contains(&ext));
        if is_typescript {
            &self.typescript
        } else {
            &self.tsx
        }
    }
}

impl Default for TypeScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for TypeScriptParser {
    fn language_id(&self) -> &'static str {
        "typescript"
    }

    fn extensions(&self) -> &'static [&'static str] {
        ALL_EXTENSIONS
    }

    fn parse(&self, path: &Path, source: &str) -> Result<SyntaxTree, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(self.language_for(path))
            .map_err(|e| ParseError::Language {
                language: self.language_id(),
                message: e.to_string(),
            })?;

        let ts_tree = parser.parse(source, None).ok_or(ParseError::NoTree)?;
        let root = ts_tree.root_node();

        if root.has_error() {
            let at = first_error(root).map_or(root.start_position(), |n| n.start_position());
            return Err(ParseError::Syntax {
                line: at.row + 1,
                column: at.column + 1,
            });
        }

        let tree = Lowering { source }.lower(root);
        trace!("Lowered {} into {} nodes", path.display(), tree.len());
        Ok(tree)
    }
}

/// Finds the first error or missing node in source order.
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }
    None
}

fn span_at(start: usize, end: usize, point: Point) -> Span {
    Span {
        start,
        end,
        line: point.row + 1,
        column: point.column + 1,
    }
}

fn span_of(node: &Node<'_>) -> Span {
    span_at(node.start_byte(), node.end_byte(), node.start_position())
}

struct Lowering<'s> {
    source: &'s str,
}

impl Lowering<'_> {
    fn text(&self, start: usize, end: usize) -> &str {
        self.source.get(start..end).unwrap_or("")
    }

    /// Contents of a quoted literal, without the delimiters.
    fn unquoted(&self, node: &Node<'_>) -> &str {
        let (start, end) = (node.start_byte(), node.end_byte());
        if end >= start + 2 {
            self.text(start + 1, end - 1)
        } else {
            ""
        }
    }

    /// Runtime value of a `string` node. JSX attribute strings have no
    /// escape sequences and are taken verbatim.
    fn string_value(&self, node: &Node<'_>) -> String {
        let raw = self.unquoted(node);
        if node.parent().is_some_and(|p| p.kind() == "jsx_attribute") {
            raw.to_string()
        } else {
            unescape_js(raw)
        }
    }

    fn lower(&self, root: Node<'_>) -> SyntaxTree {
        let mut tree = SyntaxTree::new(root.kind(), span_of(&root));

        // (tree-sitter node, parent in the lowered tree, role in parent)
        let mut stack: Vec<(Node<'_>, NodeId, Option<Field>)> = Vec::new();
        push_named_children(&mut stack, root, NodeId::ROOT, None);

        while let Some((node, parent, field)) = stack.pop() {
            match node.kind() {
                "parenthesized_expression" => {
                    push_named_children(&mut stack, node, parent, field);
                }
                "string" => {
                    let value = self.string_value(&node);
                    tree.push(parent, field, NodeKind::StringLiteral { value }, span_of(&node));
                }
                "template_string" => {
                    let (parts, substitutions) = self.template_parts(&node);
                    let id = tree.push(
                        parent,
                        field,
                        NodeKind::TemplateLiteral { parts },
                        span_of(&node),
                    );
                    for sub in substitutions.into_iter().rev() {
                        push_named_children(&mut stack, sub, id, None);
                    }
                }
                "array" => {
                    let id = tree.push(parent, field, NodeKind::Array, span_of(&node));
                    push_named_children(&mut stack, node, id, None);
                }
                "pair" => {
                    let key = node
                        .child_by_field_name("key")
                        .map_or_else(PropertyKey::computed, |k| self.property_key(&k));
                    let id = tree.push(parent, field, NodeKind::Property { key }, span_of(&node));
                    if let Some(value) = node.child_by_field_name("value") {
                        stack.push((value, id, Some(Field::Value)));
                    }
                    if let Some(key) = node.child_by_field_name("key") {
                        stack.push((key, id, Some(Field::Key)));
                    }
                }
                kind => {
                    let id = tree.push(
                        parent,
                        field,
                        NodeKind::Other {
                            kind: kind.to_string(),
                        },
                        span_of(&node),
                    );
                    push_named_children(&mut stack, node, id, None);
                }
            }
        }

        tree
    }

    fn property_key(&self, key: &Node<'_>) -> PropertyKey {
        match key.kind() {
            "computed_property_name" => PropertyKey::computed(),
            "string" => PropertyKey::named(unescape_js(self.unquoted(key))),
            _ => PropertyKey::named(self.text(key.start_byte(), key.end_byte())),
        }
    }

    /// Splits a template into static text runs and `${...}` substitutions.
    fn template_parts<'t>(&self, node: &Node<'t>) -> (Vec<TemplatePart>, Vec<Node<'t>>) {
        let mut parts = Vec::new();
        let mut substitutions = Vec::new();

        // Skip the opening backtick.
        let mut cursor_byte = node.start_byte() + 1;
        let mut cursor_point = Point {
            row: node.start_position().row,
            column: node.start_position().column + 1,
        };

        let mut walker = node.walk();
        for child in node.named_children(&mut walker) {
            if child.kind() != "template_substitution" {
                continue;
            }
            self.push_static(&mut parts, cursor_byte, child.start_byte(), cursor_point);
            parts.push(TemplatePart::Dynamic {
                span: span_of(&child),
            });
            cursor_byte = child.end_byte();
            cursor_point = child.end_position();
            substitutions.push(child);
        }

        // Stop before the closing backtick.
        let end = node.end_byte().saturating_sub(1).max(cursor_byte);
        self.push_static(&mut parts, cursor_byte, end, cursor_point);

        (parts, substitutions)
    }

    fn push_static(&self, parts: &mut Vec<TemplatePart>, start: usize, end: usize, at: Point) {
        if end > start {
            parts.push(TemplatePart::Static {
                text: self.text(start, end).to_string(),
                span: span_at(start, end, at),
            });
        }
    }
}

/// Decodes the escape sequences of a JavaScript string literal body.
///
/// Line continuations are dropped, unpaired surrogates become U+FFFD and
/// an unknown escape stands for the escaped character itself.
fn unescape_js(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 1..];
        let Some(esc) = rest.chars().next() else {
            out.push('\\');
            return out;
        };
        rest = &rest[esc.len_utf8()..];
        match esc {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !rest.starts_with(|c: char| c.is_ascii_digit()) => out.push('\0'),
            'x' => match hex_value(rest.get(..2)) {
                Some(code) => {
                    out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                    rest = &rest[2..];
                }
                None => out.push('x'),
            },
            'u' => match unicode_escape(rest) {
                Some((code, len)) => {
                    rest = &rest[len..];
                    out.push(combine_surrogates(code, &mut rest));
                }
                None => out.push('u'),
            },
            '\r' => {
                rest = rest.strip_prefix('\n').unwrap_or(rest);
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }
    out.push_str(rest);
    out
}

/// Parses the digits of a `\u` escape: `XXXX` or `{X...}`. Returns the code
/// unit or point and the number of bytes consumed.
fn unicode_escape(rest: &str) -> Option<(u32, usize)> {
    if let Some(braced) = rest.strip_prefix('{') {
        let close = braced.find('}')?;
        let code = hex_value(Some(&braced[..close]))?;
        (code <= 0x10_FFFF).then_some((code, close + 2))
    } else {
        hex_value(rest.get(..4)).map(|code| (code, 4))
    }
}

/// Joins a high surrogate with a directly following `\uXXXX` low surrogate.
fn combine_surrogates(code: u32, rest: &mut &str) -> char {
    if (0xD800..=0xDBFF).contains(&code) {
        let low = rest
            .strip_prefix("\\u")
            .and_then(unicode_escape)
            .filter(|(low, _)| (0xDC00..=0xDFFF).contains(low));
        if let Some((low, len)) = low {
            *rest = &rest[2 + len..];
            let joined = 0x1_0000 + ((code - 0xD800) << 10) + (low - 0xDC00);
            return char::from_u32(joined).unwrap_or(char::REPLACEMENT_CHARACTER);
        }
    }
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn hex_value(digits: Option<&str>) -> Option<u32> {
    digits
        .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_hexdigit()))
        .and_then(|d| u32::from_str_radix(d, 16).ok())
}

/// Queues the named children of `node` so they pop in source order.
fn push_named_children<'t>(
    stack: &mut Vec<(Node<'t>, NodeId, Option<Field>)>,
    node: Node<'t>,
    parent: NodeId,
    field: Option<Field>,
) {
    let mut cursor = node.walk();
    let children: Vec<_> = node.named_children(&mut cursor).collect();
    stack.extend(children.into_iter().rev().map(|c| (c, parent, field)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_lint_core::policy::SyntaxContext;

    fn parse(file: &str, src: &str) -> SyntaxTree {
        TypeScriptParser::new()
            .parse(Path::new(file), src)
            .expect("source should parse")
    }

    /// String literal values with their syntactic context, in source order.
    fn literals(tree: &SyntaxTree) -> Vec<(String, SyntaxContext)> {
        tree.preorder()
            .filter_map(|(id, node)| match &node.kind {
                NodeKind::StringLiteral { value } => Some((value.clone(), tree.context_of(id))),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn jsx_attribute_string_is_a_literal() {
        let tree = parse(
            "Button.tsx",
            "export const B = () => <button className=\"bg-blue-600 px-4\" />;\n",
        );
        let lits = literals(&tree);
        assert_eq!(lits, [("bg-blue-600 px-4".to_string(), SyntaxContext::Other)]);
    }

    #[test]
    fn literal_span_points_at_opening_quote() {
        let tree = parse("a.ts", "const a = 1;\n  const s = 'bg-red-500';\n");
        let (_, node) = tree
            .preorder()
            .find(|(_, n)| matches!(n.kind, NodeKind::StringLiteral { .. }))
            .unwrap();
        assert_eq!((node.span.line, node.span.column), (2, 13));
        assert_eq!(node.span.len(), "'bg-red-500'".len());
    }

    #[test]
    fn escapes_are_decoded_outside_jsx_attributes() {
        let tree = parse(
            "e.tsx",
            r#"const t = { "col\u006fr": 'bg\x2dred-500\u0030' }; const j = <b className="a\x2db" />;"#,
        );
        assert_eq!(
            literals(&tree),
            [
                ("color".to_string(), SyntaxContext::Other),
                (
                    "bg-red-5000".to_string(),
                    SyntaxContext::PropertyValue {
                        key: "color".into(),
                        computed: false
                    }
                ),
                (r"a\x2db".to_string(), SyntaxContext::Other),
            ]
        );
    }

    #[test]
    fn unescape_handles_js_escape_forms() {
        assert_eq!(unescape_js(r"a\tb\'c\\"), "a\tb'c\\");
        assert_eq!(unescape_js(r"\u{1F600}\uD83D\uDE00"), "\u{1F600}\u{1F600}");
        assert_eq!(unescape_js(r"\uD83Dx"), "\u{FFFD}x");
        assert_eq!(unescape_js("bg-\\\nred"), "bg-red");
        assert_eq!(unescape_js(r"\0\xZZ\u12"), "\0xZZu12");
    }

    #[test]
    fn object_pairs_carry_keys_and_fields() {
        let tree = parse(
            "theme.ts",
            r#"const t = { color: "text-red-600", "iconBg": 'bg-red-50', [k]: "bg-red-100", 5: "x" };"#,
        );
        let lits = literals(&tree);
        assert_eq!(
            lits,
            [
                (
                    "text-red-600".to_string(),
                    SyntaxContext::PropertyValue {
                        key: "color".into(),
                        computed: false
                    }
                ),
                ("iconBg".to_string(), SyntaxContext::Other),
                (
                    "bg-red-50".to_string(),
                    SyntaxContext::PropertyValue {
                        key: "iconBg".into(),
                        computed: false
                    }
                ),
                (
                    "bg-red-100".to_string(),
                    SyntaxContext::PropertyValue {
                        key: String::new(),
                        computed: true
                    }
                ),
                (
                    "x".to_string(),
                    SyntaxContext::PropertyValue {
                        key: "5".into(),
                        computed: false
                    }
                ),
            ]
        );
    }

    #[test]
    fn clsx_object_key_is_not_a_property_value() {
        let tree = parse(
            "c.tsx",
            r#"const c = clsx({ "bg-red-500": isError });"#,
        );
        assert_eq!(
            literals(&tree),
            [("bg-red-500".to_string(), SyntaxContext::Other)]
        );
    }

    #[test]
    fn array_elements_and_nested_calls() {
        let tree = parse(
            "avatar.ts",
            r#"const p = ["bg-red-500", cn("bg-blue-500")];"#,
        );
        assert_eq!(
            literals(&tree),
            [
                ("bg-red-500".to_string(), SyntaxContext::ArrayElement),
                ("bg-blue-500".to_string(), SyntaxContext::Other),
            ]
        );
    }

    #[test]
    fn parentheses_are_transparent() {
        let tree = parse("p.ts", r#"const t = { color: ("bg-red-500") };"#);
        assert_eq!(
            literals(&tree),
            [(
                "bg-red-500".to_string(),
                SyntaxContext::PropertyValue {
                    key: "color".into(),
                    computed: false
                }
            )]
        );
    }

    #[test]
    fn template_splits_static_and_dynamic_parts() {
        let src = "const c = `px-2 bg-red-500 ${active ? \"ring-blue-500\" : \"\"} text-gray-700`;";
        let tree = parse("t.tsx", src);

        let (id, node) = tree
            .preorder()
            .find(|(_, n)| matches!(n.kind, NodeKind::TemplateLiteral { .. }))
            .unwrap();
        let NodeKind::TemplateLiteral { parts } = &node.kind else {
            unreachable!()
        };

        assert_eq!(parts.len(), 3);
        let TemplatePart::Static { text, span } = &parts[0] else {
            panic!("expected static head, got {:?}", parts[0]);
        };
        assert_eq!(text, "px-2 bg-red-500 ");
        assert_eq!(span.start, src.find('`').unwrap() + 1);
        assert_eq!(span.column, 12);
        assert!(matches!(parts[1], TemplatePart::Dynamic { .. }));
        let TemplatePart::Static { text, span } = &parts[2] else {
            panic!("expected static tail, got {:?}", parts[2]);
        };
        assert_eq!(text, " text-gray-700");
        assert_eq!(&src[span.start..span.end], " text-gray-700");

        // Literals inside the substitution hang off the template.
        let inner: Vec<_> = literals(&tree).into_iter().map(|(v, _)| v).collect();
        assert_eq!(inner, ["ring-blue-500", ""]);
        let (lit_id, _) = tree
            .preorder()
            .find(|(_, n)| matches!(&n.kind, NodeKind::StringLiteral { value } if value == "ring-blue-500"))
            .unwrap();
        let mut ancestor = tree.get(lit_id).and_then(|n| n.parent);
        while let Some(a) = ancestor {
            if a == id {
                break;
            }
            ancestor = tree.get(a).and_then(|n| n.parent);
        }
        assert_eq!(ancestor, Some(id));
    }

    #[test]
    fn template_without_substitutions_is_one_static_part() {
        let tree = parse("t.ts", "const c = `bg-red-500`;");
        let parts = tree
            .preorder()
            .find_map(|(_, n)| match &n.kind {
                NodeKind::TemplateLiteral { parts } => Some(parts.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(parts.len(), 1);
        assert!(matches!(&parts[0], TemplatePart::Static { text, .. } if text == "bg-red-500"));
    }

    #[test]
    fn empty_template_has_no_parts() {
        let tree = parse("t.ts", "const c = ``;");
        let parts = tree
            .preorder()
            .find_map(|(_, n)| match &n.kind {
                NodeKind::TemplateLiteral { parts } => Some(parts.clone()),
                _ => None,
            })
            .unwrap();
        assert!(parts.is_empty());
    }

    #[test]
    fn typescript_grammar_accepts_angle_bracket_casts() {
        // `<T>expr` is only valid outside TSX.
        let tree = parse("cast.ts", "const x = <string>'bg-red-500';");
        assert_eq!(literals(&tree).len(), 1);
    }

    #[test]
    fn syntax_errors_are_rejected() {
        let err = TypeScriptParser::new()
            .parse(Path::new("broken.tsx"), "const x = {\n  a: 'bg-red-500',\n")
            .unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn handles_known_extensions_only() {
        let parser = TypeScriptParser::new();
        assert!(parser.handles(Path::new("src/app/page.tsx")));
        assert!(parser.handles(Path::new("lib/index.mjs")));
        assert!(!parser.handles(Path::new("styles/app.css")));
        assert!(!parser.handles(Path::new("Makefile")));
    }
}
