//! Palette command implementation.

use chroma_lint_core::palette::{
    find_all_raw_colors, ColorToken, COLOR_FAMILIES, SHADES, VISUAL_PROPERTIES,
};
use chroma_lint_core::{CODE, NAME};

/// Runs the palette command.
pub fn run(scan: Option<&str>) {
    match scan {
        Some(text) => print!("{}", render_scan(text)),
        None => print!("{}", render_vocabulary()),
    }
}

fn render_vocabulary() -> String {
    format!(
        "{CODE} {NAME} flags <property>-<family>-<shade> utilities.\n\n\
         Properties: {}\n\
         Families:   {}\n\
         Shades:     {}\n\n\
         Not flagged: neutral, black, white, and project tokens such as bg-primary.\n",
        VISUAL_PROPERTIES.join(", "),
        COLOR_FAMILIES.join(", "),
        SHADES.join(", "),
    )
}

fn render_scan(text: &str) -> String {
    let lines: Vec<String> = find_all_raw_colors(text)
        .map(|token| match ColorToken::parse(token) {
            Some(t) => format!("{t}  (property: {}, family: {}, shade: {})\n", t.property, t.family, t.shade),
            None => format!("{token}\n"),
        })
        .collect();

    if lines.is_empty() {
        "No raw color utilities found.\n".to_string()
    } else {
        lines.concat()
    }
}
