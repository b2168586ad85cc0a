//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# chroma-lint configuration
# Flags raw palette utilities (bg-red-500, text-sky-600, ...) outside exempt contexts.

# Lowest severity that makes `chroma-lint check` exit non-zero
fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/node_modules/**",
    "**/dist/**",
    "**/build/**",
    "**/.next/**",
]

# File extensions to analyze
extensions = ["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"]

# Respect .gitignore files
respect_gitignore = true

# Worker threads (default: one per core)
# parallelism = 4

[rules.no-raw-color]
enabled = true
# severity = "warning"  # Override default severity

# Files whose path contains any of these substrings are skipped entirely
allowedFiles = [
    "style-guide/",
]

# Object keys whose string values may hold raw colors
allowedProperties = ["color", "gradient", "iconBg", "iconColor"]

# Shown alongside every violation
# doc_ref = "docs/COLOR_CONTRACT.md"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("chroma-lint.toml");
    write_config(config_path, force)?;

    println!("Created chroma-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit chroma-lint.toml to list exempt files and properties");
    println!("  2. Run: chroma-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}
