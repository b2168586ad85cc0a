//! Check command implementation.

use anyhow::{Context, Result};
use chroma_lint_core::{Analyzer, Config, NoRawColor, ResolvedOptions, NAME};
use chroma_lint_ts::TypeScriptParser;
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Command-line additions layered over the resolved configuration.
#[derive(Debug, Default)]
pub struct Overrides {
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Extra exempt file path substrings.
    pub allow_files: Vec<String>,
    /// Extra exempt property names.
    pub allow_properties: Vec<String>,
    /// Fail on unparsable files.
    pub strict: bool,
}

/// Runs the check command.
///
/// Returns `true` when violations reach the configured `fail_on` threshold.
pub fn run(
    path: &Path,
    format: OutputFormat,
    overrides: &Overrides,
    source: &ConfigSource,
) -> Result<bool> {
    let config = load_config(source)?;
    let fail_on = config.fail_on();
    let options = apply_overrides(config.rule_options(NAME), overrides);
    let rule = NoRawColor::with_options(options);

    let analyzer = Analyzer::builder()
        .root(path)
        .parser(TypeScriptParser::new())
        .rule(rule)
        .excludes(overrides.exclude.iter().cloned())
        .fail_on_parse_error(overrides.strict)
        .config(config)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, format, analyzer.root())?;

    Ok(result.has_violations_at(fail_on))
}

/// Loads the configuration the resolver pointed at.
pub fn load_config(source: &ConfigSource) -> Result<Config> {
    match source {
        ConfigSource::Default => Ok(Config::default()),
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
        }
    }
}

fn apply_overrides(options: ResolvedOptions, overrides: &Overrides) -> ResolvedOptions {
    let options = overrides
        .allow_files
        .iter()
        .fold(options, |o, f| o.with_allowed_file(f.as_str()));
    overrides
        .allow_properties
        .iter()
        .fold(options, |o, p| o.with_allowed_property(p.as_str()))
}
