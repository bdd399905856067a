//! Command parsing and dispatch for the `scenario-match` entrypoint.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use eyre::{Context, Result, bail, eyre};
use scenario_match::{
    CompareConfig, ContentType, Delimiters, FieldMode, Scenario, SymbolTable, TemplateMode,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::logging::LogLevel;
use crate::output::{Format, write_comparison, write_resolved};

/// Compare expected templates against actual JSON or text.
#[derive(Parser, Debug)]
#[command(name = "scenario-match", author, version, about)]
pub(crate) struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Commands,
}

/// Supported commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare an expected template document against an actual document.
    Compare(CompareArgs),
    /// Substitute bound symbols into a template.
    Resolve(ResolveArgs),
}

/// Placeholder delimiter overrides shared by every command.
#[derive(Args, Debug, Default)]
struct DelimiterArgs {
    /// Text opening a placeholder, `~[` by default.
    #[arg(long)]
    placeholder_start: Option<String>,
    /// Text closing a placeholder, `]` by default.
    #[arg(long)]
    placeholder_end: Option<String>,
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// File holding the expected template document.
    #[arg(long)]
    expected: PathBuf,
    /// File holding the actual document; stdin when omitted.
    #[arg(long)]
    actual: Option<PathBuf>,
    /// Compare both sides as JSON.
    #[arg(long, conflicts_with = "text")]
    json: bool,
    /// Compare both sides as opaque text (the default).
    #[arg(long)]
    text: bool,
    /// Report fields present only in the actual document.
    #[arg(long, conflicts_with = "lenient")]
    strict: bool,
    /// Allow fields present only in the actual document.
    #[arg(long)]
    lenient: bool,
    /// Match letters exactly instead of ignoring case.
    #[arg(long)]
    case_sensitive: bool,
    /// How template text outside placeholders is read (auto, regex, literal).
    #[arg(long)]
    template_mode: Option<TemplateMode>,
    /// JSON object of symbols bound before comparing.
    #[arg(long)]
    symbols: Option<PathBuf>,
    /// Report style.
    #[arg(long, value_enum, default_value_t = Format::Human)]
    format: Format,
    #[command(flatten)]
    delimiters: DelimiterArgs,
}

#[derive(Args, Debug)]
struct ResolveArgs {
    /// Template whose placeholders are replaced.
    #[arg(long)]
    template: String,
    /// JSON object of symbol values.
    #[arg(long)]
    symbols: PathBuf,
    /// Escape substituted values for use inside a regex template.
    #[arg(long)]
    quoted: bool,
    #[command(flatten)]
    delimiters: DelimiterArgs,
}

/// Result of a completed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The command succeeded and, for comparisons, the documents matched.
    Success,
    /// The documents differ.
    Mismatch,
}

impl Cli {
    /// Execute the parsed command, writing its report to `stdout`.
    ///
    /// `stdin` supplies the actual document when no file is named.
    pub(crate) fn run(self, stdout: &mut dyn Write, stdin: &mut dyn Read) -> Result<Outcome> {
        let base = CompareConfig::from_env().wrap_err("failed to read SCENARIO_MATCH_* settings")?;
        match self.command {
            Commands::Compare(args) => handle_compare(&args, base, stdout, stdin),
            Commands::Resolve(args) => handle_resolve(&args, base, stdout),
        }
    }
}

fn handle_compare(
    args: &CompareArgs,
    base: CompareConfig,
    stdout: &mut dyn Write,
    stdin: &mut dyn Read,
) -> Result<Outcome> {
    let field_mode = if args.strict {
        Some(FieldMode::Strict)
    } else if args.lenient {
        Some(FieldMode::Lenient)
    } else {
        None
    };
    let delimiters = args.delimiters.resolve(&base.delimiters)?;
    let config = base.apply_overrides(
        field_mode,
        args.case_sensitive.then_some(false),
        delimiters,
        args.template_mode,
    );
    let content_type = if args.json {
        ContentType::Json
    } else {
        ContentType::Text
    };

    let expected = read_file(&args.expected, "expected")?;
    let actual = match &args.actual {
        Some(path) => read_file(path, "actual")?,
        None => {
            let mut buffer = String::new();
            stdin
                .read_to_string(&mut buffer)
                .wrap_err("failed to read actual document from stdin")?;
            buffer
        }
    };

    let mut scenario = Scenario::new(config);
    if let Some(path) = &args.symbols {
        for (name, value) in load_symbols(path)?.iter() {
            scenario.bind(name, value);
        }
    }
    debug!(?content_type, config = ?scenario.config(), "comparing documents");

    let result = scenario
        .compare(content_type, expected, actual)
        .wrap_err("comparison could not be carried out")?;
    write_comparison(stdout, &result, args.format)?;
    stdout.flush().wrap_err("failed to flush comparison report")?;
    if result.is_match() {
        info!(captured = result.captured().len(), "documents match");
        Ok(Outcome::Success)
    } else {
        info!(mismatches = result.mismatches().len(), "documents differ");
        Ok(Outcome::Mismatch)
    }
}

fn handle_resolve(args: &ResolveArgs, base: CompareConfig, stdout: &mut dyn Write) -> Result<Outcome> {
    let delimiters = args.delimiters.resolve(&base.delimiters)?;
    let mut scenario = Scenario::new(base.apply_overrides(None, None, delimiters, None));
    for (name, value) in load_symbols(&args.symbols)?.iter() {
        scenario.bind(name, value);
    }
    let resolved = if args.quoted {
        scenario.resolve_quoted(&args.template)
    } else {
        scenario.resolve(&args.template)
    }
    .wrap_err_with(|| format!("failed to resolve template '{}'", args.template))?;
    write_resolved(stdout, &resolved)?;
    stdout.flush().wrap_err("failed to flush resolved template")?;
    Ok(Outcome::Success)
}

impl DelimiterArgs {
    /// Combine flag overrides with `current`, or `None` when no flag is set.
    fn resolve(&self, current: &Delimiters) -> Result<Option<Delimiters>> {
        if self.placeholder_start.is_none() && self.placeholder_end.is_none() {
            return Ok(None);
        }
        let start = self
            .placeholder_start
            .clone()
            .unwrap_or_else(|| current.start().to_owned());
        let end = self
            .placeholder_end
            .clone()
            .unwrap_or_else(|| current.end().to_owned());
        Delimiters::new(start, end)
            .map(Some)
            .wrap_err("invalid placeholder delimiters")
    }
}

fn read_file(path: &Path, side: &str) -> Result<String> {
    fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {side} document {}", path.display()))
}

/// Load a JSON object of symbol names to scalar values.
fn load_symbols(path: &Path) -> Result<SymbolTable> {
    let text = read_file(path, "symbols")?;
    let value: Value = serde_json::from_str(&text)
        .wrap_err_with(|| format!("symbols file {} is not valid JSON", path.display()))?;
    let Value::Object(entries) = value else {
        bail!("symbols file {} must hold a JSON object", path.display());
    };
    entries
        .into_iter()
        .map(|(name, value)| {
            let text = match value {
                Value::String(text) => text,
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                other => {
                    return Err(eyre!(
                        "symbol '{name}' must be a string, number or boolean, found {other}"
                    ));
                }
            };
            Ok((name, text))
        })
        .collect()
}
