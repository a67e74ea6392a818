// SPDX-License-Identifier: AGPL-3.0-or-later
//! mkdown CLI - convert Markdown files to HTML.
//!
//! Options come from built-in defaults, then `mkdown.toml` (if present),
//! then command line flags.

mod config;
mod error;
mod output;

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Parser;
use mkdown_core::{
    normalize, BatchPolicy, ConversionRequest, Converter, EffectiveConfig, RawOptions,
    RenderedOutput,
};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use error::CliError;
use output::Output;

/// Convert one or more Markdown files to HTML.
#[derive(Parser, Debug)]
#[command(name = "mkdown", version, about)]
struct Cli {
    /// Markdown files to convert (standard input when omitted).
    files: Vec<PathBuf>,

    /// Config file (default: ./mkdown.toml when it exists).
    #[arg(short, long, env = "MKDOWN_CONFIG")]
    config: Option<PathBuf>,

    /// Generate a table of contents (implies --latex=false).
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    toc: Option<bool>,

    /// Generate only the table of contents (implies --toc).
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    toc_only: Option<bool>,

    /// Generate a standalone HTML page (implies --latex=false).
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    page: Option<bool>,

    /// Generate LaTeX output instead of HTML (not supported by any driver).
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    latex: Option<bool>,

    /// Apply smartypants-style substitutions [default: true].
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    smartypants: Option<bool>,

    /// Use LaTeX-style dash rules for smartypants [default: true].
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    latexdashes: Option<bool>,

    /// Use fraction glyphs for smartypants [default: true].
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    fractions: Option<bool>,

    /// Bare minimum HTML tags and attributes [default: true].
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    html_simple: Option<bool>,

    /// Link to a CSS stylesheet (implies --page).
    #[arg(long)]
    css: Option<String>,

    /// Page title (default: the document's leading heading).
    #[arg(long)]
    title: Option<String>,

    /// Output file (default: standard output).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Renderer driver: cm (comrak) or pd (pulldown-cmark).
    #[arg(short, long, env = "MKDOWN_DRIVER")]
    driver: Option<String>,

    /// Continue with the remaining files after a failure.
    #[arg(long)]
    keep_going: bool,

    /// List the available drivers and exit.
    #[arg(long)]
    list_drivers: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Override `raw` with every option given on the command line.
    fn apply_to(&self, raw: &mut RawOptions) {
        let flags = [
            (self.toc, &mut raw.toc),
            (self.toc_only, &mut raw.toc_only),
            (self.page, &mut raw.page),
            (self.latex, &mut raw.latex),
            (self.smartypants, &mut raw.smartypants),
            (self.latexdashes, &mut raw.latexdashes),
            (self.fractions, &mut raw.fractions),
            (self.html_simple, &mut raw.html_simple),
        ];
        for (given, slot) in flags {
            if let Some(value) = given {
                *slot = value;
            }
        }

        if let Some(css) = &self.css {
            raw.css.clone_from(css);
        }
        if let Some(output) = &self.output {
            raw.output = output.display().to_string();
        }
        if let Some(driver) = &self.driver {
            raw.driver.clone_from(driver);
        }
        if self.title.is_some() {
            raw.title.clone_from(&self.title);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, env.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(&cli, &output) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// `--verbose` enables INFO level, otherwise RUST_LOG with WARN as the default.
fn log_filter(verbose: bool, env: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("info");
    }
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(env.unwrap_or_default())
}

fn run(cli: &Cli, output: &Output) -> Result<(), CliError> {
    let converter = Converter::default();

    if cli.list_drivers {
        let default_id = converter.registry().default_id();
        for descriptor in converter.registry().descriptors() {
            let marker = if descriptor.id == default_id { " (default)" } else { "" };
            println!("{}\t{}{marker}", descriptor.id, descriptor.name);
        }
        return Ok(());
    }

    let mut raw = config::load(cli.config.as_deref())?;
    cli.apply_to(&mut raw);
    let config = normalize(&raw);

    if cli.files.len() > 1 && config.output_destination.is_some() {
        return Err(CliError::Validation(
            "--output accepts a single input file".to_string(),
        ));
    }

    if let Some(descriptor) = converter.describe(&config.backend) {
        output.highlight(&format!("Use driver: {}", descriptor.name));
    }

    if cli.files.is_empty() {
        let input = read_stdin()?;
        let rendered = converter.convert(&ConversionRequest::new(input, config.clone()))?;
        report_converted("<stdin>", &rendered, &config, output);
        return Ok(());
    }

    let policy = if cli.keep_going {
        BatchPolicy::Continue
    } else {
        BatchPolicy::FailFast
    };
    convert_files(&converter, &cli.files, &config, policy, output)
}

/// Read and convert each file in turn.
///
/// A file that cannot be read counts as a failed document, so under
/// [`BatchPolicy::Continue`] the remaining files are still converted. A
/// single input reports its own error instead of a batch summary.
fn convert_files(
    converter: &Converter,
    files: &[PathBuf],
    config: &EffectiveConfig,
    policy: BatchPolicy,
    output: &Output,
) -> Result<(), CliError> {
    let total = files.len();
    let mut failed = 0;
    for (index, path) in files.iter().enumerate() {
        let name = path.display().to_string();
        let result = read_file(path).and_then(|input| {
            converter
                .convert(&ConversionRequest::new(input, config.clone()))
                .map_err(CliError::from)
        });
        match result {
            Ok(rendered) => report_converted(&name, &rendered, config, output),
            Err(err) if total == 1 => return Err(err),
            Err(err) => {
                output.error(&format!("{name}: {err}"));
                failed += 1;
                if policy == BatchPolicy::FailFast {
                    return Err(CliError::Batch {
                        failed,
                        skipped: total - index - 1,
                        total,
                    });
                }
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Batch {
            failed,
            skipped: 0,
            total,
        });
    }
    Ok(())
}

fn report_converted(
    name: &str,
    rendered: &RenderedOutput,
    config: &EffectiveConfig,
    output: &Output,
) {
    tracing::info!(
        input = %name,
        backend = rendered.backend,
        bytes = rendered.bytes.len(),
        "converted"
    );
    if let Some(path) = &config.output_destination {
        output.success(&format!("Wrote {}", path.display()));
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_stdin() -> Result<Vec<u8>, CliError> {
    let mut buf = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buf)
        .map_err(CliError::Stdin)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mkdown").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_flags_keep_config_values() {
        let mut raw = RawOptions {
            toc: true,
            driver: "pd".into(),
            ..RawOptions::default()
        };
        let expected = raw.clone();
        parse(&["doc.md"]).apply_to(&mut raw);
        assert_eq!(raw, expected);
    }

    #[test]
    fn test_flags_override() {
        let mut raw = RawOptions::default();
        parse(&[
            "--toc",
            "--smartypants=false",
            "--css",
            "style.css",
            "-d",
            "pd",
            "-o",
            "out.html",
            "doc.md",
        ])
        .apply_to(&mut raw);
        assert!(raw.toc);
        assert!(!raw.smartypants);
        assert_eq!(raw.css, "style.css");
        assert_eq!(raw.driver, "pd");
        assert_eq!(raw.output, "out.html");

        let config = normalize(&raw);
        assert!(config.standalone_page);
    }

    #[test]
    fn test_bare_flag_does_not_swallow_file() {
        let cli = parse(&["--toc", "doc.md"]);
        assert_eq!(cli.toc, Some(true));
        assert_eq!(cli.files, vec![PathBuf::from("doc.md")]);
    }

    #[test]
    fn test_files_are_positional() {
        let cli = parse(&["a.md", "b.md", "--keep-going"]);
        assert_eq!(cli.files, vec![PathBuf::from("a.md"), PathBuf::from("b.md")]);
        assert!(cli.keep_going);
    }

    #[test]
    fn test_driver_and_config_read_environment() {
        use clap::CommandFactory;

        let command = Cli::command();
        let env_of = |id: &str| {
            command
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .map(|name| name.to_string_lossy().into_owned())
        };
        assert_eq!(env_of("driver").as_deref(), Some("MKDOWN_DRIVER"));
        assert_eq!(env_of("config").as_deref(), Some("MKDOWN_CONFIG"));
    }

    #[test]
    fn test_read_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.md");
        let err = read_file(&missing).unwrap_err();
        assert!(matches!(err, CliError::Read { path, .. } if path == missing));
    }

    fn batch_fixture() -> (tempfile::TempDir, Vec<PathBuf>, EffectiveConfig) {
        let dir = tempfile::tempdir().unwrap();
        let readable = dir.path().join("a.md");
        std::fs::write(&readable, "# A\n").unwrap();
        let files = vec![dir.path().join("missing.md"), readable];
        let config = EffectiveConfig {
            output_destination: Some(dir.path().join("out.html")),
            ..EffectiveConfig::default()
        };
        (dir, files, config)
    }

    #[test]
    fn test_keep_going_converts_past_unreadable_file() {
        let (dir, files, config) = batch_fixture();
        let err = convert_files(
            &Converter::default(),
            &files,
            &config,
            BatchPolicy::Continue,
            &Output::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CliError::Batch {
                failed: 1,
                skipped: 0,
                total: 2
            }
        ));
        let html = std::fs::read_to_string(dir.path().join("out.html")).unwrap();
        assert!(html.contains("<h1>A</h1>"));
    }

    #[test]
    fn test_fail_fast_stops_at_unreadable_file() {
        let (dir, files, config) = batch_fixture();
        let err = convert_files(
            &Converter::default(),
            &files,
            &config,
            BatchPolicy::FailFast,
            &Output::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CliError::Batch {
                failed: 1,
                skipped: 1,
                total: 2
            }
        ));
        assert_eq!(err.to_string(), "1 of 2 documents failed to convert, 1 skipped");
        assert!(!dir.path().join("out.html").exists());
    }

    #[test]
    fn test_single_file_reports_its_own_error() {
        let (_dir, files, config) = batch_fixture();
        let err = convert_files(
            &Converter::default(),
            &files[..1],
            &config,
            BatchPolicy::Continue,
            &Output::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }

    #[test]
    fn test_log_filter_defaults_to_warn() {
        assert_eq!(log_filter(false, None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(false, Some("")).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(
            log_filter(false, Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(log_filter(true, None).max_level_hint(), Some(LevelFilter::INFO));
    }
}
