//! arborium-pandoc CLI - pandoc JSON filter with syntax highlighting.

use anyhow::{Context, Result};
use arborium_pandoc::{
    ArboriumHighlighter, Filter, FilterOptions, FilterStats, GrammarRegistry, Outcome,
};
use clap::Parser;
use owo_colors::OwoColorize;
use std::io;

/// Pandoc filter that syntax-highlights fenced code blocks with arborium.
///
/// Reads pandoc's JSON AST on stdin and writes it back to stdout with every code
/// block in a registered language replaced by highlighted HTML.
#[derive(Debug, Parser)]
#[command(name = "arborium-pandoc", version)]
struct Args {
    /// Output format pandoc is converting to (pandoc passes it as the first argument)
    #[arg(default_value = "html")]
    format: String,

    /// Show per-block decisions and a summary on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Highlight another fence name, optionally with a different grammar (e.g. rs=rust)
    #[arg(long = "grammar", value_name = "ID[=GRAMMAR]")]
    grammars: Vec<String>,

    /// Start from an empty registry instead of the default languages
    #[arg(long)]
    no_default_grammars: bool,

    /// Leave code blocks alone unless the output format renders raw HTML
    #[arg(long)]
    html_only: bool,

    /// Print the registered languages and exit
    #[arg(long)]
    list_languages: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let registry = build_registry(&args)?;

    if args.list_languages {
        for (id, grammar) in registry.languages() {
            println!("{id}\t{grammar}");
        }
        return Ok(());
    }

    let options = FilterOptions {
        format: args.format.clone(),
        html_only: args.html_only,
    };

    if args.verbose {
        eprintln!(
            "{} Filtering for {} with {} registered languages",
            "arborium-pandoc".green().bold(),
            options.format.cyan(),
            registry.len()
        );
    }

    let mut filter = Filter::new(options, ArboriumHighlighter::new(&registry));
    let stats = filter
        .process(io::stdin().lock(), io::stdout().lock())
        .context("failed to filter pandoc document")?;

    print_report(&stats, args.verbose);

    Ok(())
}

fn build_registry(args: &Args) -> Result<GrammarRegistry> {
    let mut registry = if args.no_default_grammars {
        GrammarRegistry::new()
    } else {
        GrammarRegistry::default()
    };

    for spec in &args.grammars {
        registry
            .register_spec(spec)
            .with_context(|| format!("invalid --grammar value {spec:?}"))?;
    }

    Ok(registry)
}

fn print_report(stats: &FilterStats, verbose: bool) {
    if verbose {
        if !stats.api_version_supported {
            eprintln!(
                "  {} pandoc-api-version {} is not 1.23.x; output may be rejected by pandoc",
                "Warning:".yellow(),
                stats.api_version_string()
            );
        }

        for (index, outcome) in stats.report.outcomes.iter().enumerate() {
            match outcome {
                Outcome::Highlighted { language } => {
                    eprintln!("  {} code block #{} ({})", "✓".green(), index + 1, language)
                }
                Outcome::NoLanguage => {
                    eprintln!("  {} code block #{} (no language)", "-".dimmed(), index + 1)
                }
                Outcome::Unsupported { language } => {
                    eprintln!(
                        "  {} code block #{} ({}, unsupported)",
                        "-".yellow(),
                        index + 1,
                        language
                    )
                }
            }
        }

        eprintln!("{}", "Results:".bold());
        eprintln!(
            "  {} code blocks highlighted",
            stats.report.blocks_highlighted().to_string().green()
        );
        eprintln!(
            "  {} code blocks skipped (no language or unsupported)",
            stats.report.blocks_skipped().to_string().yellow()
        );
        eprintln!(
            "  {} bytes in, {} bytes out",
            stats.bytes_input.to_string().cyan(),
            stats.bytes_output.to_string().cyan()
        );
    }

    let unsupported = stats.report.unsupported_languages();
    if !unsupported.is_empty() {
        eprintln!(
            "  {} Unsupported languages: {}",
            "Note:".yellow(),
            unsupported.join(", ")
        );
    }

    if verbose {
        eprintln!(
            "\n  Completed in {:.2}ms",
            stats.process_duration.as_secs_f64() * 1000.0
        );
    }
}
