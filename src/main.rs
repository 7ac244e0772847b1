//! xmlnest CLI - Parse XML documents into trees and JSON

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::time::Instant;

use xmlnest::{Document, Element, Parser};

/// Lightweight XML-to-tree parser
#[derive(ClapParser)]
#[command(name = "xmlnest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log parser activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one or more XML files
    Parse {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Expand namespace prefixes in element names
        #[arg(short, long)]
        namespaces: bool,

        /// Match nested same-name tags by depth
        #[arg(long)]
        balanced: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(short, long, requires = "json")]
        pretty: bool,

        /// Show statistics
        #[arg(short, long)]
        stats: bool,
    },

    /// Benchmark parsing performance
    Bench {
        /// Input file
        input: PathBuf,

        /// Number of iterations
        #[arg(short, long, default_value = "100")]
        iterations: usize,

        /// Expand namespace prefixes in element names
        #[arg(short, long)]
        namespaces: bool,
    },
}

fn init_logging(verbose: bool) {
    if verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn depth(element: &Element) -> usize {
    1 + element.children().iter().map(depth).max().unwrap_or(0)
}

fn print_summary(doc: &Document) {
    if let Some(declaration) = &doc.declaration {
        let mut attributes: Vec<_> = declaration.attributes.iter().collect();
        attributes.sort();
        let header: Vec<String> = attributes
            .into_iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        println!("  Declaration: {}", header.join(" "));
    }
    match doc.root() {
        Some(root) => {
            println!("  Root: {}", root.name().bold());
            println!("  Elements: {}", doc.element_count());
            println!("  Depth: {}", depth(root));
        }
        None => println!("  Root: {}", "none".dimmed()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Parse {
            inputs,
            namespaces,
            balanced,
            json,
            pretty,
            stats,
        } => {
            let parser = Parser::new()
                .with_namespaces(namespaces)
                .with_balanced_nesting(balanced);

            let start = Instant::now();
            let results = parser.parse_files(&inputs);
            let elapsed = start.elapsed();

            let mut failed = 0;
            for (input, result) in inputs.iter().zip(results) {
                let doc = match result.with_context(|| format!("Failed to parse {}", input.display())) {
                    Ok(doc) => doc,
                    Err(e) => {
                        failed += 1;
                        eprintln!("{} {:#}", "✗".red().bold(), e);
                        continue;
                    }
                };

                if json {
                    println!("{}", doc.to_json(pretty)?);
                } else {
                    println!("{} {}", "✓".green().bold(), input.display());
                    print_summary(&doc);
                }
            }

            if stats {
                eprintln!("  Files: {} ({} failed)", inputs.len(), failed);
                eprintln!("  Time: {:.2}ms", elapsed.as_secs_f64() * 1000.0);
            }

            if failed > 0 {
                std::process::exit(1);
            }
        }

        Commands::Bench {
            input,
            iterations,
            namespaces,
        } => {
            let xml = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let parser = Parser::new().with_namespaces(namespaces);
            let iterations = iterations.max(1);

            // Warmup
            for _ in 0..3 {
                let _ = parser.parse_str(&xml)?;
            }

            let mut times = Vec::with_capacity(iterations);
            let mut elements = 0;

            for _ in 0..iterations {
                let start = Instant::now();
                let doc = parser.parse_str(&xml)?;
                times.push(start.elapsed());
                elements = doc.element_count();
            }

            times.sort();
            let min = times[0];
            let max = times[times.len() - 1];
            let median = times[times.len() / 2];
            let mean = times.iter().sum::<std::time::Duration>() / times.len() as u32;

            println!("Benchmark Results for {}", input.display());
            println!("  Iterations: {}", iterations);
            println!("  Elements: {}", elements);
            println!("  Min:    {:.3}ms", min.as_secs_f64() * 1000.0);
            println!("  Median: {:.3}ms", median.as_secs_f64() * 1000.0);
            println!("  Mean:   {:.3}ms", mean.as_secs_f64() * 1000.0);
            println!("  Max:    {:.3}ms", max.as_secs_f64() * 1000.0);
            println!(
                "  Throughput: {:.1} MB/s",
                xml.len() as f64 / mean.as_secs_f64() / 1_000_000.0
            );
        }
    }

    Ok(())
}
