//! tomark CLI - HTML to Markdown converter

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use tomark::{ToMarkOptions, ToMarkService, DEFAULT_MAX_DEPTH};

#[derive(Parser)]
#[command(name = "tomark")]
#[command(version)]
#[command(about = "Convert HTML to Markdown", long_about = None)]
struct Cli {
    /// Input HTML file (stdin if not specified or "-")
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Emit basic Markdown instead of GitHub Flavored Markdown
    #[arg(long)]
    basic: bool,

    /// Maximum element nesting depth
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let html = read_input(cli.input.as_ref())?;

    let service = ToMarkService::with_options(ToMarkOptions {
        gfm: !cli.basic,
        max_depth: cli.max_depth,
    });
    let mut markdown = service.convert(&html)?;
    if !markdown.is_empty() {
        markdown.push('\n');
    }

    match cli.output {
        Some(path) => {
            fs::write(&path, &markdown)?;
            log::info!("wrote {} bytes to {}", markdown.len(), path.display());
        }
        None => io::stdout().write_all(markdown.as_bytes())?,
    }

    Ok(())
}

fn read_input(input: Option<&PathBuf>) -> io::Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path),
        _ => {
            let mut html = String::new();
            io::stdin().read_to_string(&mut html)?;
            Ok(html)
        }
    }
}
