//! Gridcalc - a small spreadsheet driven from the command line

mod config;
mod logger;

use anyhow::{Context, Result, bail};
use gridcalc_core::storage::write_markdown;
use gridcalc_core::{CellRef, Document};
use gridcalc_engine::engine::{evaluate_expression, format_number, to_postfix};
use std::env;
use std::path::PathBuf;

use config::AppConfig;

fn print_usage() {
    eprintln!("Usage: gridcalc [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Spreadsheet file to open (.grd)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <EXPR>      Evaluate an expression and print the result");
    eprintln!("  --postfix                 With --command, print the postfix tokens instead");
    eprintln!("  --set <NAME=VALUE>        Bind a variable (--command) or set a cell");
    eprintln!("                            (can be repeated)");
    eprintln!("  -o, --output <FILE>       Export display values to a markdown file");
    eprintln!("  --save <FILE>             Write the sheet to a .grd file");
    eprintln!("  --demo                    Fill the sheet with demo content");
    eprintln!("  --config <FILE>           Read settings from a TOML file");
    eprintln!("  --log-level <LEVEL>       Log to stderr (error, warn, info, debug, trace)");
    eprintln!("  -h, --help                Print help");
}

#[derive(Default)]
struct Args {
    file_path: Option<PathBuf>,
    command: Option<String>,
    postfix: bool,
    assignments: Vec<(String, String)>,
    output_file: Option<PathBuf>,
    save_file: Option<PathBuf>,
    demo: bool,
    config_file: Option<PathBuf>,
    log_level: Option<String>,
}

fn required_value(args: &[String], i: usize, flag: &str, what: &str) -> String {
    match args.get(i) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {} requires {}", flag, what);
            std::process::exit(1);
        }
    }
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            "-c" | "--command" => {
                i += 1;
                parsed.command = Some(required_value(&args, i, "--command", "an expression"));
            }
            "--postfix" => parsed.postfix = true,
            "--set" => {
                i += 1;
                let assignment = required_value(&args, i, "--set", "NAME=VALUE");
                let Some((name, value)) = assignment.split_once('=') else {
                    eprintln!("Error: --set expects NAME=VALUE, got {}", assignment);
                    std::process::exit(1);
                };
                parsed
                    .assignments
                    .push((name.trim().to_string(), value.to_string()));
            }
            "-o" | "--output" => {
                i += 1;
                parsed.output_file = Some(PathBuf::from(required_value(
                    &args,
                    i,
                    "--output",
                    "a file path",
                )));
            }
            "--save" => {
                i += 1;
                parsed.save_file = Some(PathBuf::from(required_value(
                    &args,
                    i,
                    "--save",
                    "a file path",
                )));
            }
            "--demo" => parsed.demo = true,
            "--config" => {
                i += 1;
                parsed.config_file = Some(PathBuf::from(required_value(
                    &args,
                    i,
                    "--config",
                    "a file path",
                )));
            }
            "--log-level" => {
                i += 1;
                parsed.log_level = Some(required_value(&args, i, "--log-level", "a level"));
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if parsed.file_path.is_none() {
                    parsed.file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }
    parsed
}

/// Evaluate a standalone expression; a leading `=` is accepted.
fn run_command(expr: &str, args: &Args) -> Result<()> {
    let expr = expr.trim();
    let expr = expr.strip_prefix('=').unwrap_or(expr);

    if args.postfix {
        let tokens: Vec<String> = to_postfix(expr)?.iter().map(|t| t.to_string()).collect();
        println!("{}", tokens.join(" "));
        return Ok(());
    }

    let bindings = args
        .assignments
        .iter()
        .map(|(name, value)| {
            value
                .trim()
                .parse::<f64>()
                .map(|n| (name.clone(), n))
                .with_context(|| format!("{} must be a number, got {:?}", name, value))
        })
        .collect::<Result<Vec<_>>>()?;
    println!("{}", format_number(evaluate_expression(expr, &bindings)?));
    Ok(())
}

fn run_sheet(args: &Args, config: AppConfig) -> Result<()> {
    let mut doc = Document::with_file(args.file_path.clone(), config.sheet)?;

    if args.demo {
        doc.populate_demo(&mut rand::thread_rng())?;
    }

    for (name, text) in &args.assignments {
        let Some(cell_ref) = CellRef::from_str(name) else {
            bail!("Invalid cell reference: {}", name);
        };
        doc.set_cell_text(cell_ref.row as i64, cell_ref.col as i64, text)
            .with_context(|| format!("setting {}", cell_ref))?;
    }

    if let Some(path) = &args.save_file {
        doc.save_file_as(path)?;
        println!("Saved to {}", path.display());
    }

    if let Some(path) = &args.output_file {
        write_markdown(path, &doc).with_context(|| format!("writing {}", path.display()))?;
        println!("Exported to {}", path.display());
    } else if args.save_file.is_none() {
        for record in doc.records() {
            let Some(cell_ref) = CellRef::from_str(&record.name) else {
                continue;
            };
            println!("{}\t{}\t{}", record.name, record.text, doc.cell_display(&cell_ref));
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let config = AppConfig::load(args.config_file.as_deref())?;
    if let Some(level) = args.log_level.as_deref().or(config.log_level.as_deref()) {
        logger::init(level);
    }

    match &args.command {
        Some(expr) => run_command(expr, &args),
        None => run_sheet(&args, config),
    }
}

fn main() {
    let args = parse_args();
    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
