use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};

use ascl_core::Ast;
use ascl_emit::{Emitter, EmitterConfig, WatEmitter};
use ascl_gen::{GenConfig, GenOutput};

#[derive(Parser)]
#[command(name = "ascl")]
#[command(about = "ascl - lowers resolved contract ASTs to WebAssembly-style modules")]
#[command(version = "0.1.0")]
#[command(author = "Gianluca Brigandi <gbrigand@gmail.com>")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a module from a JSON-encoded AST and print it as WAT.
    Compile {
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        no_color: bool,

        /// Annotate each local with its slot and type.
        #[arg(long)]
        types: bool,

        #[arg(long)]
        data_offset: Option<u32>,

        #[arg(long)]
        initial_pages: Option<u32>,

        #[arg(long)]
        max_pages: Option<u32>,

        /// Do not export public functions.
        #[arg(long)]
        no_export: bool,

        #[arg(short, long, action = ArgAction::Count)]
        verbose: u8,
    },

    /// Generate and validate a module without printing it.
    Validate {
        input: PathBuf,

        #[arg(short, long, action = ArgAction::Count)]
        verbose: u8,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            input,
            output,
            no_color,
            types,
            data_offset,
            initial_pages,
            max_pages,
            no_export,
            verbose,
        } => {
            setup_logging(verbose)?;
            let mut config = GenConfig::default();
            if let Some(offset) = data_offset {
                config.data_offset = offset;
            }
            if let Some(pages) = initial_pages {
                config.initial_pages = pages;
            }
            config.max_pages = max_pages;
            config.export_public = !no_export;
            cmd_compile(input, output, config, no_color, types, verbose > 0)
        }
        Commands::Validate { input, verbose } => {
            setup_logging(verbose)?;
            cmd_validate(input, verbose > 0)
        }
    }
}

fn setup_logging(verbose: u8) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {}", e))?;

    Ok(())
}

fn load_ast(input: &Path) -> Result<Ast> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let ast: Ast = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse AST from {}", input.display()))?;
    ast.validate()
        .with_context(|| format!("malformed AST in {}", input.display()))?;
    Ok(ast)
}

fn report_diagnostics(output: &GenOutput) {
    use colored::*;

    for diag in &output.diagnostics {
        eprintln!("{} {}", "warning:".yellow().bold(), diag);
    }
}

fn cmd_compile(
    input: PathBuf,
    output: Option<PathBuf>,
    config: GenConfig,
    no_color: bool,
    types: bool,
    verbose: bool,
) -> Result<()> {
    use colored::*;
    use std::fs;
    use std::time::Instant;

    if no_color || output.is_some() {
        colored::control::set_override(false);
    }

    if verbose {
        eprintln!("{}", " ascl Compiler".bright_blue().bold());
        eprintln!("{}", "=".repeat(50).bright_blue());
        eprintln!(" Input: {}", input.display());
        if let Some(ref out) = output {
            eprintln!(" Output: {}", out.display());
        }
        eprintln!();
    }

    let start = Instant::now();
    let ast = load_ast(&input)?;

    if verbose {
        eprintln!(" Generating module...");
    }

    let generated = ascl_gen::gen(&ast, &config)
        .with_context(|| format!("code generation failed for {}", input.display()))?;
    report_diagnostics(&generated);

    let emitter = WatEmitter::new(EmitterConfig {
        use_colors: !no_color && output.is_none(),
        include_types: types,
        ..EmitterConfig::default()
    });
    let text = emitter.emit_to_string(&generated.module)?;

    if let Some(output_path) = output {
        fs::write(&output_path, &text)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        if verbose {
            let elapsed = start.elapsed();
            eprintln!("{}", " Compilation successful".bright_green().bold());
            eprintln!("   Time: {:.3}s", elapsed.as_secs_f64());
            eprintln!("   Output: {}", output_path.display());
        }
    } else {
        print!("{}", text);
    }

    Ok(())
}

fn cmd_validate(input: PathBuf, verbose: bool) -> Result<()> {
    use colored::*;

    if verbose {
        println!("{}", " Validating module".bright_cyan().bold());
        println!("{}", "=".repeat(50).bright_cyan());
        println!(" Input: {}", input.display());
        println!();
    }

    let ast = load_ast(&input)?;

    match ascl_gen::gen(&ast, &GenConfig::default()) {
        Ok(generated) if generated.diagnostics.is_empty() => {
            println!("{}", " VALID".bright_green().bold());
            if verbose {
                let module = &generated.module;
                println!(
                    "   {} functions, {} globals, {} data segments",
                    module.functions.len(),
                    module.globals.len(),
                    module.data.len()
                );
            }
            Ok(())
        }
        Ok(generated) => {
            println!("{}", " INVALID".bright_red().bold());
            report_diagnostics(&generated);
            Err(anyhow::anyhow!(
                "Validation failed with {} diagnostics",
                generated.diagnostics.len()
            ))
        }
        Err(e) => {
            println!("{}", " INVALID".bright_red().bold());
            println!("\n{}", "Generation Error:".bright_red());
            println!("{}", e);
            Err(anyhow::anyhow!("Validation failed"))
        }
    }
}
