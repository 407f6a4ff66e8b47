use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cmd_corpus::catalog::Catalogs;
use cmd_corpus::config::{self, CorpusConfig};
use cmd_corpus::corpus::CorpusAssembler;
use cmd_corpus::output;
use cmd_corpus::report;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Command, GenerateArgs, InitArgs, RootArgs, VerifyArgs};

fn main() -> Result<ExitCode> {
    let args = RootArgs::parse();
    let verbose = matches!(&args.command, Command::Generate(generate) if generate.verbose);
    init_tracing(verbose);

    match args.command {
        Command::Generate(args) => run_generate(args),
        Command::Verify(args) => run_verify(args),
        Command::Init(args) => run_init(args),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_inputs(args: &GenerateArgs) -> Result<(CorpusConfig, Catalogs)> {
    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::default_config(),
    };
    let catalogs = match &args.catalog_dir {
        Some(dir) => Catalogs::load_dir(dir)?,
        None => Catalogs::embedded()?,
    };
    catalogs.validate().context("validate catalogs")?;
    catalogs.lint();
    Ok((config, catalogs))
}

fn run_generate(args: GenerateArgs) -> Result<ExitCode> {
    let (config, catalogs) = load_inputs(&args)?;
    let segments = args.dataset.segments();
    let requests = segments
        .iter()
        .map(|&kind| {
            let count = match args.sample {
                Some(sample) => sample,
                None => config.segment(kind)?.target,
            };
            Ok((kind, count))
        })
        .collect::<Result<Vec<_>>>()?;

    let rule = "=".repeat(50);
    println!("{rule}\nCommand Correction Training Data Generator\n{rule}");
    match &args.catalog_dir {
        Some(dir) => println!("Catalogs: {}", dir.display()),
        None => println!("Catalogs: built-in"),
    }
    println!("Output: {}", args.output_dir.display());
    println!("Seed: {}", args.seed);
    if let Some(sample) = args.sample {
        println!("Sample size: {sample}");
    }

    let assembler = CorpusAssembler::new(&config, &catalogs);
    let mut corpus = Vec::with_capacity(requests.len());
    for &(kind, count) in &requests {
        println!("\nGenerating {}: {}", kind.file_stem(), kind.description());
        let segment = assembler.build_segment(kind, count, args.seed)?;
        println!("  Generated {} examples", segment.examples.len());
        let files = output::write_segment(&args.output_dir, &segment)?;
        println!("  Saved to {}", files.chat.display());
        println!("  Analysis saved to {}", files.analysis.display());
        corpus.push(segment);
    }

    let final_dir = args.final_dir();
    if !args.no_combine && corpus.len() > 1 {
        let splits = assembler.split(&corpus, args.seed);
        let total = splits.total();
        println!("\nDataset splits:");
        for (name, part) in splits.parts() {
            let share = if total == 0 {
                0.0
            } else {
                part.len() as f64 / total as f64 * 100.0
            };
            println!("  {}: {} ({share:.1}%)", capitalize(name), part.len());
        }
        for path in output::write_splits(&final_dir, &splits)? {
            println!("  Saved {}", path.display());
        }
    }

    print_statistics(&args.output_dir, &final_dir)?;
    println!("\n{rule}\nGeneration complete!\n{rule}");
    Ok(ExitCode::SUCCESS)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn print_statistics(output_dir: &Path, final_dir: &Path) -> Result<()> {
    let rule = "=".repeat(50);
    println!("\n{rule}\nDataset Statistics\n{rule}");
    for path in output::jsonl_files(output_dir)? {
        let name = file_name(&path);
        if name.contains("_analysis") {
            continue;
        }
        println!("  {name}: {} examples", output::count_lines(&path)?);
    }
    if final_dir.is_dir() {
        println!("\nFinal splits:");
        for path in output::jsonl_files(final_dir)? {
            println!("  {}: {} examples", file_name(&path), output::count_lines(&path)?);
        }
    }
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn run_verify(args: VerifyArgs) -> Result<ExitCode> {
    if !args.dir.is_dir() {
        return Err(anyhow!("directory not found: {}", args.dir.display()));
    }
    let report = report::analyze_dir(&args.dir)?;
    if args.json {
        let text = serde_json::to_string_pretty(&report.summary_json())
            .context("serialize verification summary")?;
        println!("{text}");
    } else {
        print!("{}", report.render_text());
    }
    Ok(if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_init(args: InitArgs) -> Result<ExitCode> {
    if args.config.exists() && !args.force {
        return Err(anyhow!(
            "{} already exists (use --force to overwrite)",
            args.config.display()
        ));
    }
    let stub = config::config_stub()?;
    if let Some(parent) = args.config.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(&args.config, stub).with_context(|| format!("write {}", args.config.display()))?;
    println!("wrote {}", args.config.display());
    Ok(ExitCode::SUCCESS)
}
