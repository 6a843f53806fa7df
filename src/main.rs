use clap::{Args, Parser, Subcommand};
use pairsim::engine::cache::DumpCache;
use pairsim::{
    report, score_detailed, BatchEngine, PairsimConfig, PairsimError, PairsimResult, ReportFormat,
    Workspace,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pairsim", version, about = "Pairwise structural and textual similarity for source files")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (default: pairsim.toml or .pairsim.toml in the working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score every pair of the given files and directories
    Compare(CompareArgs),
    /// Score exactly two files
    Score(ScoreArgs),
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// Source files or directories
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Report files to write (csv, markdown, json, svg); repeatable
    #[arg(short, long = "format")]
    formats: Vec<ReportFormat>,

    /// Result directory (overrides config)
    #[arg(long)]
    results: Option<PathBuf>,

    /// Print the table only, write no files
    #[arg(long)]
    no_write: bool,

    /// Score pairs on one thread
    #[arg(long)]
    sequential: bool,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    a: PathBuf,
    b: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = load_config(cli.config.as_ref()).and_then(|config| match cli.command {
        Commands::Compare(args) => handle_compare(config, args),
        Commands::Score(args) => handle_score(args),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let exit_code = match &e {
            PairsimError::Config(_) => 2,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}

fn load_config(path: Option<&PathBuf>) -> PairsimResult<PairsimConfig> {
    match path {
        Some(p) => PairsimConfig::from_file(p),
        None => Ok(PairsimConfig::from_project_root(&std::env::current_dir()?)),
    }
}

fn handle_compare(mut config: PairsimConfig, args: CompareArgs) -> PairsimResult<()> {
    if args.sequential {
        config.parallel = false;
    }
    if let Some(dir) = args.results {
        config.result_dir = dir;
    }

    let engine = BatchEngine::new(config);
    let config = engine.config();
    let workspace = Workspace::from_config(config);
    let loaded = workspace.load_sources(&args.paths);

    let mut cache = if config.use_cache {
        DumpCache::load(workspace.result_dir())
    } else {
        DumpCache::ephemeral()
    };

    let mut batch = engine
        .compare_with_cache(&loaded.files, &mut cache)?
        .with_skipped(loaded.skipped);
    if !config.use_cache {
        batch.cache_hit_rate = None;
    }

    print!("{}", report::markdown::render(&batch));

    if !args.no_write {
        let formats = if args.formats.is_empty() {
            config.formats.as_slice()
        } else {
            args.formats.as_slice()
        };
        for path in workspace.write_results(&batch, formats)? {
            eprintln!("Wrote {}", path.display());
        }
    }

    if config.use_cache {
        std::fs::create_dir_all(workspace.result_dir())?;
        cache.save()?;
    }
    Ok(())
}

fn handle_score(args: ScoreArgs) -> PairsimResult<()> {
    let a = std::fs::read_to_string(&args.a)?;
    let b = std::fs::read_to_string(&args.b)?;
    let scored = score_detailed(&a, &b);
    println!(
        "{} ↔ {}: {}% (structure {:.1}%, text {:.1}%, {})",
        args.a.display(),
        args.b.display(),
        scored.score,
        scored.structural_ratio * 100.0,
        scored.raw_ratio * 100.0,
        scored.score.band()
    );
    Ok(())
}
