use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use ramsey_extend::clique::MonochromaticCliques;
use ramsey_extend::config::ExtendConfig;
use ramsey_extend::constraint::FilterOrder;
use ramsey_extend::graph::ColorMatrix;
use ramsey_extend::search::{run_extension_search, SearchOutcome};
use ramsey_extend::validate::{validate_bundled_colorings, validate_coloring};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ramsey-extend", version)]
#[command(about = "Extend a two-coloring of K_N by one vertex without creating monochromatic K-cliques")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a one-vertex extension and print the extended matrix
    Extend(ExtendArgs),

    /// Count (and optionally list) monochromatic cliques of a given size
    Cliques {
        /// Matrix file (N*N characters '0'/'1', other characters ignored)
        file: PathBuf,

        /// Clique size to enumerate
        #[arg(short, long)]
        size: usize,

        /// Base order to enforce instead of inferring it
        #[arg(long)]
        order: Option<usize>,

        /// Print every clique with its color
        #[arg(long)]
        dump: bool,
    },

    /// Verify that a matrix has no monochromatic clique of a given size
    Check {
        /// Matrix file
        file: PathBuf,

        /// Clique size that must be absent
        #[arg(short = 'k', long)]
        clique_size: usize,

        /// Base order to enforce instead of inferring it
        #[arg(long)]
        order: Option<usize>,
    },

    /// Validate the bundled colorings
    Validate,
}

#[derive(Args)]
struct ExtendArgs {
    /// Matrix file
    file: PathBuf,

    /// JSON config file; command-line options override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Clique size K to avoid
    #[arg(short = 'k', long)]
    clique_size: Option<usize>,

    /// Base order to enforce instead of inferring it
    #[arg(long)]
    order: Option<usize>,

    /// Number of low-order bits pre-filtered through the candidate universe
    #[arg(short = 'b', long)]
    filter_width: Option<u32>,

    /// Number of filter batches
    #[arg(long)]
    batches: Option<usize>,

    /// Order in which constraints are applied to the universe
    #[arg(long, value_enum)]
    filter_order: Option<FilterOrderArg>,

    /// Give up after this many high-bit patterns
    #[arg(long)]
    max_outer_steps: Option<u64>,

    /// Log every candidate row (implies trace logging)
    #[arg(long)]
    show_candidates: bool,

    /// Track the deepest constraint reached by a failing candidate
    #[arg(long)]
    track_deepest: bool,

    /// Re-check the extended matrix with the exact clique oracle
    #[arg(long)]
    verify: bool,

    /// Write the extended matrix to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print search statistics as one JSON line on stderr
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterOrderArg {
    AsFound,
    LeastOverlapFirst,
}

impl From<FilterOrderArg> for FilterOrder {
    fn from(arg: FilterOrderArg) -> Self {
        match arg {
            FilterOrderArg::AsFound => FilterOrder::AsFound,
            FilterOrderArg::LeastOverlapFirst => FilterOrder::LeastOverlapFirst,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let show_candidates = matches!(&cli.command, Commands::Extend(args) if args.show_candidates);
    init_tracing(cli.verbose, show_candidates);

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8, show_candidates: bool) {
    let level = match (verbose, show_candidates) {
        (_, true) | (3.., _) => "trace",
        (2, _) => "debug",
        (1, _) => "info",
        _ => "warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Extend(args) => extend(args),
        Commands::Cliques {
            file,
            size,
            order,
            dump,
        } => cliques(&file, size, order, dump),
        Commands::Check {
            file,
            clique_size,
            order,
        } => check(&file, clique_size, order),
        Commands::Validate => match validate_bundled_colorings() {
            Ok(()) => {
                println!("Validation OK: bundled colorings are clique-free.");
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                eprintln!("Validation FAILED: {e}");
                Ok(ExitCode::from(1))
            }
        },
    }
}

fn load(file: &Path, order: Option<usize>) -> Result<ColorMatrix> {
    ColorMatrix::load_from_file(file, order)
        .with_context(|| format!("failed to load matrix from {}", file.display()))
}

fn build_config(args: &ExtendArgs) -> Result<ExtendConfig> {
    let mut config = match &args.config {
        Some(path) => ExtendConfig::load_from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ExtendConfig::default(),
    };
    if let Some(k) = args.clique_size {
        config.clique_size = k;
    }
    if let Some(order) = args.order {
        config.expected_order = Some(order);
    }
    if let Some(width) = args.filter_width {
        config.filter_width = width;
    }
    if let Some(batches) = args.batches {
        config.filter_batches = batches;
    }
    if let Some(order) = args.filter_order {
        config.filter_order = order.into();
    }
    if args.max_outer_steps.is_some() {
        config.max_outer_steps = args.max_outer_steps;
    }
    config.show_candidates |= args.show_candidates;
    config.track_deepest |= args.track_deepest;
    Ok(config)
}

fn extend(args: ExtendArgs) -> Result<ExitCode> {
    let config = build_config(&args)?;
    let base = load(&args.file, config.expected_order)?;
    let report = run_extension_search(&base, &config).context("extension search failed")?;

    if args.json {
        eprintln!("{}", serde_json::to_string(&report.stats)?);
    }

    match report.outcome {
        SearchOutcome::Found(ext) => {
            if args.verify {
                if let Err(e) = validate_coloring(&ext.matrix, config.clique_size) {
                    eprintln!("Verification FAILED: {e}");
                    return Ok(ExitCode::from(1));
                }
            }
            match &args.output {
                Some(path) => ext
                    .matrix
                    .save_to_file(path)
                    .with_context(|| format!("failed to write matrix to {}", path.display()))?,
                None => {
                    let stdout = io::stdout();
                    let mut out = stdout.lock();
                    ext.matrix.write_to(&mut out)?;
                    out.flush()?;
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        SearchOutcome::Exhausted => {
            println!("Exhausted possibilities! No such extension of the current graph");
            Ok(ExitCode::from(1))
        }
        SearchOutcome::CapReached => {
            eprintln!(
                "Stopped after {} outer steps without finding an extension",
                report.stats.outer_steps
            );
            Ok(ExitCode::from(1))
        }
    }
}

fn cliques(file: &Path, size: usize, order: Option<usize>, dump: bool) -> Result<ExitCode> {
    anyhow::ensure!(size >= 2, "clique size must be at least 2");
    let matrix = load(file, order)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut count = 0usize;
    for clique in MonochromaticCliques::new(&matrix, size) {
        count += 1;
        if dump {
            for v in clique.members() {
                write!(out, "{v:2} ")?;
            }
            writeln!(out, "{}", clique.color())?;
        }
    }
    writeln!(out, "Found {count} monochromatic {size}-cliques")?;
    out.flush()?;
    Ok(ExitCode::SUCCESS)
}

fn check(file: &Path, clique_size: usize, order: Option<usize>) -> Result<ExitCode> {
    anyhow::ensure!(clique_size >= 2, "clique size must be at least 2");
    let matrix = load(file, order)?;
    match validate_coloring(&matrix, clique_size) {
        Ok(()) => {
            println!(
                "OK: no monochromatic {clique_size}-clique in {} vertices",
                matrix.order()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("FAILED: {e}");
            Ok(ExitCode::from(1))
        }
    }
}
