use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

use mb_cli::{run_bench, run_read, BenchConfig, ReadConfig};
use mb_gen::{SeedMode, ValueDistribution};
use mb_io::TextLayout;
use mb_tensor::ExecutionStrategy;

fn path_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_parser(value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn cli() -> Command {
    Command::new("matbench")
        .version(clap::crate_version!())
        .about("Dense matrix multiplication benchmark: sequential, thread pool, or device grid")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Generate two random matrices, multiply them, and report the time")
                .arg(
                    Arg::new("left-rows")
                        .long("left-rows")
                        .help("Rows of A")
                        .value_parser(value_parser!(usize))
                        .default_value("100"),
                )
                .arg(
                    Arg::new("left-cols")
                        .long("left-cols")
                        .alias("inner")
                        .help("Columns of A and rows of B")
                        .value_parser(value_parser!(usize))
                        .default_value("1000"),
                )
                .arg(
                    Arg::new("right-cols")
                        .long("right-cols")
                        .help("Columns of B")
                        .value_parser(value_parser!(usize))
                        .default_value("100"),
                )
                .arg(
                    Arg::new("strategy")
                        .short('s')
                        .long("strategy")
                        .help("Execution strategy: sequential, threads, or device")
                        .value_parser(ExecutionStrategy::from_str)
                        .default_value("sequential"),
                )
                .arg(
                    Arg::new("threads")
                        .long("threads")
                        .help("Worker threads for the threads strategy")
                        .value_parser(value_parser!(usize))
                        .default_value("16"),
                )
                .arg(
                    Arg::new("tile")
                        .long("tile")
                        .help("Block edge for the device strategy; output dimensions must be multiples of it")
                        .value_parser(value_parser!(usize))
                        .default_value("5"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Fixed seed for reproducible matrices")
                        .value_parser(value_parser!(u64))
                        .default_value("0")
                        .conflicts_with("time-seed"),
                )
                .arg(
                    Arg::new("time-seed")
                        .long("time-seed")
                        .help("Seed the generator from the current time")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("distribution")
                        .long("distribution")
                        .help("Element values: int (bounded integers) or unit (reals in [0, 1))")
                        .value_parser(ValueDistribution::from_str)
                        .default_value("int"),
                )
                .arg(
                    Arg::new("low")
                        .long("low")
                        .help("Smallest integer value (inclusive)")
                        .value_parser(value_parser!(i64))
                        .allow_negative_numbers(true)
                        .default_value("0"),
                )
                .arg(
                    Arg::new("high")
                        .long("high")
                        .help("Largest integer value (inclusive)")
                        .value_parser(value_parser!(i64))
                        .allow_negative_numbers(true)
                        .default_value("14"),
                )
                .arg(
                    Arg::new("layout")
                        .long("layout")
                        .help("Field layout of written files: fixed or tab")
                        .value_parser(TextLayout::from_str)
                        .default_value("fixed"),
                )
                .arg(
                    Arg::new("width")
                        .long("width")
                        .help("Field width for the fixed layout")
                        .value_parser(value_parser!(usize))
                        .default_value("10"),
                )
                .arg(path_arg("write-left", "Write A to this file"))
                .arg(path_arg("write-right", "Write B to this file"))
                .arg(path_arg("write-result", "Write the product to this file"))
                .arg(path_arg(
                    "verify",
                    "Compare the product against a reference matrix file",
                ))
                .arg(
                    Arg::new("tolerance")
                        .long("tolerance")
                        .help("Largest allowed |diff| when verifying")
                        .value_parser(value_parser!(f64))
                        .default_value("1e-9"),
                )
                .arg(
                    Arg::new("print-limit")
                        .long("print-limit")
                        .help("Print matrices whose dimensions are all at most this")
                        .value_parser(value_parser!(usize))
                        .default_value("8"),
                ),
        )
        .subcommand(
            Command::new("read")
                .about("Read a matrix file and print it")
                .arg(
                    Arg::new("path")
                        .help("Matrix file to read")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("rows")
                        .long("rows")
                        .help("Expected rows; infer the shape from the file when omitted")
                        .value_parser(value_parser!(usize))
                        .requires("cols"),
                )
                .arg(
                    Arg::new("cols")
                        .long("cols")
                        .help("Expected columns")
                        .value_parser(value_parser!(usize))
                        .requires("rows"),
                ),
        )
}

fn value<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, name: &str) -> Result<T> {
    matches
        .get_one::<T>(name)
        .cloned()
        .with_context(|| format!("missing value for --{}", name))
}

fn bench_config(matches: &ArgMatches) -> Result<BenchConfig> {
    let get = |name: &str| value::<usize>(matches, name);

    let strategy = match value::<ExecutionStrategy>(matches, "strategy")? {
        ExecutionStrategy::Sequential => ExecutionStrategy::Sequential,
        ExecutionStrategy::ThreadParallel { .. } => ExecutionStrategy::ThreadParallel {
            threads: get("threads")?,
        },
        ExecutionStrategy::DeviceParallel { .. } => {
            ExecutionStrategy::DeviceParallel { tile: get("tile")? }
        }
    };

    let seed = if matches.get_flag("time-seed") {
        SeedMode::Time
    } else {
        SeedMode::Fixed(value(matches, "seed")?)
    };

    let distribution = match value::<ValueDistribution>(matches, "distribution")? {
        ValueDistribution::Unit => ValueDistribution::Unit,
        ValueDistribution::Integers { .. } => {
            ValueDistribution::integers(value(matches, "low")?, value(matches, "high")?)?
        }
    };

    let layout = match value::<TextLayout>(matches, "layout")? {
        TextLayout::Tab => TextLayout::Tab,
        TextLayout::FixedWidth(_) => TextLayout::FixedWidth(get("width")?),
    };

    Ok(BenchConfig {
        left_rows: get("left-rows")?,
        inner: get("left-cols")?,
        right_cols: get("right-cols")?,
        strategy,
        seed,
        distribution,
        layout,
        write_left: matches.get_one::<PathBuf>("write-left").cloned(),
        write_right: matches.get_one::<PathBuf>("write-right").cloned(),
        write_result: matches.get_one::<PathBuf>("write-result").cloned(),
        verify: matches.get_one::<PathBuf>("verify").cloned(),
        tolerance: value(matches, "tolerance")?,
        print_limit: get("print-limit")?,
    })
}

fn read_config(matches: &ArgMatches) -> Result<ReadConfig> {
    let rows = matches.get_one::<usize>("rows").copied();
    let cols = matches.get_one::<usize>("cols").copied();
    Ok(ReadConfig {
        path: value(matches, "path")?,
        shape: rows.zip(cols),
    })
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(
            env_logger::Env::default()
                .filter_or("MATBENCH_LOG", "warn,mb_cli=info,mb_io=info"),
        )
        .init();

    let matches = cli().get_matches();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match matches.subcommand() {
        Some(("run", sub)) => {
            let config = bench_config(sub).context("invalid run arguments")?;
            run_bench(&config, &mut out).context("benchmark failed")?;
        }
        Some(("read", sub)) => {
            let config = read_config(sub)?;
            run_read(&config, &mut out)
                .with_context(|| format!("failed to read {}", config.path.display()))?;
        }
        _ => unreachable!("subcommand_required is set"),
    }
    Ok(())
}
