use clap::{Parser, Subcommand};
use es_app::{AppConfig, AppResult, PlotOptions, Scenario, TableNodeFactory};
use es_viz::{DrawOptions, Layout};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "es-cli")]
#[command(about = "Energy system scenarios - load, check, solve and plot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every table of a scenario for missing values
    Check {
        /// Scenario workbook (.xlsx) or directory of CSV files
        input: PathBuf,
    },
    /// Convert a scenario between xlsx and a CSV collection
    Convert {
        /// Scenario workbook (.xlsx) or directory of CSV files
        input: PathBuf,
        /// Output workbook (.xlsx) or directory
        output: PathBuf,
    },
    /// Build, solve and dump a scenario
    Run {
        /// Scenario workbook (.xlsx) or directory of CSV files
        input: PathBuf,
        /// Scenario year
        #[arg(short, long)]
        year: i32,
        /// Config file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Three time steps only; also writes the LP file
        #[arg(long)]
        debug: bool,
        /// Dump file, defaults to <name>.json next to the input
        #[arg(short, long)]
        dump: Option<PathBuf>,
        /// Scenario name, defaults to the input file stem
        #[arg(long)]
        name: Option<String>,
    },
    /// Show the results of a dump
    Show {
        /// Dump file written by `run`
        dump: PathBuf,
    },
    /// Draw the node graph of a scenario
    Plot {
        /// Scenario workbook (.xlsx) or directory of CSV files
        input: PathBuf,
        /// Scenario year
        #[arg(short, long)]
        year: i32,
        /// Graphviz layout (neato, dot, twopi, circo, fdp, sfdp)
        #[arg(long, default_value = "neato")]
        layout: String,
        /// Drop nodes whose label contains this substring (repeatable)
        #[arg(long = "remove")]
        remove: Vec<String>,
        /// Image file; prints DOT to stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Image format
        #[arg(long, default_value = "svg")]
        format: String,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { input } => cmd_check(&input),
        Commands::Convert { input, output } => cmd_convert(&input, &output),
        Commands::Run {
            input,
            year,
            config,
            debug,
            dump,
            name,
        } => cmd_run(&input, year, config.as_deref(), debug, dump, name),
        Commands::Show { dump } => cmd_show(&dump),
        Commands::Plot {
            input,
            year,
            layout,
            remove,
            output,
            format,
        } => cmd_plot(&input, year, &layout, remove, output, format),
    }
}

fn is_workbook(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
}

fn load_scenario(input: &Path, name: Option<String>) -> AppResult<Scenario> {
    let name = name.unwrap_or_else(|| {
        input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| es_app::DEFAULT_SCENARIO_NAME.to_string())
    });
    let mut scenario = Scenario::new(name);
    if is_workbook(input) {
        scenario.load_excel(input)?;
    } else {
        scenario.load_csv(input)?;
    }
    debug!(
        tables = scenario.table_collection.len(),
        "loaded {}",
        input.display()
    );
    Ok(scenario)
}

fn cmd_check(input: &Path) -> AppResult<()> {
    println!("Checking scenario: {}", input.display());
    let scenario = load_scenario(input, None)?;

    let mut first_error = None;
    for name in scenario.table_collection.names() {
        match scenario.check_table(name) {
            Ok(()) => println!("  ✓ {}", name),
            Err(e) => {
                println!("  ✗ {}", e);
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        None => {
            println!("✓ All {} tables complete", scenario.table_collection.len());
            Ok(())
        }
        Some(e) => Err(e),
    }
}

fn cmd_convert(input: &Path, output: &Path) -> AppResult<()> {
    let scenario = load_scenario(input, None)?;
    if is_workbook(output) {
        scenario.to_excel(output)?;
    } else {
        scenario.to_csv(output)?;
    }
    println!(
        "✓ Converted {} tables to {}",
        scenario.table_collection.len(),
        output.display()
    );
    Ok(())
}

fn cmd_run(
    input: &Path,
    year: i32,
    config: Option<&Path>,
    debug: bool,
    dump: Option<PathBuf>,
    name: Option<String>,
) -> AppResult<()> {
    let config = match config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    debug!(
        solver = %config.general.solver,
        lp_files = %config.paths.lp_files.display(),
        "config"
    );

    let mut scenario = load_scenario(input, name)?;
    scenario.year = Some(year);
    scenario.debug = debug;
    println!("Running scenario: {} ({})", scenario.name, year);

    scenario.initialise_es(None)?;
    scenario.add_nodes_from(&TableNodeFactory)?;
    scenario.create_model()?;

    let meta = scenario.solve(&config)?.meta.clone();
    println!("✓ Solved with {} in {:.3} s", meta.solver, meta.solve_time_s);
    println!("  Objective: {:.2}", meta.objective);
    println!(
        "  Variables: {}, constraints: {}",
        meta.variables, meta.constraints
    );

    let dump = dump.unwrap_or_else(|| {
        input
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(format!("{}.json", scenario.name))
    });
    let written = scenario.dump_es(&dump)?;
    println!("✓ Results dumped to {}", written.display());
    Ok(())
}

fn cmd_show(dump: &Path) -> AppResult<()> {
    let mut scenario = Scenario::default();
    scenario.restore_es(dump)?;

    let Some(results) = scenario.results() else {
        println!("No results in {}", dump.display());
        return Ok(());
    };

    println!(
        "Scenario: {} ({})",
        results.scenario.name,
        results
            .scenario
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "  Solver: {} ({}), objective {:.2}",
        results.meta.solver, results.meta.status, results.meta.objective
    );
    if let Some(location) = &results.meta.in_location {
        println!("  Input: {}", location);
    }
    println!("Totals:");
    for seq in &results.main {
        println!("  {:<40} {:>14.2}", seq.key.to_string(), seq.total());
    }
    Ok(())
}

fn cmd_plot(
    input: &Path,
    year: i32,
    layout: &str,
    remove: Vec<String>,
    output: Option<PathBuf>,
    format: String,
) -> AppResult<()> {
    let layout: Layout = layout.parse()?;

    let mut scenario = load_scenario(input, None)?;
    scenario.year = Some(year);
    scenario.add_nodes_from(&TableNodeFactory)?;

    let dot = scenario.plot_nodes(&PlotOptions {
        remove_nodes_with_substrings: remove,
        draw: DrawOptions {
            layout,
            ..DrawOptions::default()
        },
        output: output.clone(),
        format: Some(format),
    })?;

    match output {
        Some(path) => println!("✓ Graph written to {}", path.display()),
        None => print!("{}", dot),
    }
    Ok(())
}
