use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{arg, Command};
use tracing::info;
use tracing_subscriber::EnvFilter;

use trackyard::io;
use trackyard::search::{SearchConfig, SearchRunner};

fn cli() -> Command {
    Command::new("trackyard")
        .about("Assigns vehicles to garage storage tracks and improves the plan with tabu-style search")
        .arg(
            arg!(<INSTANCE> "Path to the instance file")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            arg!(--out [DIR] "Output directory for result files")
                .default_value("results")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(arg!(--label [LABEL] "Run label encoded into the result file name").default_value("run"))
        .arg(
            arg!(--seed [SEED] "Random seed for a reproducible run")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            arg!(--iterations [N] "Search iteration budget")
                .default_value("100")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--neighborhood [N] "Candidates generated per iteration")
                .default_value("10")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--memory [N] "Recency memory capacity")
                .default_value("20")
                .value_parser(clap::value_parser!(usize)),
        )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let matches = cli().get_matches();
    let instance_path = matches
        .get_one::<PathBuf>("INSTANCE")
        .cloned()
        .context("INSTANCE argument is required")?;
    let out_dir = matches
        .get_one::<PathBuf>("out")
        .cloned()
        .context("--out has a default")?;
    let label = matches
        .get_one::<String>("label")
        .cloned()
        .context("--label has a default")?;

    let text = fs::read_to_string(&instance_path)
        .with_context(|| format!("reading instance file {}", instance_path.display()))?;
    let instance = io::load_instance(&text)
        .with_context(|| format!("parsing instance file {}", instance_path.display()))?;
    info!(
        vehicles = instance.vehicle_count(),
        tracks = instance.track_count(),
        "instance loaded"
    );

    let mut config = SearchConfig::default()
        .with_iterations(*matches.get_one::<usize>("iterations").unwrap_or(&100))
        .with_neighborhood_size(*matches.get_one::<usize>("neighborhood").unwrap_or(&10))
        .with_memory_capacity(*matches.get_one::<usize>("memory").unwrap_or(&20));
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config = config.with_seed(seed);
    }

    let result = SearchRunner::run(&instance, &config)?;
    info!(
        initial_score = result.initial_score,
        best_score = result.best_score,
        iterations = result.iterations,
        unscheduled = result.best.unscheduled.len(),
        termination = ?result.termination,
        "search finished"
    );

    let stem = instance_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("instance");
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    let out_path = out_dir.join(format!("{label}-{stem}.txt"));
    let mut rendered = io::render(&result.best);
    rendered.push('\n');
    fs::write(&out_path, rendered)
        .with_context(|| format!("writing result file {}", out_path.display()))?;
    info!(result_file = %out_path.display(), "result written");

    Ok(())
}
