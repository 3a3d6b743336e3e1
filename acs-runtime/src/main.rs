use acs_instance::travelling_salesman::{Challenge, Difficulty, InstanceData, Solution};
use acs_instance::{DistanceModel, Tour};
use acs_solver::{RunResult, Solver, SolverConfig};
use acs_utils::{calc_seed, dejsonify, jsonify, u64_from_str};
use anyhow::{anyhow, Context, Result};
use clap::{arg, ArgAction, Command};
use rand::{rngs::SmallRng, SeedableRng};
use serde::Serialize;
use serde_json::{Map, Value};
use std::{fs, io::Read, path::PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("acs-runtime")
        .about("Solves travelling salesman instances with an ant colony system")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("generate")
                .about("Generates a seeded instance on the [0, 1000]² grid")
                .arg(arg!(<SIZE> "Number of nodes").value_parser(clap::value_parser!(usize)))
                .arg(
                    arg!(<SEED> "A string used in seed generation")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--nonce [NONCE] "Nonce mixed into the seed")
                        .default_value("0")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("solve")
                .about("Runs the colony on an instance")
                .arg(
                    arg!(<INSTANCE> "Instance json string, path to json file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--config [CONFIG] "Solver config json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--seed [SEED] "A string used in seed generation (random if omitted)")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--parallel "Build each generation's tours on all cores")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the solution json is saved to this file path")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("verify")
                .about("Checks a route against an instance and prints its length")
                .arg(
                    arg!(<INSTANCE> "Instance json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(<SOLUTION> "Solution json string, path to json file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("generate", sub_m)) => generate(
            *sub_m.get_one::<usize>("SIZE").unwrap(),
            sub_m.get_one::<String>("SEED").unwrap().clone(),
            *sub_m.get_one::<u64>("nonce").unwrap(),
        ),
        Some(("solve", sub_m)) => solve(
            sub_m.get_one::<String>("INSTANCE").unwrap().clone(),
            sub_m.get_one::<String>("config").cloned(),
            sub_m.get_one::<String>("seed").cloned(),
            sub_m.get_flag("parallel"),
            sub_m.get_one::<PathBuf>("output").cloned(),
        ),
        Some(("verify", sub_m)) => verify(
            sub_m.get_one::<String>("INSTANCE").unwrap().clone(),
            sub_m.get_one::<String>("SOLUTION").unwrap().clone(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[derive(Serialize, Debug)]
struct SolveOutput {
    route: Vec<usize>,
    length: f64,
    improved_at: usize,
    config: SolverConfig,
}

pub fn generate(size: usize, seed: String, nonce: u64) -> Result<()> {
    let challenge =
        Challenge::generate_instance(&calc_seed(&seed, nonce), &Difficulty { num_nodes: size })?;
    println!("{}", jsonify(&challenge)?);
    Ok(())
}

pub fn solve(
    instance: String,
    config: Option<String>,
    seed: Option<String>,
    parallel: bool,
    output_file: Option<PathBuf>,
) -> Result<()> {
    let distances = load_distances(&instance)?;
    let config = match config {
        Some(config) => SolverConfig::initialize(&Some(load_json::<Map<String, Value>>(&config)?))?,
        None => SolverConfig::default(),
    };
    let mut rng = match &seed {
        Some(seed) => SmallRng::seed_from_u64(u64_from_str(seed)),
        None => SmallRng::from_entropy(),
    };

    let result = run_solver(&distances, config, &mut rng, parallel)?;
    let output = SolveOutput {
        route: result.best_tour.order().to_vec(),
        length: result.best_length,
        improved_at: result.improved_at,
        config,
    };

    let json = jsonify(&output)?;
    match output_file {
        Some(path) => {
            fs::write(&path, json)
                .with_context(|| format!("Failed to write solution: {}", path.display()))?;
            info!(path = %path.display(), length = output.length, "solution saved");
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn run_solver(
    distances: &DistanceModel,
    config: SolverConfig,
    rng: &mut SmallRng,
    parallel: bool,
) -> Result<RunResult> {
    let mut solver = Solver::new(distances, config)?;
    let result = if parallel {
        solver.run_parallel(rng)?
    } else {
        solver.run(rng)?
    };
    Ok(result)
}

pub fn verify(instance: String, solution: String) -> Result<()> {
    let distances = load_distances(&instance)?;
    let solution = load_json::<Solution>(&solution)?;
    let tour = Tour::new(solution.route, &distances).context("Invalid solution")?;
    println!("Solution is valid (length: {})", tour.length());
    Ok(())
}

fn load_distances(instance: &str) -> Result<DistanceModel> {
    Ok(load_json::<InstanceData>(instance)?.into_distance_model()?)
}

/// Accepts inline json, a path ending in `.json`, or `-` for stdin.
fn load_json<T>(arg: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let json = if arg == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read json from stdin")?;
        buffer
    } else if arg.ends_with(".json") {
        fs::read_to_string(arg).with_context(|| format!("Failed to read json file: {}", arg))?
    } else {
        arg.to_string()
    };
    dejsonify::<T>(&json).with_context(|| format!("Failed to parse json: {}", arg))
}
