mod settings;

use anyhow::{anyhow, Result};
use clap::{arg, ArgAction, ArgMatches, Command};
use knapqubo_algorithms::get_solver;
use knapqubo_challenges::{
    build_model, decode_solutions, load_items, solve_knapsack, DecodedSolution, SampleSet,
    SlackEncoding,
};
use knapqubo_utils::{compress_obj, decompress_obj, dejsonify, jsonify, read_json_arg};
use serde_json::{Map, Value};
use settings::RunSettings;
use std::{fs, path::PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn with_settings_args(command: Command) -> Command {
    command
        .arg(
            arg!(<ITEMS> "Path to a headerless cost,weight csv file")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            arg!(--settings [SETTINGS] "Settings json string, path to json file, or '-' for stdin")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            arg!(--capacity [CAPACITY] "Weight capacity (default 70)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--encoding [ENCODING] "Slack encoding: one_hot or binary")
                .value_parser(clap::value_parser!(String)),
        )
}

fn cli() -> Command {
    Command::new("knapqubo")
        .about("Builds, solves and decodes knapsack QUBO models")
        .arg_required_else_help(true)
        .subcommand(
            with_settings_args(Command::new("build").about("Builds the QUBO model"))
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the model will be saved to this file path (default json)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--compress "If output file is set, the model will be compressed as zlib")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            with_settings_args(Command::new("solve").about("Builds the model, solves it locally and prints solutions"))
                .arg(
                    arg!(--solver [SOLVER] "Local solver: exhaustive or annealing")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--num_reads [NUM_READS] "Number of annealing reads")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--num_sweeps [NUM_SWEEPS] "Number of sweeps per annealing read")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--seed [SEED] "Random seed for annealing")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            with_settings_args(Command::new("decode").about("Decodes a sample set returned by an external solver"))
                .arg(
                    arg!(<SAMPLES> "Sample set json string, path to json file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--compressed "SAMPLES is a path to a zlib compressed json file")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("build", sub_m)) => build(sub_m),
        Some(("solve", sub_m)) => solve(sub_m),
        Some(("decode", sub_m)) => decode(sub_m),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_settings(sub_m: &ArgMatches) -> Result<RunSettings> {
    let mut settings = RunSettings::load(sub_m.get_one::<String>("settings").map(String::as_str))?;
    if let Some(capacity) = sub_m.get_one::<usize>("capacity") {
        settings.capacity = *capacity;
    }
    if let Some(encoding) = sub_m.get_one::<String>("encoding") {
        settings.encoding = encoding.parse::<SlackEncoding>().map_err(|e| anyhow!(e))?;
    }
    Ok(settings)
}

fn items_path(sub_m: &ArgMatches) -> Result<&PathBuf> {
    sub_m
        .get_one::<PathBuf>("ITEMS")
        .ok_or_else(|| anyhow!("Missing ITEMS argument"))
}

fn print_solutions(solutions: &[DecodedSolution]) {
    for solution in solutions {
        println!("{}", solution);
    }
}

pub fn build(sub_m: &ArgMatches) -> Result<()> {
    let settings = load_settings(sub_m)?;
    let items = load_items(items_path(sub_m)?)?;
    let model = build_model(&items, settings.capacity, settings.encoding)?;

    match sub_m.get_one::<PathBuf>("output") {
        Some(path) => {
            if sub_m.get_flag("compress") {
                fs::write(path, compress_obj(&model)?)?;
            } else {
                fs::write(path, jsonify(&model))?;
            }
            println!("model written to: {:?}", path);
        }
        None => println!("{}", jsonify(&model)),
    }
    Ok(())
}

/// Settings for `solve`: solver flags replace what `--settings` names.
fn load_solve_settings(sub_m: &ArgMatches) -> Result<RunSettings> {
    let mut settings = load_settings(sub_m)?;
    if let Some(solver) = sub_m.get_one::<String>("solver") {
        settings.solver = solver.clone();
    }
    for key in ["num_reads", "num_sweeps", "seed"] {
        if let Some(value) = sub_m.get_one::<u64>(key) {
            settings.set_hyperparameter(key, *value);
        }
    }
    Ok(settings)
}

/// Reads a sample set given as json, or as a zlib file written with `--compress`.
fn load_sample_set(samples: &str, compressed: bool) -> Result<SampleSet> {
    let map = if compressed {
        let bytes = fs::read(samples).map_err(|e| anyhow!("Failed to read {}: {}", samples, e))?;
        decompress_obj::<Map<String, Value>>(&bytes)?
    } else {
        dejsonify::<Map<String, Value>>(&read_json_arg(samples)?)?
    };
    SampleSet::try_from(map).map_err(|e| anyhow!("Failed to parse sample set: {}", e))
}

pub fn solve(sub_m: &ArgMatches) -> Result<()> {
    let settings = load_solve_settings(sub_m)?;

    let items = load_items(items_path(sub_m)?)?;
    info!(
        "Loaded {} items, capacity {}, solver {}",
        items.len(),
        settings.capacity,
        settings.solver
    );
    let solver = get_solver(&settings.solver, &settings.solver_hyperparameters())?;
    let solutions = solve_knapsack(&items, settings.capacity, settings.encoding, solver.as_ref())?;
    print_solutions(&solutions);
    Ok(())
}

pub fn decode(sub_m: &ArgMatches) -> Result<()> {
    let settings = load_settings(sub_m)?;
    let items = load_items(items_path(sub_m)?)?;
    let samples = sub_m
        .get_one::<String>("SAMPLES")
        .ok_or_else(|| anyhow!("Missing SAMPLES argument"))?;
    let sample_set = load_sample_set(samples, sub_m.get_flag("compressed"))?;
    let solutions = decode_solutions(&sample_set, &items, settings.capacity)?;
    print_solutions(&solutions);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use knapqubo_challenges::Var;

    #[test]
    fn test_cli_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn test_settings_overrides() {
        let matches = cli()
            .try_get_matches_from([
                "knapqubo",
                "solve",
                "items.csv",
                "--settings",
                r#"{"capacity":12,"solver":"exhaustive"}"#,
                "--encoding",
                "binary",
                "--seed",
                "5",
            ])
            .unwrap();
        let (name, sub_m) = matches.subcommand().unwrap();
        assert_eq!(name, "solve");
        let settings = load_settings(sub_m).unwrap();
        assert_eq!(settings.capacity, 12);
        assert_eq!(settings.encoding, SlackEncoding::Binary);
        assert_eq!(settings.solver, "exhaustive");
        assert_eq!(*sub_m.get_one::<u64>("seed").unwrap(), 5);
        assert_eq!(items_path(sub_m).unwrap(), &PathBuf::from("items.csv"));
    }

    #[test]
    fn test_solver_flags_replace_settings() {
        let matches = cli()
            .try_get_matches_from([
                "knapqubo",
                "solve",
                "items.csv",
                "--settings",
                r#"{"solver":"annealing","hyperparameters":{"seed":1,"num_reads":2}}"#,
                "--seed",
                "5",
                "--solver",
                "exhaustive",
            ])
            .unwrap();
        let (_, sub_m) = matches.subcommand().unwrap();
        let settings = load_solve_settings(sub_m).unwrap();
        assert_eq!(settings.solver, "exhaustive");
        assert_eq!(
            settings.hyperparameters,
            serde_json::json!({ "seed": 5, "num_reads": 2 })
                .as_object()
                .cloned()
                .unwrap()
        );

        let matches = cli()
            .try_get_matches_from(["knapqubo", "solve", "items.csv", "--num_sweeps", "30"])
            .unwrap();
        let (_, sub_m) = matches.subcommand().unwrap();
        let settings = load_solve_settings(sub_m).unwrap();
        assert_eq!(settings.solver, "annealing");
        assert_eq!(settings.hyperparameters["num_sweeps"], serde_json::json!(30));
        assert_eq!(settings.hyperparameters.len(), 1);
    }

    #[test]
    fn test_load_sample_set() {
        let json = r#"{"variables":["x1","y0"],"records":[{"sample":[1,0],"energy":-4.0}]}"#;
        let sample_set = load_sample_set(json, false).unwrap();
        assert_eq!(sample_set.variables, vec![Var::Item(1), Var::Slack(0)]);

        let path = std::env::temp_dir().join(format!("knapqubo-samples-{}.zlib", std::process::id()));
        fs::write(&path, compress_obj(&sample_set).unwrap()).unwrap();
        let path_str = path.to_str().unwrap();
        assert_eq!(load_sample_set(path_str, true).unwrap(), sample_set);
        // without the flag a non-.json path is taken as inline json
        assert!(load_sample_set(path_str, false).is_err());
        fs::remove_file(&path).unwrap();

        assert!(load_sample_set(r#"{"variables":["q0"],"records":[]}"#, false).is_err());
    }

    #[test]
    fn test_bad_encoding() {
        let matches = cli()
            .try_get_matches_from(["knapqubo", "build", "items.csv", "--encoding", "gray"])
            .unwrap();
        let (_, sub_m) = matches.subcommand().unwrap();
        assert!(load_settings(sub_m).is_err());
    }
}
