use bhgrav::{Engine, Scenario, ScenarioConfig, TreeDump};
use bhgrav::{bench_step, bench_theta_curve};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file, looked up under `scenarios/` unless it is a path
    #[arg(short, long = "file", default_value = "two_body.yaml")]
    file_name: String,

    /// Number of ticks to run
    #[arg(short = 'n', long, default_value_t = 1)]
    steps: usize,

    /// Print the octree over the final state
    #[arg(long)]
    dump_tree: bool,

    /// Run the timing benchmarks instead of a scenario
    #[arg(long)]
    bench: bool,
}

fn resolve_path(file_name: &str) -> PathBuf {
    let direct = PathBuf::from(file_name);
    if direct.exists() {
        return direct;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
}

// load here to keep main clean
fn load_scenario(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = resolve_path(file_name);
    let cfg = ScenarioConfig::from_path(&config_path)
        .with_context(|| format!("failed to load scenario {}", config_path.display()))?;
    Ok(cfg)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.bench {
        bench_step();
        bench_theta_curve();
        return Ok(());
    }

    let mut scenario = Scenario::build_scenario(load_scenario(&args.file_name)?);
    info!(
        "loaded {} bodies (grav = {}, theta = {})",
        scenario.bodies.len(),
        scenario.parameters.grav,
        scenario.parameters.theta
    );

    let outcome = scenario.steps(args.steps).map(|_| ());
    if let Err(e) = outcome {
        warn!("stopped after step {}: {}", scenario.step, e);
    }

    if args.dump_tree {
        let engine = Engine::new(scenario.parameters.clone());
        if let Some(tree) = engine.build_tree(&scenario.bodies)? {
            println!("{}", TreeDump::new(&tree, &scenario.bodies));
        }
    }

    println!("{}", scenario.to_config().to_json_pretty()?);

    Ok(())
}
