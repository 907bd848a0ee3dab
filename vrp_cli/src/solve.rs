use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::PathBuf,
};

use clap::Args;
use tracing::info;
use vrp_core::{Config, ProblemInput};

#[derive(Args)]
pub struct SolveArgs {
    /// Problem JSON file, in the `ProblemInput` shape.
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Optional config JSON overriding the documented defaults.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Output file for the solution JSON; prints to stdout when omitted.
    #[arg(short = 'o', long)]
    out: Option<PathBuf>,
}

pub fn run(args: SolveArgs) -> anyhow::Result<()> {
    let config = match args.config {
        Some(path) => {
            let file = File::open(path)?;
            serde_json::from_reader(BufReader::new(file))?
        }
        None => Config::default(),
    };

    let file = File::open(args.input)?;
    let input: ProblemInput = serde_json::from_reader(BufReader::new(file))?;
    let problem = input.into_problem(&config)?;

    let solution = vrp_core::solve(problem, &config);
    info!(
        routes = solution.routes.len(),
        unserved = solution.unserved_shipments.len(),
        total_cost = solution.costs.total,
        "solve finished"
    );

    match args.out {
        Some(path) => {
            let file = File::create(path)?;
            serde_json::to_writer_pretty(BufWriter::new(file), &solution)?;
        }
        None => println!("{}", serde_json::to_string_pretty(&solution)?),
    }

    Ok(())
}
