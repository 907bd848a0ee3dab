use clap::{Parser, Subcommand};

mod solve;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,

    #[arg(long, global = true)]
    env: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reads a problem from a JSON file, runs the time-paradox precheck
    /// plus the solver, and prints the resulting solution.
    Solve {
        #[command(flatten)]
        args: solve::SolveArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(env) = cli.env {
        dotenvy::from_filename(env).ok();
    }

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Solve { args } => solve::run(args)?,
    }

    Ok(())
}
