//! VALA Command-Line Interface
//!
//! Solves small linear systems with a variational quantum algorithm and
//! inspects the pieces along the way.
//!
//! ```text
//! vala solve                      train on the reference system
//! vala solve -c run.yaml -o out   custom system and output directory
//! vala inspect                    norms, conditioning and encoding fidelity
//! vala hamiltonian                Pauli decomposition of H_A
//! vala draw --ansatz original     text drawing or QASM of an ansatz
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::ProblemArgs;
use commands::{draw, hamiltonian, inspect, solve, version};

/// VALA - variational quantum linear solver
#[derive(Parser)]
#[command(name = "vala")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML configuration file
    #[arg(short, long, global = true, env = "VALA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the ansatz and decode the solution
    Solve {
        #[command(flatten)]
        problem: ProblemArgs,

        #[command(flatten)]
        train: TrainArgs,

        /// Output directory for report, loss curve and circuit
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// File stem for the artifacts
        #[arg(long, default_value = "vala")]
        name: String,

        /// Disable the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Show the embedded system: norms, conditioning, encoding fidelity
    Inspect {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Decimal places for printed matrices
        #[arg(long, default_value = "3")]
        decimals: usize,
    },

    /// Print the Pauli decomposition of H_A
    Hamiltonian {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Draw an ansatz circuit
    Draw {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Comma-separated parameters (zeros when omitted)
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
        params: Option<Vec<f64>>,

        /// Emit OpenQASM instead of a drawing (2, 3)
        #[arg(long)]
        qasm: Option<u8>,
    },

    /// Show version information
    Version,
}

/// Training overrides for `solve`.
#[derive(Args, Debug, Default)]
struct TrainArgs {
    /// Optimizer (momentum, gradient_descent, adam)
    #[arg(long)]
    optimizer: Option<vala_solver::OptimizerKind>,

    /// Step size
    #[arg(long)]
    lr: Option<f64>,

    /// Optimizer steps
    #[arg(short, long)]
    iters: Option<usize>,

    /// Shots for the sampled readout
    #[arg(short, long)]
    shots: Option<u32>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Initial parameters (zeros, random)
    #[arg(long)]
    init: Option<vala_solver::InitStrategy>,

    /// Gradient method (parameter_shift, finite_difference)
    #[arg(long)]
    gradient: Option<vala_solver::GradientMethod>,

    /// Stop when |Δloss| falls below this
    #[arg(long)]
    tolerance: Option<f64>,
}

impl TrainArgs {
    fn apply(&self, config: &mut vala_solver::SolverConfig) {
        if let Some(v) = self.optimizer {
            config.optimizer = v;
        }
        if let Some(v) = self.lr {
            config.lr = v;
        }
        if let Some(v) = self.iters {
            config.iters = v;
        }
        if let Some(v) = self.shots {
            config.shots = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
        if let Some(v) = self.init {
            config.init = v;
        }
        if let Some(v) = self.gradient {
            config.gradient = v;
        }
        if let Some(v) = self.tolerance {
            config.tolerance = v;
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("VALA_LOG").unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config_file = cli.config.as_deref();

    let result = match cli.command {
        Commands::Solve {
            problem,
            train,
            output,
            name,
            no_progress,
        } => commands::common::load_config(config_file, &problem).and_then(|mut config| {
            train.apply(&mut config);
            if let Some(dir) = output {
                config.output_dir = dir;
            }
            solve::execute(config, &name, !no_progress && cli.verbose == 0)
        }),

        Commands::Inspect { problem, decimals } => {
            commands::common::load_config(config_file, &problem)
                .and_then(|config| inspect::execute(&config, decimals))
        }

        Commands::Hamiltonian { problem, format } => {
            commands::common::load_config(config_file, &problem)
                .and_then(|config| hamiltonian::execute(&config, &format))
        }

        Commands::Draw {
            problem,
            params,
            qasm,
        } => commands::common::load_config(config_file, &problem)
            .and_then(|config| draw::execute(&config, params.as_deref(), qasm)),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
