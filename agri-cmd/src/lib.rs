//! Command implementations for the agri CLI.
//!
//! Subcommands load CSV exports into the in-memory provider, run the
//! preparation pipeline and write the dashboard or map document, or print
//! intermediate results for inspection.

use clap::Subcommand;

pub mod input;
pub mod inspect;
pub mod render;

#[derive(Subcommand)]
pub enum Command {
    /// Write the interactive parcel dashboard as a self-contained HTML file
    Dashboard {
        /// Feature table CSV (optionally .gz)
        #[arg(short = 'f', long)]
        features: String,

        /// Yield history CSV (optionally .gz)
        #[arg(short = 'y', long)]
        history: String,

        /// Output path for the HTML document
        #[arg(short = 'o', long, default_value = "dashboard.html")]
        output: String,

        /// Seed for the yield prediction perturbation
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Write the parcel map with yield, NDVI and risk layers
    Map {
        /// Feature table CSV (optionally .gz)
        #[arg(short = 'f', long)]
        features: String,

        /// Yield history CSV (optionally .gz)
        #[arg(short = 'y', long)]
        history: String,

        /// Output path for the HTML document
        #[arg(short = 'o', long, default_value = "map.html")]
        output: String,

        /// Seed for the heatmap coordinate jitter
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the selectable parcels
    Parcels {
        /// Feature table CSV (optionally .gz)
        #[arg(short = 'f', long)]
        features: String,
    },

    /// Print the yield trend of one parcel
    Trend {
        /// Yield history CSV (optionally .gz)
        #[arg(short = 'y', long)]
        history: String,

        /// Parcel identifier
        #[arg(short = 'p', long)]
        parcel: String,
    },

    /// Write the temperature x water-stress density matrix as CSV
    StressMatrix {
        /// Feature table CSV (optionally .gz)
        #[arg(short = 'f', long)]
        features: String,

        /// Output path for the CSV
        #[arg(short = 'o', long)]
        output: String,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Dashboard {
            features,
            history,
            output,
            seed,
        } => render::run_dashboard(&features, &history, &output, seed),
        Command::Map {
            features,
            history,
            output,
            seed,
        } => render::run_map(&features, &history, &output, seed),
        Command::Parcels { features } => inspect::run_parcels(&features),
        Command::Trend { history, parcel } => inspect::run_trend(&history, &parcel),
        Command::StressMatrix { features, output } => {
            inspect::run_stress_matrix(&features, &output)
        }
    }
}
