use clap::Parser;
use model::{
    cycle::{Cycle, DEFAULT_BASE_URL},
    init_logging,
    nasr::{Client, LocalClient},
    publish::{self, Outputs},
    query::Filter,
};
use std::path::PathBuf;

/// Pull the latest airport data from the FAA and publish it for the map.
#[derive(Parser)]
enum Command {
    /// Download the latest NASR cycle and update the published airport list.
    Pull {
        /// Base URL of the NASR cycle archives.
        #[clap(long, env = "NASR_BASE_URL", default_value = DEFAULT_BASE_URL)]
        base_url: String,

        #[clap(flatten)]
        target: Target,
    },
    /// Update the published airport list from cycle archives saved in local storage.
    Read {
        /// The path to the directory containing the cycle archives.
        ///
        /// Archives must keep the names they are published under, e.g.
        /// `25_Dec_2025_APT_CSV.zip`.
        #[clap(short, long, env = "NASR_DATA_DIR", name = "DIR")]
        dir: PathBuf,

        #[clap(flatten)]
        target: Target,
    },
    /// Show the current and upcoming cycles.
    Cycle {
        /// Base URL of the NASR cycle archives.
        #[clap(long, env = "NASR_BASE_URL", default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
}

/// Options shared by every command that publishes airports.
#[derive(clap::Args)]
struct Target {
    /// Load CYCLE (YYYY-MM-DD) instead of the upcoming cycle.
    ///
    /// If CYCLE is not available, the cycle before it is used.
    #[clap(short, long, env = "NASR_CYCLE", name = "CYCLE")]
    cycle: Option<Cycle>,

    #[clap(flatten)]
    outputs: Outputs,

    #[clap(flatten)]
    filter: Filter,
}

impl Target {
    fn cycle(&self) -> Cycle {
        self.cycle.unwrap_or_else(Cycle::upcoming)
    }
}

#[async_std::main]
async fn main() -> Result<(), anyhow::Error> {
    init_logging();

    match Command::parse() {
        Command::Pull { base_url, target } => {
            let client = Client::new(base_url);
            let summary =
                publish::update(&client, target.cycle(), &target.filter, &target.outputs).await?;
            tracing::info!(?summary, "update complete");
        }
        Command::Read { dir, target } => {
            let client = LocalClient::open(dir);
            tracing::info!("{} cycles available", client.list_cycles()?.len());
            let summary =
                publish::update(&client, target.cycle(), &target.filter, &target.outputs).await?;
            tracing::info!(?summary, "update complete");
        }
        Command::Cycle { base_url } => {
            let next = Cycle::upcoming();
            for (label, cycle) in [("current", next.previous()), ("next", next)] {
                println!("{label:8}{cycle}  {}", cycle.url(&base_url));
            }
        }
    }

    Ok(())
}
