mod config;
mod models;
mod testbed;

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use models::Topology;
use testbed::TopologyKind;

/// Generate a nested testbed spec for an Avi controller deployment
#[derive(Debug, Parser)]
#[command(name = "testbed-spec", version)]
struct Cli {
    /// Testbed scenario to generate
    #[arg(value_enum)]
    kind: TopologyKind,

    /// Number of ESX hosts (overrides ESX_COUNT, default 4)
    #[arg(
        long = "esx-count",
        value_name = "N",
        allow_hyphen_values = true,
        num_args = 0..=1,
        default_missing_value = ""
    )]
    esx_count: Option<String>,

    /// Write the spec to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Emit single-line JSON
    #[arg(long)]
    compact: bool,

    /// Testbed arguments such as `static_ip_enabled:true` or
    /// `avi_controller_ovf_url:<url>`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

impl Cli {
    /// Host count as given on the command line. `--esx-count` may also show
    /// up among the trailing testbed arguments; the first occurrence wins and
    /// is removed from them. A missing value reads as empty.
    fn take_esx_count(&mut self) -> Option<String> {
        let trailing = self
            .args
            .iter()
            .position(|arg| arg == "--esx-count")
            .map(|index| {
                self.args.remove(index);
                if index < self.args.len() {
                    self.args.remove(index)
                } else {
                    String::new()
                }
            });
        self.esx_count.take().or(trailing)
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing; stdout carries the spec so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "testbed_spec=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut cli = Cli::parse();
    let esx_count = cli.take_esx_count();
    let cfg = Config::load(esx_count.as_deref());
    tracing::info!("Generating {} testbed with {} ESX hosts", cli.kind, cfg.num_hosts);

    let topology = testbed::testbed(cli.kind, cfg.num_hosts, &cli.args);
    let rendered = render(&topology, cli.compact)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, rendered.as_bytes())
                .with_context(|| format!("Failed to write testbed spec to {}", path.display()))?;
            tracing::info!("Wrote {} to {}", topology.name, path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("Failed to write testbed spec to stdout")?;
        }
    }

    Ok(())
}

/// Serialize the descriptor, newline-terminated
fn render(topology: &Topology, compact: bool) -> anyhow::Result<String> {
    let mut rendered = if compact {
        serde_json::to_string(topology)
    } else {
        serde_json::to_string_pretty(topology)
    }
    .context("Failed to serialize testbed spec")?;
    rendered.push('\n');
    Ok(rendered)
}
