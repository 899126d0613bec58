use clap::{Parser, Subcommand, ValueEnum};

use cloudidp::engine::Provider;

#[derive(Parser)]
#[command(name = "cloudidp")]
#[command(about = "Multi-cloud infrastructure dashboard", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Provider to start on (overrides config)
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Module to open first (overrides config)
    #[arg(long, value_name = "KEY")]
    pub module: Option<String>,

    /// Write a log file even if config disables it
    #[arg(long)]
    pub log: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List navigation modules and which providers implement them
    Modules {
        #[arg(long, value_enum)]
        provider: Option<ProviderArg>,
    },

    /// Dispatch one module without the TUI and print the outcome
    Render {
        /// Module key, e.g. "Resource Inventory"
        module: String,

        #[arg(long, value_enum)]
        provider: Option<ProviderArg>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// List regions (or Azure locations) for a provider
    Regions {
        #[arg(value_enum)]
        provider: ProviderArg,
    },

    /// Show session defaults and the cloud context for a provider
    Context {
        #[arg(long, value_enum)]
        provider: Option<ProviderArg>,
    },

    /// Show config status and location, or create default config if missing
    InitConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    Aws,
    Azure,
    Gcp,
}

impl From<ProviderArg> for Provider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Aws => Provider::Aws,
            ProviderArg::Azure => Provider::Azure,
            ProviderArg::Gcp => Provider::Gcp,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
