use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(
    name = "sizer",
    about = "Landscape sizer: per-VM storage and compute configuration",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Size every candidate system and write the master catalog.
    ///
    /// Capacity for database tiers comes from the reference catalog when
    /// it lists both data and log disks for the SKU, otherwise from the
    /// VM's memory. Overrides are applied per system and tier.
    Generate {
        /// Candidate systems (JSON list)
        #[arg(short, long)]
        systems: String,
        /// Reference sizing catalog (JSON, SKU → storage)
        #[arg(short, long)]
        catalog: Option<String>,
        /// Override directives (JSON, moniker → tier → key/value)
        #[arg(long)]
        overrides: Option<String>,
        /// Policy file (default: built-in policy)
        #[arg(long)]
        config: Option<String>,
        /// Output file for the master catalog (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
        /// Sizing report on stderr: text, json or none
        #[arg(short, long, default_value = "text")]
        report: String,
        /// Worker threads (0 = one per CPU)
        #[arg(short, long, default_value_t = 0)]
        jobs: usize,
    },
    /// Show how a single SKU is sized for the database tier
    Explain {
        sku: String,
        #[arg(short, long)]
        catalog: Option<String>,
        #[arg(long)]
        config: Option<String>,
    },
    /// Write the default policy file
    InitConfig {
        #[arg(short, long, default_value = "sizer.toml")]
        path: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("sizer=info".parse()?);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }

    match cli.command {
        Commands::Generate { systems, catalog, overrides, config, output, report, jobs } => {
            commands::generate::generate(&commands::generate::GenerateArgs {
                systems,
                catalog,
                overrides,
                config,
                output,
                report,
                jobs,
            })
        }
        Commands::Explain { sku, catalog, config } => {
            commands::explain::explain(&sku, catalog.as_deref(), config.as_deref())
        }
        Commands::InitConfig { path } => commands::init::init_config(&path),
    }
}
