use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "franchise-catalog")]
#[command(about = "Seed a franchise catalog and print its top-stock report")]
pub struct CliConfig {
    /// Path to the TOML catalog file
    #[arg(short, long, default_value = "catalog.toml")]
    pub config: String,

    /// Franchise to report on, overrides [report] in the file
    #[arg(short, long)]
    pub franchise: Option<String>,

    /// Emit JSON log lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
