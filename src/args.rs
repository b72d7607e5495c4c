use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sitesnap")]
#[command(about = "Captures normalized structural, visual and performance snapshots of webpages")]
#[command(version)]
pub struct Args {
    /// URLs to snapshot
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Number of concurrent browser sessions for batch runs
    #[arg(short, long, default_value_t = 3)]
    pub concurrency: usize,

    /// Prefer the configured cloud browser provider
    #[arg(long)]
    pub cloud: bool,

    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory for snapshot JSON files (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print a derived summary for each snapshot instead of the full JSON
    #[arg(long)]
    pub summary: bool,
}
