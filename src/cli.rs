use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "apkwatch",
    about = "Apkwatch - Track Play Store listings and report when apps ship updates",
    version,
    author
)]
pub struct Cli {
    /// Package id to start tracking (e.g. com.example.app)
    #[arg(short, long, value_name = "ID", conflicts_with_all = ["delete", "list"])]
    pub package: Option<String>,

    /// Package id to stop tracking
    #[arg(short, long, value_name = "ID", conflicts_with = "list")]
    pub delete: Option<String>,

    /// List tracked packages without contacting the Play Store
    #[arg(short, long)]
    pub list: bool,

    /// Directory holding the tracker state (defaults to the per-user data dir)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}
