use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// File-backed personal tracker: tasks, weekly habits, resources.
/// Storage defaults to ~/.tracker or a directory passed via --data-dir.
#[derive(Parser)]
#[command(name = "trk", version, about = "Personal productivity tracker")]
pub struct Cli {
    /// Directory holding the stored tasks, habits, favorites and theme.
    #[arg(long, global = true, env = "TRACKER_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Resource catalog location: a JSON file path or an http(s) URL.
    #[arg(long, global = true, env = "TRACKER_CATALOG")]
    pub catalog: Option<String>,

    /// Log level for the file log: trace | debug | info | warn | error | off.
    #[arg(long, global = true, env = "TRACKER_LOG")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
