use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "apm-module")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Converge an apm package to present, latest or absent", long_about = None)]
pub struct Cli {
    /// JSON arguments file written by the automation host (`-` or omitted reads stdin)
    pub args_file: Option<PathBuf>,

    /// Report what would happen without running apm
    #[arg(long)]
    pub check: bool,

    /// apm executable to run (overrides the `executable` argument)
    #[arg(long, env = "APM_EXECUTABLE")]
    pub executable: Option<String>,

    /// Verbosity level (logs go to stderr)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}
