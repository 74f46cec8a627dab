//! dirsplit - copy directories into numbered subdirectories of bounded size
//!
//! ```bash
//! dirsplit -f 200 -t /media/ken/1456-C776/ -s /tmp/dir1/ /tmp/dir2/ /tmp/dir3/
//! ```
//!
//! Subdirectories are named after their source with an `_n` suffix. Past nine
//! subdirectories the suffix becomes `nn`, past ninety-nine `nnn`, and so on.

use clap::Parser;
use dirsplit::cli;
use dirsplit_logging::{init_logging, LogConfig};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "dirsplit",
    version,
    about = "Directory splitter. Splits directories into multiple directories \
             with the specified number of files within each directory.",
    after_help = "Logs are written to ~/.dirsplit/logs (override with DIRSPLIT_HOME, filter with RUST_LOG)."
)]
struct Cli {
    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long)]
    verbose: bool,

    #[command(flatten)]
    split: cli::split::SplitArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(LogConfig {
        app_name: "dirsplit",
        verbose: cli.verbose,
    });

    let json_mode = cli.split.json;
    match cli::split::run(cli.split) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json_mode {
                cli::error::print_json_error(&err);
            } else {
                // Diagnostics share stdout with the progress lines
                println!("{}", format!("{:#}", err).trim_end());
            }
            ExitCode::from(1)
        }
    }
}
