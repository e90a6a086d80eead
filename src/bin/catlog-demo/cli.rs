// CLI argument definitions using clap

use catlog::cfg::parse_duration;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "catlog-demo")]
#[command(author = "hatlonely <hatlonely@foxmail.com>")]
#[command(version)]
#[command(about = "Run a few service workers that log through catlog", long_about = None)]
pub struct Cli {
    /// Directory for the log files (default: <local data dir>/catlog)
    #[arg(short, long)]
    pub base_dir: Option<PathBuf>,

    /// Logging config file (json/json5/yaml/toml); --base-dir overrides its base_path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Worker names, one thread per name
    #[arg(short, long, value_delimiter = ',', default_value = "Foo,Bar")]
    pub workers: Vec<String>,

    /// How long the workers run (e.g. 500ms, 3s); waits for Enter when omitted
    #[arg(short, long, value_parser = parse_duration)]
    pub duration: Option<Duration>,

    /// Route records from the `log` crate macros into catlog
    #[arg(long)]
    pub facade: bool,
}
