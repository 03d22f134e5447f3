use std::path::PathBuf;

use clap::Parser;

use eztemplate::app::walk::{WalkOptions, Walker};

/// Re-apply a shared template to every page that declares one, keeping each
/// page's editable areas intact.
#[derive(Parser)]
#[command(name = "eztemplate", version, about)]
struct Cli {
    /// File or directory tree to process.
    root: PathBuf,
    /// Only process files whose name contains this substring.
    #[arg(default_value = "")]
    filter: String,
}

fn main() -> anyhow::Result<()> {
    eztemplate::init();

    let cli = Cli::parse();
    let opts = WalkOptions::new(cli.root).with_filter(cli.filter);
    let stats = Walker::new().run(&opts)?;

    println!(
        "Done: {} file(s) processed. {} file(s) skipped.",
        stats.processed, stats.skipped
    );
    Ok(())
}
