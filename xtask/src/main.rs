use std::fs;
use std::path::PathBuf;
use std::process::Command;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about = "Project automation commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run cargo nextest with default configuration
    Nextest {
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        release: bool,
    },
    /// Write a small templated demo site for exercising the tool by hand
    Scaffold {
        #[arg(long, default_value = "demo-site")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Nextest { profile, release } => run_nextest(profile, release)?,
        Commands::Scaffold { dir } => scaffold_demo_site(dir)?,
    }
    Ok(())
}

fn run_nextest(profile: Option<String>, release: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("nextest").arg("run");
    if let Some(profile) = profile {
        cmd.arg("--profile").arg(profile);
    }
    if release {
        cmd.arg("--release");
    }
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("cargo nextest run failed");
    }
    Ok(())
}

fn scaffold_demo_site(dir: PathBuf) -> Result<()> {
    const TEMPLATE: &str = "<!--eztemplate_base.html-->\n<html>\n<body>\n\
        <nav>shared navigation</nav>\n\
        <!--ezstart_content-->\n<p>placeholder content</p>\n<!--ezend_content-->\n\
        <footer>shared footer</footer>\n</body>\n</html>\n";

    fs::create_dir_all(&dir)?;
    fs::write(dir.join("base.html"), TEMPLATE)?;
    for (name, body) in [
        ("index.html", "<h1>Home</h1>"),
        ("about.html", "<h1>About</h1>"),
    ] {
        let page = TEMPLATE.replace("<p>placeholder content</p>", body);
        fs::write(dir.join(name), page)?;
    }

    println!("demo site written to {}", dir.display());
    println!(
        "edit base.html, then run: cargo run -p eztemplate -- {}",
        dir.display()
    );
    Ok(())
}
