use anyhow::{Context, anyhow};
use boardedit::action::ActionRegistry;
use boardedit::script::run_script;
use boardedit::{Config, Editor};
use clap::{ArgAction, Parser};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "boardedit")]
#[command(
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BOARDEDIT_GIT_HASH"), ")"),
    about = "Scriptable editing core for 2D board layouts"
)]
struct Cli {
    /// Configuration file (default: ~/.config/boardedit/config.toml)
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Script to replay (default: read from stdin)
    #[arg(long, short = 's', value_name = "FILE")]
    script: Option<PathBuf>,

    /// Continue after a failing script line and report every failure
    #[arg(long, short = 'k', action = ArgAction::SetTrue)]
    keep_going: bool,

    /// Print the final board as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    dump_board: bool,

    /// List the available actions and exit
    #[arg(long, action = ArgAction::SetTrue, conflicts_with_all = ["script", "dump_board"])]
    list_actions: bool,

    /// Write a documented default config file and exit
    #[arg(long, action = ArgAction::SetTrue, conflicts_with_all = ["script", "dump_board", "list_actions"])]
    init_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.list_actions {
        for action in ActionRegistry::builtin().actions() {
            println!("{:<40} {}", action.usage(), action.help);
        }
        return Ok(());
    }

    if cli.init_config {
        let path = Config::create_default_file()?;
        println!("Created {}", path.display());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let mut editor = Editor::from_config(&config).context("Invalid keybinding configuration")?;

    let (source, script) = match &cli.script {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read script {}", path.display()))?;
            (path.display().to_string(), text)
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read script from stdin")?;
            ("<stdin>".to_string(), text)
        }
    };

    log::info!("Running script {}", source);
    let report = run_script(&mut editor, &script, cli.keep_going)
        .map_err(|failure| anyhow!("{}:{}", source, failure))?;

    if cli.dump_board {
        println!("{}", serde_json::to_string_pretty(&editor.session.board)?);
    }

    for failure in &report.failures {
        eprintln!("{}:{}", source, failure);
    }
    log::info!("{}: {}", source, report);

    if report.is_success() {
        Ok(())
    } else {
        Err(anyhow!("{} line(s) failed", report.failures.len()))
    }
}
