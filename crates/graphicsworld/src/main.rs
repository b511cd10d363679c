mod cli;
mod paths;
mod run;

use std::fs;

use anyhow::{bail, Context, Result};
use cli::{Command, ConfigAction};
use paths::AppPaths;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Config(config_cmd)) => handle_config_command(config_cmd.action),
        None => run::run(cli.run),
    }
}

fn handle_config_command(action: ConfigAction) -> Result<()> {
    let paths = AppPaths::discover()?;
    match action {
        ConfigAction::Where => {
            println!("{}", paths.config_file().display());
            Ok(())
        }
        ConfigAction::Init(args) => run_config_init(&paths, args.force),
    }
}

fn run_config_init(paths: &AppPaths, force: bool) -> Result<()> {
    let target = paths.config_file();
    if target.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            target.display()
        );
    }

    fs::create_dir_all(paths.config_dir()).with_context(|| {
        format!(
            "failed to create config directory {}",
            paths.config_dir().display()
        )
    })?;
    fs::write(&target, viewconfig::DEFAULT_TEMPLATE)
        .with_context(|| format!("failed to write {}", target.display()))?;
    println!("Wrote default configuration to {}", target.display());
    Ok(())
}
