// bmtree/src/cli/mod.rs
use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::config::Settings;
use crate::infrastructure::di::ServiceContainer;
use std::io;

pub mod args;
pub mod commands;
pub mod completion;
pub mod display;
pub mod error;

pub fn execute_command(cli: Cli, settings: &Settings) -> CliResult<()> {
    let mut out = display::stdout(cli.no_color);
    match cli.command {
        Some(Commands::CreateDb { path }) => commands::create_db(&mut out, &path),
        Some(Commands::Config { default }) => commands::show_config(&mut out, default, settings),
        Some(Commands::Completion { shell }) => handle_completion(&shell),
        Some(command) => {
            let services = ServiceContainer::new(settings)?;
            commands::run(&mut out, command, services.tree_service.as_ref(), settings)
        }
        None => Ok(()),
    }
}

fn handle_completion(shell: &str) -> CliResult<()> {
    match shell.to_lowercase().as_str() {
        "bash" => {
            eprintln!("# Outputting bash completion script for bmtree");
            eprintln!("# To use, run one of:");
            eprintln!("# - eval \"$(bmtree completion bash)\"                     # one-time use");
            eprintln!("# - bmtree completion bash >> ~/.bashrc                    # add to bashrc");
            eprintln!("#");
        }
        "zsh" => {
            eprintln!("# Outputting zsh completion script for bmtree");
            eprintln!("# To use, run one of:");
            eprintln!("# - eval \"$(bmtree completion zsh)\"                      # one-time use");
            eprintln!("# - bmtree completion zsh > ~/.zfunc/_bmtree               # save to fpath directory");
            eprintln!("#");
        }
        "fish" => {
            eprintln!("# Outputting fish completion script for bmtree");
            eprintln!("# - bmtree completion fish > ~/.config/fish/completions/bmtree.fish");
            eprintln!("#");
        }
        _ => {}
    }

    completion::generate_completion(shell, &mut io::stdout()).map_err(|e| {
        CliError::CommandFailed(format!("Failed to generate completion script: {}", e))
    })
}
