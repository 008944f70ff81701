// src/cli/completion.rs
use crate::cli::args::Cli;
use clap::CommandFactory;
use clap_complete::{
    generate,
    shells::{Bash, Fish, Zsh},
};
use std::io::{self, Write};
use tracing::{debug, instrument};

/// Writes the completion script for `shell` ("bash", "zsh" or "fish") to `out`.
///
/// ```bash
/// eval "$(bmtree completion bash)"
/// ```
#[instrument(level = "debug", skip(out))]
pub fn generate_completion<W: Write>(shell: &str, out: &mut W) -> io::Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    match shell.to_lowercase().as_str() {
        "bash" => {
            debug!("Generating bash completion");
            generate(Bash, &mut cmd, bin_name, out);
            Ok(())
        }
        "zsh" => {
            debug!("Generating zsh completion");
            generate(Zsh, &mut cmd, bin_name, out);
            Ok(())
        }
        "fish" => {
            debug!("Generating fish completion");
            generate(Fish, &mut cmd, bin_name, out);
            Ok(())
        }
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "Unsupported shell: {}. Supported shells: bash, zsh, fish",
                shell
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_supported_shells_when_generate_then_script_mentions_binary() -> io::Result<()> {
        for shell in ["bash", "ZSH", "fish"] {
            let mut buffer = Vec::new();
            generate_completion(shell, &mut buffer)?;
            let script = String::from_utf8_lossy(&buffer);
            assert!(script.contains("bmtree"), "{} script", shell);
            assert!(script.contains("mkdir"), "{} script", shell);
        }
        Ok(())
    }

    #[test]
    fn given_unknown_shell_when_generate_then_invalid_input() {
        let mut buffer = Vec::new();
        let err = generate_completion("powershell", &mut buffer).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(buffer.is_empty());
    }
}
