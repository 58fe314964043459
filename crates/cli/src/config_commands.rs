use std::path::{Path, PathBuf};

use {anyhow::Result, clap::Subcommand};

use boxpanel_config::{
    Severity,
    validate::{self, ValidationResult},
};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors/warnings.
    Check {
        /// Config file to check (defaults to the discovered one).
        path: Option<PathBuf>,
        /// Show informational diagnostics in addition to errors and warnings.
        #[arg(long)]
        verbose: bool,
    },
    /// Write a documented default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the path of the config file in use.
    Path,
}

pub fn handle_config(action: ConfigAction, config_path: Option<PathBuf>) -> Result<()> {
    match action {
        ConfigAction::Check { path, verbose } => check(path.or(config_path).as_deref(), verbose),
        ConfigAction::Init { force } => {
            let path = config_path.unwrap_or_else(boxpanel_config::find_or_default_config_path);
            init(&path, force)?;
            println!("Wrote {}", path.display());
            Ok(())
        },
        ConfigAction::Path => {
            match config_path.or_else(boxpanel_config::find_config_file) {
                Some(path) => println!("{}", path.display()),
                None => eprintln!("No config file found; using defaults."),
            }
            Ok(())
        },
    }
}

fn init(path: &Path, force: bool) -> Result<()> {
    boxpanel_config::write_default_config(path, force)
}

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn check(path: Option<&Path>, verbose: bool) -> Result<()> {
    let result = validate::validate(path);

    if let Some(ref path) = result.config_path {
        eprintln!("Checking {}\n", path.display());
    } else {
        eprintln!("No config file found; checking defaults.\n");
    }

    let shown = print_diagnostics(&result, verbose);

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);

    if shown > 0 {
        eprintln!();
    }

    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }

    if errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn print_diagnostics(result: &ValidationResult, verbose: bool) -> usize {
    let mut shown = 0;
    for d in &result.diagnostics {
        if d.severity == Severity::Info && !verbose {
            continue;
        }

        let (color, label) = match d.severity {
            Severity::Error => (RED, "error"),
            Severity::Warning => (YELLOW, "warning"),
            Severity::Info => (CYAN, "info"),
        };

        if d.path.is_empty() {
            eprintln!("  {BOLD}{color}{label}{RESET} {}", d.message);
        } else {
            eprintln!("  {BOLD}{color}{label}{RESET} {}: {}", d.path, d.message);
        }
        shown += 1;
    }
    shown
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, tempfile::TempDir};

    #[test]
    fn init_writes_a_valid_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("boxpanel.toml");

        init(&path, false).unwrap();
        assert!(path.exists());

        let result = validate::validate(Some(&path));
        assert_eq!(result.count(Severity::Error), 0);
        assert!(boxpanel_config::load_config(&path).is_ok());
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("boxpanel.toml");
        std::fs::write(&path, "[server]\nport = 9000\n").unwrap();

        assert!(init(&path, false).is_err());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[server]\nport = 9000\n"
        );

        init(&path, true).unwrap();
        assert_ne!(
            std::fs::read_to_string(&path).unwrap(),
            "[server]\nport = 9000\n"
        );
    }
}
