//! Shared helpers for CLI commands: project root lookup, configuration,
//! and diagnostic rendering.

use std::path::{Path, PathBuf};

use tally_config::{ConfigError, TallyConfig, CONFIG_FILE};
use tally_diagnostics::{
    Category, Diagnostic, DiagnosticCode, DiagnosticRenderer, JsonRenderer, Subject,
    TerminalRenderer,
};

use crate::{GlobalArgs, ReportFormat};

/// Walks up from `start` looking for the nearest directory containing
/// `tally.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root from global CLI args.
///
/// `--config` may name the file itself or its directory. Without it, the
/// current directory and its parents are searched.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match global.config {
        Some(ref p) if p.is_file() => Ok(p
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))),
        Some(ref p) => Ok(p.clone()),
        None => find_project_root(&std::env::current_dir()?),
    }
}

/// Loads `tally.toml` and anchors a relative `output.dir` at the project
/// root.
pub fn load_project_config(root: &Path) -> Result<TallyConfig, ConfigError> {
    let mut config = tally_config::load_config(root)?;
    if config.output.dir.is_relative() {
        config.output.dir = root.join(&config.output.dir);
    }
    Ok(config)
}

/// Describes a configuration failure as a `C001` diagnostic on the config
/// file.
pub fn config_diagnostic(root: &Path, err: &ConfigError) -> Diagnostic {
    Diagnostic::error(DiagnosticCode::new(Category::Config, 1), err.to_string()).with_subject(
        Subject::File {
            path: root.join(CONFIG_FILE),
        },
    )
}

/// Prints diagnostics to stderr in the requested format.
pub fn emit_diagnostics(diagnostics: &[Diagnostic], format: ReportFormat, color: bool) {
    let renderer: Box<dyn DiagnosticRenderer> = match format {
        ReportFormat::Text => Box::new(TerminalRenderer::new(color)),
        ReportFormat::Json => Box::new(JsonRenderer),
    };
    for diag in diagnostics {
        eprintln!("{}", renderer.render(diag).trim_end());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MINIMAL: &str = "[report]\nprogram_name = \"switch\"\n";

    fn global(config: Option<PathBuf>) -> GlobalArgs {
        GlobalArgs {
            quiet: false,
            color: false,
            config,
        }
    }

    #[test]
    fn find_project_root_in_current_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), MINIMAL).unwrap();
        assert_eq!(find_project_root(tmp.path()).unwrap(), tmp.path());
    }

    #[test]
    fn find_project_root_in_parent() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), MINIMAL).unwrap();
        let nested = tmp.path().join("dumps").join("pipe0");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_project_root(&nested).unwrap(), tmp.path());
    }

    #[test]
    fn resolve_project_root_from_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE);
        fs::write(&config_path, MINIMAL).unwrap();
        let root = resolve_project_root(&global(Some(config_path))).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn resolve_project_root_from_config_dir() {
        let tmp = TempDir::new().unwrap();
        let root = resolve_project_root(&global(Some(tmp.path().to_path_buf()))).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn relative_output_dir_is_anchored_at_root() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[report]\nprogram_name = \"switch\"\n[output]\ndir = \"build\"\n",
        )
        .unwrap();
        let config = load_project_config(tmp.path()).unwrap();
        let out = tally_config::resolve_output(&config, None);
        assert_eq!(out.output_dir, tmp.path().join("build"));
        assert_eq!(out.artifact_path, tmp.path().join("build").join("resources.json"));

        let cli = tally_config::resolve_output(&config, Some(Path::new("/elsewhere")));
        assert_eq!(cli.manifest_path, Path::new("/elsewhere/manifest.json"));
    }

    #[test]
    fn artifact_escaping_output_dir_is_a_config_diagnostic() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[report]\nprogram_name = \"switch\"\n[output]\nartifact = \"../x.json\"\n",
        )
        .unwrap();
        let err = load_project_config(tmp.path()).unwrap_err();
        let diag = config_diagnostic(tmp.path(), &err);
        assert_eq!(diag.code.to_string(), "C001");
        assert!(diag.message.contains("output.artifact"));
    }

    #[test]
    fn config_errors_become_config_diagnostics() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[report]\nprogram_name = \"\"\n").unwrap();
        let err = load_project_config(tmp.path()).unwrap_err();
        let diag = config_diagnostic(tmp.path(), &err);
        assert_eq!(diag.code.to_string(), "C001");
        assert_eq!(
            diag.subject,
            Some(Subject::File {
                path: tmp.path().join(CONFIG_FILE)
            })
        );
    }
}
