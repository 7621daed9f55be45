//! `tally report`: collect, write `resources.json`, register it.
//!
//! 1. Find the project root and load `tally.toml`
//! 2. Load the pipeline dump
//! 3. Collect per-stage usage
//! 4. Write the artifact and update the manifest

use serde_json::json;
use tally_manifest::Manifest;
use tally_resources::{collect, ReportOptions, Reporter, ResourceError};

use crate::pipeline::{
    config_diagnostic, emit_diagnostics, load_project_config, resolve_project_root,
};
use crate::{GlobalArgs, ReportArgs, ReportFormat};

/// Runs `tally report`. Returns 0 on success and 1 when collection or
/// writing failed with a diagnostic.
pub fn run(args: &ReportArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let root = resolve_project_root(global)?;
    let config = match load_project_config(&root) {
        Ok(config) => config,
        Err(err) => {
            emit_diagnostics(&[config_diagnostic(&root, &err)], args.format, global.color);
            return Ok(1);
        }
    };
    let out = tally_config::resolve_output(&config, args.output_dir.as_deref());

    let pipe = tally_ir::Pipe::load(&args.pipe)?;
    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "   Reporting {} ({}, {} tables)",
            config.report.program_name,
            pipe.name,
            pipe.tables.len()
        );
    }

    let options = ReportOptions {
        program_name: config.report.program_name.clone(),
        compiler_version: config.report.compiler_version.clone(),
        pretty: config.report.pretty,
    };

    let outcome = collect(&pipe).and_then(|report| {
        let mut manifest = Manifest::load_or_new(&out.manifest_path)?;
        let written = Reporter::new(options).write(
            &report,
            &out.artifact_path,
            &out.output_dir,
            &mut manifest,
        )?;
        manifest.save(&out.manifest_path)?;
        Ok::<_, ResourceError>((report, written))
    });

    let (report, written) = match outcome {
        Ok(done) => done,
        Err(err) => {
            emit_diagnostics(&[err.to_diagnostic()], args.format, global.color);
            return Ok(1);
        }
    };

    match args.format {
        ReportFormat::Text => {
            if !global.quiet {
                eprintln!(
                    "       Wrote {} ({} stages, digest {})",
                    written.path.display(),
                    report.stages().len(),
                    written.digest
                );
            }
        }
        ReportFormat::Json => {
            let summary = json!({
                "pipe": report.pipe_name(),
                "path": written.relative_path.display().to_string(),
                "stages": report.stages().len(),
                "digest": written.digest.to_string(),
            });
            println!("{summary}");
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const PIPE: &str = r#"{
        "name": "pipe0",
        "stage_count": 2,
        "tables": [
            {"name": "T1", "placements": [{"stage": 0, "logical_id": 3, "resources": {
                "xbar": [{"purpose": "exact-match-key", "bytes": [{"group": 2, "index": 1}]}]
            }}]},
            {"name": "T2", "placements": [{"stage": 1, "logical_id": 0, "resources": {}}]}
        ]
    }"#;

    fn project(pipe: &str) -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("tally.toml"),
            "[report]\nprogram_name = \"switch\"\n[output]\ndir = \"build\"\n",
        )
        .unwrap();
        fs::create_dir(tmp.path().join("build")).unwrap();
        fs::write(tmp.path().join("pipe.json"), pipe).unwrap();
        tmp
    }

    fn args(tmp: &TempDir) -> (ReportArgs, GlobalArgs) {
        (
            ReportArgs {
                pipe: tmp.path().join("pipe.json"),
                output_dir: None,
                format: ReportFormat::Text,
            },
            GlobalArgs {
                quiet: true,
                color: false,
                config: Some(tmp.path().to_path_buf()),
            },
        )
    }

    #[test]
    fn writes_artifact_and_manifest() {
        let tmp = project(PIPE);
        let (args, global) = args(&tmp);
        assert_eq!(run(&args, &global).unwrap(), 0);

        let build: PathBuf = tmp.path().join("build");
        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(build.join("resources.json")).unwrap())
                .unwrap();
        assert_eq!(doc["program_name"], "switch");
        assert_eq!(doc["compiler_version"], "unknown");
        assert_eq!(doc["resources"]["mau"]["nStages"], 2);

        let manifest = Manifest::load_or_new(&build.join("manifest.json")).unwrap();
        assert_eq!(manifest.artifacts.len(), 1);
        assert_eq!(manifest.artifacts[0].path, "resources.json");
    }

    #[test]
    fn invariant_violation_exits_with_one() {
        let tmp = project(
            r#"{"name": "p", "stage_count": 1, "tables": [
                {"name": "A", "placements": [{"stage": 0, "logical_id": 1, "resources": {}}]},
                {"name": "B", "placements": [{"stage": 0, "logical_id": 1, "resources": {}}]}
            ]}"#,
        );
        let (args, global) = args(&tmp);
        assert_eq!(run(&args, &global).unwrap(), 1);
        assert!(!tmp.path().join("build").join("resources.json").exists());
        assert!(!tmp.path().join("build").join("manifest.json").exists());
    }

    #[test]
    fn missing_output_dir_exits_with_one() {
        let tmp = project(PIPE);
        let (mut args, global) = args(&tmp);
        args.output_dir = Some(tmp.path().join("nope"));
        assert_eq!(run(&args, &global).unwrap(), 1);
        assert!(!tmp.path().join("nope").exists());
    }

    #[test]
    fn invalid_config_exits_with_one() {
        let tmp = project(PIPE);
        fs::write(tmp.path().join("tally.toml"), "[report]\nprogram_name = \"\"\n").unwrap();
        let (args, global) = args(&tmp);
        assert_eq!(run(&args, &global).unwrap(), 1);
    }

    #[test]
    fn unreadable_pipe_is_an_error() {
        let tmp = project(PIPE);
        let (mut args, global) = args(&tmp);
        args.pipe = tmp.path().join("absent.json");
        assert!(run(&args, &global).is_err());
    }
}
