//! `tally check`: collect a pipeline and report its invariants without
//! writing anything. Action/instruction mismatches are printed as warnings.

use tally_resources::{collect, lint_actions};

use crate::pipeline::emit_diagnostics;
use crate::{CheckArgs, GlobalArgs, ReportFormat};

/// Runs `tally check`. Returns 0 if the pipeline collects, warnings or not,
/// and 1 if an allocation invariant is violated.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let pipe = tally_ir::Pipe::load(&args.pipe)?;
    let report = match collect(&pipe) {
        Ok(report) => report,
        Err(err) => {
            emit_diagnostics(&[err.to_diagnostic()], ReportFormat::Text, global.color);
            return Ok(1);
        }
    };

    if !global.quiet {
        emit_diagnostics(&lint_actions(&pipe), ReportFormat::Text, global.color);
        let wide = pipe.tables.iter().filter(|t| t.is_wide()).count();
        println!(
            "pipe {}: {} stages, {} tables ({} wide)",
            report.pipe_name(),
            report.stages().len(),
            pipe.tables.len(),
            wide
        );
        for stage in report.stages() {
            println!(
                "  stage {:>2}: {} tables, {} xbar bytes, {} hash bits, {} hash dist units, {} action bus bytes, {} memory allocations",
                stage.stage().as_raw(),
                stage.logical_tables().len(),
                stage.xbar_bytes().len(),
                stage.hash_bits().len(),
                stage.hash_dist().len(),
                stage.action_bus().len(),
                stage.memories().len(),
            );
        }
    }
    Ok(0)
}
