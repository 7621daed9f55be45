//! Consistency checks between a table's declared actions and the
//! instruction-memory colors its placements carry.
//!
//! Findings are warnings. They never stop a report from being written.

use std::convert::Infallible;

use tally_diagnostics::{Category, Diagnostic, DiagnosticCode, Subject};
use tally_ir::{Action, InstrMemUse, Inspector, Node, Pipe, StagePlacement, Table};

/// A declared action has no instruction color in a stage its table occupies.
pub const UNSLOTTED_ACTION: DiagnosticCode = DiagnosticCode::new(Category::Warning, 301);
/// An instruction color names an action the table does not declare.
pub const UNDECLARED_ACTION: DiagnosticCode = DiagnosticCode::new(Category::Warning, 302);

/// Collects action/instruction mismatches as warning diagnostics.
///
/// Tables whose dump lists no actions, and placements with no instruction
/// memory recorded, are not checked.
#[derive(Debug, Default)]
pub struct ActionLint {
    diagnostics: Vec<Diagnostic>,
}

impl ActionLint {
    /// Creates an empty lint pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands over the warnings, in walk order.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn check_table(&mut self, table: &Table) {
        if table.actions.is_empty() {
            return;
        }
        for (placement, instr_mem) in instruction_placements(table) {
            for instr in instr_mem {
                if table.actions.iter().any(|a| a.name == instr.action) {
                    continue;
                }
                self.diagnostics.push(
                    Diagnostic::warning(
                        UNDECLARED_ACTION,
                        format!(
                            "instruction color {} in stage {} names action '{}', which table '{}' does not declare",
                            instr.color, placement.stage, instr.action, table.name
                        ),
                    )
                    .with_subject(table_subject(table, placement)),
                );
            }
        }
    }

    fn check_action(&mut self, table: &Table, action: &Action) {
        for (placement, instr_mem) in instruction_placements(table) {
            if instr_mem.iter().any(|i| i.action == action.name) {
                continue;
            }
            self.diagnostics.push(
                Diagnostic::warning(
                    UNSLOTTED_ACTION,
                    format!(
                        "action '{}' of table '{}' has no instruction color in stage {}",
                        action.name, table.name, placement.stage
                    ),
                )
                .with_subject(table_subject(table, placement))
                .with_help("every action needs an instruction in each stage its table occupies"),
            );
        }
    }
}

/// Placements that carry instruction memory, paired with it.
fn instruction_placements<'a>(
    table: &'a Table,
) -> impl Iterator<Item = (&'a StagePlacement, &'a [InstrMemUse])> {
    table.placements.iter().filter_map(|placement| {
        let instr_mem = placement.resources.as_ref()?.instr_mem.as_slice();
        (!instr_mem.is_empty()).then_some((placement, instr_mem))
    })
}

fn table_subject(table: &Table, placement: &StagePlacement) -> Subject {
    Subject::Table {
        name: table.name.clone(),
        stage: Some(placement.stage),
    }
}

impl Inspector for ActionLint {
    type Error = Infallible;

    fn preorder(&mut self, node: Node<'_>) -> Result<bool, Infallible> {
        match node {
            Node::Pipe(_) => {
                self.diagnostics.clear();
                Ok(true)
            }
            Node::Table(table) => {
                self.check_table(table);
                Ok(true)
            }
            Node::Action { table, action } => {
                self.check_action(table, action);
                Ok(false)
            }
        }
    }
}

/// Runs [`ActionLint`] over `pipe`.
pub fn lint_actions(pipe: &Pipe) -> Vec<Diagnostic> {
    let mut lint = ActionLint::new();
    match pipe.apply(&mut lint) {
        Ok(()) => lint.finish(),
        Err(never) => match never {},
    }
}
