//! Preorder traversal over the closed set of pipeline node kinds.

use crate::pipe::{Action, Pipe, Table};

/// A node of the pipeline tree.
///
/// The set of variants is closed, so inspectors handle every kind with an
/// exhaustive `match`.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// The pipe root. Visited first.
    Pipe(&'a Pipe),
    /// A table. Visited in program order.
    Table(&'a Table),
    /// An action, visited right after its owning table.
    Action {
        /// The owning table.
        table: &'a Table,
        /// The action itself.
        action: &'a Action,
    },
}

impl Node<'_> {
    /// The node's name, for logging.
    pub fn name(&self) -> &str {
        match self {
            Node::Pipe(pipe) => &pipe.name,
            Node::Table(table) => &table.name,
            Node::Action { action, .. } => &action.name,
        }
    }
}

/// A read-only pass over a [`Pipe`].
///
/// `preorder` returns whether the node's children should be visited.
/// `end_apply` runs once after the whole tree has been walked.
pub trait Inspector {
    /// Error that aborts the walk.
    type Error;

    /// Called on each node before its children.
    fn preorder(&mut self, node: Node<'_>) -> Result<bool, Self::Error>;

    /// Called once after the walk completes.
    fn end_apply(&mut self, _pipe: &Pipe) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Pipe {
    /// Walks the tree in preorder, stopping at the first error.
    pub fn apply<I: Inspector>(&self, inspector: &mut I) -> Result<(), I::Error> {
        if inspector.preorder(Node::Pipe(self))? {
            for table in &self.tables {
                if inspector.preorder(Node::Table(table))? {
                    for action in &table.actions {
                        inspector.preorder(Node::Action { table, action })?;
                    }
                }
            }
        }
        inspector.end_apply(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Trace {
        seen: Vec<String>,
        skip_children_of: Option<&'static str>,
        ended: bool,
    }

    impl Inspector for Trace {
        type Error = String;

        fn preorder(&mut self, node: Node<'_>) -> Result<bool, String> {
            let tag = match node {
                Node::Pipe(_) => "pipe",
                Node::Table(_) => "table",
                Node::Action { .. } => "action",
            };
            self.seen.push(format!("{tag}:{}", node.name()));
            Ok(self.skip_children_of != Some(node.name()))
        }

        fn end_apply(&mut self, _pipe: &Pipe) -> Result<(), String> {
            self.ended = true;
            Ok(())
        }
    }

    fn pipe() -> Pipe {
        Pipe::new("p", 1)
            .with_table(Table::new("a").action("x").action("y"))
            .with_table(Table::new("b").action("z"))
    }

    #[test]
    fn visits_in_preorder() {
        let mut trace = Trace::default();
        pipe().apply(&mut trace).unwrap();
        assert_eq!(
            trace.seen,
            vec!["pipe:p", "table:a", "action:x", "action:y", "table:b", "action:z"]
        );
        assert!(trace.ended);
    }

    #[test]
    fn false_skips_children() {
        let mut trace = Trace {
            skip_children_of: Some("a"),
            ..Trace::default()
        };
        pipe().apply(&mut trace).unwrap();
        assert_eq!(trace.seen, vec!["pipe:p", "table:a", "table:b", "action:z"]);
    }

    struct FailOn(&'static str);

    impl Inspector for FailOn {
        type Error = String;

        fn preorder(&mut self, node: Node<'_>) -> Result<bool, String> {
            if node.name() == self.0 {
                return Err(format!("stopped at {}", self.0));
            }
            Ok(true)
        }
    }

    #[test]
    fn error_stops_walk() {
        let err = pipe().apply(&mut FailOn("a")).unwrap_err();
        assert_eq!(err, "stopped at a");
    }
}
