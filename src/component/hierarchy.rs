//! Human-readable tree dumps.
//!
//! ```text
//! Root
//! └── HBox
//!     ├── VBox
//!     │   ├── Text#counter
//!     │   └── Button|primary
//!     └── VBox
//! ```

use crate::types::Verbosity;

use super::Component;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// Something that can print itself and the subtree below it.
pub trait Hierarchy {
    /// One-line description of this node.
    fn stringify(&self, verbosity: Verbosity) -> String;

    /// Append this node's line with `prefix`, then its children, whose lines
    /// start with `child_prefix`.
    fn stringify_hierarchy(
        &self,
        out: &mut String,
        prefix: &str,
        child_prefix: &str,
        verbosity: Verbosity,
    );

    /// The whole subtree, one line per node.
    fn hierarchy(&self, verbosity: Verbosity) -> String {
        let mut out = String::new();
        self.stringify_hierarchy(&mut out, "", "", verbosity);
        out
    }
}

impl Hierarchy for Component {
    fn stringify(&self, _verbosity: Verbosity) -> String {
        self.label()
    }

    fn stringify_hierarchy(
        &self,
        out: &mut String,
        prefix: &str,
        child_prefix: &str,
        verbosity: Verbosity,
    ) {
        out.push_str(prefix);
        out.push_str(&self.stringify(verbosity));
        out.push('\n');

        let children = self.inner.children.snapshot();
        let last = children.len().saturating_sub(1);
        for (index, child) in children.iter().enumerate() {
            let (branch, indent) = if index == last {
                (LAST_BRANCH, SPACE)
            } else {
                (BRANCH, PIPE)
            };
            child.stringify_hierarchy(
                out,
                &format!("{child_prefix}{branch}"),
                &format!("{child_prefix}{indent}"),
                verbosity,
            );
        }
    }
}

/// Print `child` as the only entry under a parent line.
pub(crate) fn stringify_only_child(
    child: &Component,
    out: &mut String,
    child_prefix: &str,
    verbosity: Verbosity,
) {
    child.stringify_hierarchy(
        out,
        &format!("{child_prefix}{LAST_BRANCH}"),
        &format!("{child_prefix}{SPACE}"),
        verbosity,
    );
}
