//! Cyclomatic complexity estimation for a single callable.
//!
//! Complexity is 1 (the base path) plus one for every branch construct found
//! anywhere in the definition's subtree, nested callables included.
//!
//! The candidate set names every node type that contributes a decision point
//! in principle. Only candidates whose type name is a statement or a clause
//! are counted; ternaries and logical operators are recognised but ignored,
//! so `a && b` never changes the score.

use phf::phf_map;
use tree_sitter::Node;

/// Syntactic category of a branch candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchCategory {
    If,
    For,
    While,
    Case,
    Catch,
    Ternary,
    BinaryLogical,
}

/// Tree-sitter node types considered as branch candidates.
static BRANCH_CANDIDATES: phf::Map<&'static str, BranchCategory> = phf_map! {
    "if_statement" => BranchCategory::If,
    "for_statement" => BranchCategory::For,
    "while_statement" => BranchCategory::While,
    "case_statement" => BranchCategory::Case,
    "catch_clause" => BranchCategory::Catch,
    "conditional_expression" => BranchCategory::Ternary,
    "binary_expression" => BranchCategory::BinaryLogical,
    "boolean_operator" => BranchCategory::BinaryLogical,
};

/// Look up the branch category of a node type.
pub fn classify(node_kind: &str) -> Option<BranchCategory> {
    BRANCH_CANDIDATES.get(node_kind).copied()
}

/// Whether a node of this type adds a decision point.
pub fn counts_as_branch(node_kind: &str) -> bool {
    classify(node_kind).is_some()
        && (node_kind.contains("statement") || node_kind.contains("clause"))
}

/// Estimate the complexity of the subtree rooted at `root`.
///
/// Walks every descendant exactly once with a tree cursor (no recursion),
/// testing each node after its children have been visited. Never returns
/// less than 1.
pub fn estimate(root: Node) -> u32 {
    let mut complexity = 1;
    let mut cursor = root.walk();
    let mut visited_children = false;

    loop {
        if visited_children {
            if counts_as_branch(cursor.node().kind()) {
                complexity += 1;
            }

            if cursor.goto_next_sibling() {
                visited_children = false;
            } else if !cursor.goto_parent() {
                break;
            }
        } else if !cursor.goto_first_child() {
            visited_children = true;
        }
    }

    complexity
}
