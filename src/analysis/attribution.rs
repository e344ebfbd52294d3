//! Attribution of references to their enclosing containers.
//!
//! References carry a single line; containers carry a line span. A reference
//! belongs to a container whose span contains its line. When several
//! eligible containers qualify, the pass's [`TieBreak`] picks one:
//!
//! - inheritance uses [`TieBreak::FirstMatch`]: the first `class` container
//!   in extraction order wins, even if a nested class is tighter.
//! - calls use [`TieBreak::Innermost`]: the callable with the smallest span
//!   wins, ties going to the earlier container.
//!
//! References that no eligible container contains are dropped.

use super::facts::{Container, ContainerKind, Reference, ReferenceKind};

/// How to choose between several containers that all contain a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    /// First eligible container in extraction order.
    FirstMatch,
    /// Eligible container with the minimum `end_line - start_line`.
    Innermost,
}

/// One attribution pass: which references, onto which containers, how.
#[derive(Debug, Clone, Copy)]
pub struct AttributionPass {
    pub reference_kind: ReferenceKind,
    pub eligible: fn(&ContainerKind) -> bool,
    pub tie_break: TieBreak,
}

fn is_class(kind: &ContainerKind) -> bool {
    *kind == ContainerKind::Class
}

fn is_callable(kind: &ContainerKind) -> bool {
    kind.is_callable()
}

impl AttributionPass {
    /// `extends` references onto `class` containers, first match.
    pub const INHERITANCE: AttributionPass = AttributionPass {
        reference_kind: ReferenceKind::Extends,
        eligible: is_class,
        tie_break: TieBreak::FirstMatch,
    };

    /// `call` references onto function/method containers, innermost match.
    pub const CALLS: AttributionPass = AttributionPass {
        reference_kind: ReferenceKind::Call,
        eligible: is_callable,
        tie_break: TieBreak::Innermost,
    };

    /// Index of the container `reference` attributes to, if any.
    pub fn resolve(&self, containers: &[Container], reference: &Reference) -> Option<usize> {
        let mut candidates = containers
            .iter()
            .enumerate()
            .filter(|(_, c)| (self.eligible)(&c.kind) && c.span.contains(reference.line));

        match self.tie_break {
            TieBreak::FirstMatch => candidates.next().map(|(i, _)| i),
            TieBreak::Innermost => {
                let mut best: Option<(usize, usize)> = None;
                for (i, c) in candidates {
                    let extent = c.span.extent();
                    if best.map_or(true, |(_, best_extent)| extent < best_extent) {
                        best = Some((i, extent));
                    }
                }
                best.map(|(i, _)| i)
            }
        }
    }

    /// Attribute every reference of this pass's kind and return the updated
    /// containers. References of another kind are ignored.
    pub fn apply(&self, mut containers: Vec<Container>, references: &[Reference]) -> Vec<Container> {
        for reference in references.iter().filter(|r| r.kind == self.reference_kind) {
            let Some(index) = self.resolve(&containers, reference) else {
                tracing::trace!(
                    kind = %reference.kind,
                    name = %reference.name,
                    line = reference.line,
                    "reference outside any container, dropped"
                );
                continue;
            };

            let target = &mut containers[index];
            match self.reference_kind {
                ReferenceKind::Call => target.add_call(&reference.name),
                ReferenceKind::Extends => target.add_extends(&reference.name),
            }
        }
        containers
    }
}

/// Run inheritance then call attribution.
pub fn attribute(
    containers: Vec<Container>,
    extends: &[Reference],
    calls: &[Reference],
) -> Vec<Container> {
    let containers = AttributionPass::INHERITANCE.apply(containers, extends);
    AttributionPass::CALLS.apply(containers, calls)
}
