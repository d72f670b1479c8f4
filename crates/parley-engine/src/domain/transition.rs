//! What follows a branch once all its lines have been shown.

use std::sync::Arc;

use parley_graph::{Branch, BranchGraph};

/// Resolution after the last line of a branch.
#[derive(Debug, Clone, PartialEq)]
pub enum BranchExit {
    /// Present the branch's choices.
    ShowChoices,
    /// Jump to the authored auto-next id. The id is not checked against the
    /// graph.
    AutoNext(String),
    /// Fall through to the next branch in traversal order.
    Successor(Arc<Branch>),
    /// Nothing follows.
    End,
}

/// Decides where `branch` leads: choices, then auto-next, then the
/// traversal successor, then the end.
#[must_use]
pub fn exit_for(branch: &Branch, graph: &BranchGraph) -> BranchExit {
    if !branch.choices.is_empty() {
        return BranchExit::ShowChoices;
    }
    if let Some(id) = branch.auto_next() {
        return BranchExit::AutoNext(id.to_owned());
    }
    graph
        .next(&branch.id)
        .map_or(BranchExit::End, |next| BranchExit::Successor(Arc::clone(next)))
}

#[cfg(test)]
mod tests {
    use parley_graph::{BranchGroup, ChoiceTarget};

    use super::*;

    fn graph(branches: Vec<Branch>) -> BranchGraph {
        BranchGraph::from_groups(&[BranchGroup::new("g", branches)]).0
    }

    #[test]
    fn test_choices_take_precedence_over_auto_next() {
        let branch = Branch::new("A")
            .with_choice("Leave", ChoiceTarget::EndConversation)
            .with_auto_next("B");
        let graph = graph(vec![branch.clone(), Branch::new("B")]);

        assert_eq!(exit_for(&branch, &graph), BranchExit::ShowChoices);
    }

    #[test]
    fn test_auto_next_takes_precedence_over_successor() {
        let branch = Branch::new("A").with_auto_next("C");
        let graph = graph(vec![branch.clone(), Branch::new("B"), Branch::new("C")]);

        assert_eq!(exit_for(&branch, &graph), BranchExit::AutoNext("C".to_owned()));
    }

    #[test]
    fn test_falls_through_to_successor_then_end() {
        // Arrange
        let first = Branch::new("A");
        let last = Branch::new("B");
        let graph = graph(vec![first.clone(), last.clone()]);

        // Act
        let after_first = exit_for(&first, &graph);
        let after_last = exit_for(&last, &graph);

        // Assert
        assert!(matches!(after_first, BranchExit::Successor(next) if next.id == "B"));
        assert_eq!(after_last, BranchExit::End);
    }

    #[test]
    fn test_empty_auto_next_falls_through() {
        let branch = Branch::new("A").with_auto_next("");
        let graph = graph(vec![branch.clone()]);

        assert_eq!(exit_for(&branch, &graph), BranchExit::End);
    }
}
