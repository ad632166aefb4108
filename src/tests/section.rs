use super::SectionTree;
use crate::error::{RemovalError, TopologyIssue};
use crate::localizer::SectionLocalizer;
use crate::section_id::SectionId;

fn id(s: &str) -> SectionId {
    SectionId::parse(s).unwrap()
}

fn titles(tree: &SectionTree, indices: &[usize]) -> Vec<String> {
    indices
        .iter()
        .map(|&i| tree.sections()[i].id.to_string())
        .collect()
}

#[test]
fn test_build_nests_by_identifier() {
    let localizer = SectionLocalizer::from_pairs([
        ("1.", 0),
        ("1.1.", 1),
        ("1.2.", 3),
        ("1.2.1.", 4),
        ("2.", 6),
    ])
    .unwrap();
    let tree = SectionTree::build(&localizer, 8).unwrap();

    assert_eq!(titles(&tree, tree.roots()), vec!["1.", "2."]);

    let one = tree.find(&id("1.")).unwrap();
    assert_eq!(
        titles(&tree, &tree.sections()[one].children_indices),
        vec!["1.1.", "1.2."]
    );

    let nested = tree.find(&id("1.2.1.")).unwrap();
    let parent = tree.sections()[nested].parent_index.unwrap();
    assert_eq!(tree.sections()[parent].id, id("1.2."));
}

#[test]
fn test_later_siblings_and_subtree() {
    let localizer = SectionLocalizer::from_pairs([
        ("1.", 0),
        ("1.1.", 1),
        ("1.2.", 2),
        ("1.2.1.", 3),
        ("1.3.", 4),
        ("2.", 5),
    ])
    .unwrap();
    let tree = SectionTree::build(&localizer, 6).unwrap();

    let first = tree.find(&id("1.1.")).unwrap();
    assert_eq!(titles(&tree, tree.later_siblings(first)), vec!["1.2.", "1.3."]);

    let last = tree.find(&id("2.")).unwrap();
    assert!(tree.later_siblings(last).is_empty());

    let one = tree.find(&id("1.")).unwrap();
    assert_eq!(
        titles(&tree, &tree.subtree(one)),
        vec!["1.", "1.1.", "1.2.", "1.2.1.", "1.3."]
    );
}

#[test]
fn test_missing_parent_attaches_to_nearest_ancestor() {
    let localizer = SectionLocalizer::from_pairs([("1.", 0), ("1.2.3.", 1), ("2.", 2)]).unwrap();
    let tree = SectionTree::build(&localizer, 3).unwrap();

    let orphan = tree.find(&id("1.2.3.")).unwrap();
    let parent = tree.sections()[orphan].parent_index.unwrap();
    assert_eq!(tree.sections()[parent].id, id("1."));
}

#[test]
fn test_rejects_start_past_end() {
    let localizer = SectionLocalizer::from_pairs([("1.", 0), ("2.", 5)]).unwrap();
    let err = SectionTree::build(&localizer, 3).unwrap_err();
    assert_eq!(
        err,
        RemovalError::UnsupportedTopology {
            section: id("2."),
            reason: TopologyIssue::StartOutOfBounds { start: 5, len: 3 },
        }
    );
}

#[test]
fn test_rejects_child_before_parent() {
    let localizer = SectionLocalizer::from_pairs([("1.", 2), ("1.1.", 1)]).unwrap();
    let err = SectionTree::build(&localizer, 4).unwrap_err();
    assert!(matches!(
        err,
        RemovalError::UnsupportedTopology {
            reason: TopologyIssue::ChildBeforeParent { .. },
            ..
        }
    ));
}
