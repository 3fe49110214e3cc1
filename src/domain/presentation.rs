//! Display annotation for a flat, pre-ordered forum listing.

use std::ops::Range;

use itertools::Itertools;
use termtree::Tree;

use crate::domain::entities::Forum;

/// A forum plus the per-render metadata a listing needs.
///
/// Recomputed from scratch on every render, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumRow {
    pub forum: Forum,
    /// `0..level-1`; only its length matters, it drives indentation
    pub level_range: Range<u32>,
    /// First forum at this level in the rendered list
    pub first: bool,
    /// Last forum at this level in the rendered list
    pub last: bool,
}

impl ForumRow {
    fn new(forum: Forum) -> Self {
        let level_range = 0..forum.level.saturating_sub(1);
        Self {
            forum,
            level_range,
            first: false,
            last: false,
        }
    }

    /// Whether a "move up" control makes sense for this row.
    pub fn can_move_up(&self) -> bool {
        !self.first
    }

    /// Whether a "move down" control makes sense for this row.
    pub fn can_move_down(&self) -> bool {
        !self.last
    }
}

/// Annotate a pre-ordered forum list for display.
///
/// Rows keep the input length and order. Forums are grouped by `level`
/// value across the whole list, not by parent: two level-2 forums under
/// different parents share a group. The first member of each group gets
/// `first`, the last gets `last`; a single-member group gets both.
pub fn annotate(forums: Vec<Forum>) -> Vec<ForumRow> {
    let levels = forums
        .iter()
        .enumerate()
        .map(|(i, forum)| (forum.level, i))
        .into_group_map();

    let mut rows: Vec<ForumRow> = forums.into_iter().map(ForumRow::new).collect();
    for members in levels.values() {
        if let (Some(&first), Some(&last)) = (members.first(), members.last()) {
            rows[first].first = true;
            rows[last].last = true;
        }
    }
    rows
}

/// Render a pre-ordered forum list as a tree below a `title` root.
///
/// Relies on pre-order: a forum's parent is the nearest earlier forum
/// with a smaller level.
pub fn to_tree(title: &str, forums: &[Forum]) -> Tree<String> {
    let mut stack: Vec<(u32, Tree<String>)> = vec![(0, Tree::new(title.to_string()))];

    for forum in forums {
        fold_until(&mut stack, forum.level);
        stack.push((forum.level, Tree::new(forum.to_string())));
    }
    fold_until(&mut stack, 1);

    stack
        .pop()
        .map(|(_, tree)| tree)
        .unwrap_or_else(|| Tree::new(title.to_string()))
}

/// Pop finished subtrees into their parents until the top of the stack
/// sits above `level`.
fn fold_until(stack: &mut Vec<(u32, Tree<String>)>, level: u32) {
    while stack.len() > 1 && stack.last().map(|(l, _)| *l >= level).unwrap_or(false) {
        if let Some((_, done)) = stack.pop() {
            if let Some((_, parent)) = stack.last_mut() {
                parent.push(done);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ForumId, TreeId};
    use rstest::rstest;

    fn forum(id: u64, level: u32, name: &str) -> Forum {
        Forum {
            id: ForumId(id),
            parent_id: None,
            tree_id: TreeId(1),
            level,
            name: name.to_string(),
            description: String::new(),
        }
    }

    fn flags(rows: &[ForumRow]) -> Vec<(&str, bool, bool)> {
        rows.iter()
            .map(|r| (r.forum.name.as_str(), r.first, r.last))
            .collect()
    }

    #[test]
    fn given_empty_list_when_annotating_then_returns_empty() {
        assert!(annotate(Vec::new()).is_empty());
    }

    #[test]
    fn given_single_forum_when_annotating_then_first_and_last() {
        let rows = annotate(vec![forum(1, 1, "Only")]);

        assert_eq!(flags(&rows), vec![("Only", true, true)]);
        assert_eq!(rows[0].level_range.len(), 0);
    }

    #[test]
    fn given_two_top_levels_around_children_when_annotating_then_groups_by_level_value() {
        let rows = annotate(vec![
            forum(1, 1, "A"),
            forum(2, 2, "B"),
            forum(3, 2, "C"),
            forum(4, 2, "D"),
            forum(5, 1, "E"),
        ]);

        assert_eq!(
            flags(&rows),
            vec![
                ("A", true, false),
                ("B", true, false),
                ("C", false, false),
                ("D", false, true),
                ("E", false, true),
            ]
        );
    }

    #[test]
    fn given_cousins_at_same_level_when_annotating_then_treated_as_one_group() {
        // A
        // ├── B
        // │   └── C
        // └── D
        //     └── E
        let rows = annotate(vec![
            forum(1, 1, "A"),
            forum(2, 2, "B"),
            forum(3, 3, "C"),
            forum(4, 2, "D"),
            forum(5, 3, "E"),
        ]);

        assert_eq!(
            flags(&rows),
            vec![
                ("A", true, true),
                ("B", true, false),
                ("C", true, false),
                ("D", false, true),
                ("E", false, true),
            ]
        );
    }

    #[rstest]
    #[case(1, 0)]
    #[case(2, 1)]
    #[case(5, 4)]
    fn given_level_when_annotating_then_range_has_level_minus_one_entries(
        #[case] level: u32,
        #[case] expected: usize,
    ) {
        let rows = annotate(vec![forum(1, level, "X")]);

        assert_eq!(rows[0].level_range.len(), expected);
    }

    #[test]
    fn given_annotated_rows_when_checking_controls_then_edges_disable_moves() {
        let rows = annotate(vec![forum(1, 1, "A"), forum(2, 1, "B")]);

        assert!(!rows[0].can_move_up());
        assert!(rows[0].can_move_down());
        assert!(rows[1].can_move_up());
        assert!(!rows[1].can_move_down());
    }

    #[test]
    fn given_preordered_forums_when_rendering_tree_then_nests_by_level() {
        let forums = vec![
            forum(1, 1, "A"),
            forum(2, 2, "B"),
            forum(3, 3, "C"),
            forum(4, 2, "D"),
            forum(5, 1, "E"),
        ];

        let tree = to_tree("Forums", &forums);

        assert_eq!(tree.root, "Forums");
        assert_eq!(tree.leaves.len(), 2);
        assert_eq!(tree.leaves[0].root, "A [#1]");
        assert_eq!(tree.leaves[0].leaves.len(), 2);
        assert_eq!(tree.leaves[0].leaves[0].leaves[0].root, "C [#3]");
        assert_eq!(tree.leaves[1].root, "E [#5]");
    }

    #[test]
    fn given_no_forums_when_rendering_tree_then_only_title() {
        let tree = to_tree("Forums", &[]);

        assert_eq!(tree.root, "Forums");
        assert!(tree.leaves.is_empty());
    }
}
