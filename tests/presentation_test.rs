//! Listing and tree rendering over a populated store

use forumtree::domain::{annotate, to_tree, ForumArena, ForumRecord, DESIGNATED_TREE};

fn record(name: &str) -> ForumRecord {
    ForumRecord {
        name: name.to_string(),
        description: String::new(),
    }
}

/// A, B(2), C(2), D(2), E; C has a child F(3).
fn arena() -> ForumArena {
    let mut arena = ForumArena::new();
    let a = arena.insert(DESIGNATED_TREE, None, record("A")).unwrap();
    arena.insert(DESIGNATED_TREE, Some(a.id), record("B")).unwrap();
    let c = arena.insert(DESIGNATED_TREE, Some(a.id), record("C")).unwrap();
    arena.insert(DESIGNATED_TREE, Some(c.id), record("F")).unwrap();
    arena.insert(DESIGNATED_TREE, Some(a.id), record("D")).unwrap();
    arena.insert(DESIGNATED_TREE, None, record("E")).unwrap();
    arena
}

#[test]
fn given_traversal_when_annotating_then_preserves_length_and_order() {
    let forums = arena().traverse(DESIGNATED_TREE);
    let ids: Vec<_> = forums.iter().map(|f| f.id).collect();

    let rows = annotate(forums);

    assert_eq!(rows.iter().map(|r| r.forum.id).collect::<Vec<_>>(), ids);
    for row in &rows {
        assert_eq!(row.level_range.len() as u32, row.forum.level - 1);
    }
}

#[test]
fn given_traversal_when_annotating_then_each_level_has_one_first_and_one_last() {
    let rows = annotate(arena().traverse(DESIGNATED_TREE));

    for level in 1..=3 {
        let group: Vec<_> = rows.iter().filter(|r| r.forum.level == level).collect();
        assert_eq!(group.iter().filter(|r| r.first).count(), 1, "level {level}");
        assert_eq!(group.iter().filter(|r| r.last).count(), 1, "level {level}");
    }
    let f = rows.iter().find(|r| r.forum.name == "F").unwrap();
    assert!(f.first && f.last);
    assert!(!f.can_move_up() && !f.can_move_down());
}

#[test]
fn given_traversal_when_rendering_tree_then_nests_children_under_parents() {
    let forums = arena().traverse(DESIGNATED_TREE);

    let rendered = to_tree("Forums", &forums).to_string();

    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "Forums");
    assert_eq!(lines.len(), 7);
    assert!(lines[1].ends_with("A [#1]"));
    assert!(lines[4].ends_with("F [#4]"));
    assert!(lines[6].ends_with("E [#6]"));
    // F sits two levels below the root line
    let indent = |line: &str| line.find(|c: char| c.is_alphabetic()).unwrap_or(0);
    assert!(indent(lines[4]) > indent(lines[3]));
    assert!(indent(lines[3]) > indent(lines[1]));
    assert_eq!(indent(lines[1]), indent(lines[6]));
}

#[test]
fn given_empty_tree_when_rendering_then_only_title() {
    let rendered = to_tree("Forums", &[]).to_string();

    assert_eq!(rendered.trim_end(), "Forums");
}
