//! Tree assembly (§4.4): given root page IDs, returns each root with its
//! parent-linked subtree nested, for the listing endpoint.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

/// One closure-table row, stripped of anything Tree Assembly doesn't use.
#[derive(Debug, Clone, Copy)]
pub struct ClosureRow {
    pub ancestor_id: Uuid,
    pub descendant_id: Uuid,
    pub is_parent: bool,
}

/// A node in an assembled subtree.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageNode {
    pub id: Uuid,
    pub text_title: Option<String>,
    pub sub_pages: Vec<PageNode>,
}

/// Builds the subtree rooted at `root` from `closures` (every closure row
/// touching any descendant of any requested root) and `titles` (display
/// title for every page id that may appear in the tree, including the
/// roots themselves).
///
/// Only `is_parent = true` edges are followed when nesting children;
/// terminates because the underlying relation is a DAG with depth bounded
/// by the tree (§4.4).
#[must_use]
pub fn build_subtree(root: Uuid, closures: &[ClosureRow], titles: &HashMap<Uuid, Option<String>>) -> PageNode {
    let mut children_of: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for row in closures {
        if row.is_parent {
            children_of.entry(row.ancestor_id).or_default().push(row.descendant_id);
        }
    }
    build_node(root, &children_of, titles)
}

fn build_node(id: Uuid, children_of: &HashMap<Uuid, Vec<Uuid>>, titles: &HashMap<Uuid, Option<String>>) -> PageNode {
    let sub_pages = children_of
        .get(&id)
        .into_iter()
        .flatten()
        .map(|child_id| build_node(*child_id, children_of, titles))
        .collect();
    PageNode {
        id,
        text_title: titles.get(&id).cloned().flatten(),
        sub_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(a: Uuid, d: Uuid, is_parent: bool) -> ClosureRow {
        ClosureRow {
            ancestor_id: a,
            descendant_id: d,
            is_parent,
        }
    }

    #[test]
    fn nests_only_direct_parent_edges() {
        let root = Uuid::new_v4();
        let child = Uuid::new_v4();
        let grandchild = Uuid::new_v4();

        let closures = vec![
            row(root, child, true),
            row(root, grandchild, false),
            row(child, grandchild, true),
        ];
        let mut titles = HashMap::new();
        titles.insert(root, Some("Root".to_owned()));
        titles.insert(child, Some("Child".to_owned()));
        titles.insert(grandchild, None);

        let tree = build_subtree(root, &closures, &titles);
        assert_eq!(tree.id, root);
        assert_eq!(tree.sub_pages.len(), 1);
        assert_eq!(tree.sub_pages[0].id, child);
        assert_eq!(tree.sub_pages[0].sub_pages.len(), 1);
        assert_eq!(tree.sub_pages[0].sub_pages[0].id, grandchild);
        assert!(tree.sub_pages[0].sub_pages[0].text_title.is_none());
    }

    #[test]
    fn leaf_root_has_no_children() {
        let root = Uuid::new_v4();
        let tree = build_subtree(root, &[], &HashMap::new());
        assert!(tree.sub_pages.is_empty());
    }
}
