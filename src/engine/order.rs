//! Topological ordering of pending creates.
//!
//! Kahn's algorithm over the dependency graph restricted to the pending
//! set, with a deterministic (create-priority, key) tie-break and a
//! best-effort fallback when cycles remain.

use std::collections::{HashMap, HashSet};

use crate::engine::model::SchemaObject;

/// A scheduled creation statement awaiting topological placement.
#[derive(Debug, Clone)]
pub struct PendingCreate {
    pub object: SchemaObject,
    pub statement: String,
}

pub const CYCLE_WARNING: &str =
    "-- WARNING: dependency cycle detected; remaining objects are emitted in priority order.\n";

pub fn order_creates(pending: &[PendingCreate]) -> Vec<String> {
    let mut nodes: Vec<&PendingCreate> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();
    for create in pending {
        let key = create.object.lookup_key();
        if !index_by_key.contains_key(&key) {
            index_by_key.insert(key, nodes.len());
            nodes.push(create);
        }
    }

    let mut in_degree = vec![0usize; nodes.len()];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (index, node) in nodes.iter().enumerate() {
        let own_key = node.object.lookup_key();
        let mut seen: HashSet<String> = HashSet::new();
        for dependency in &node.object.dependencies {
            let dependency = dependency.to_lowercase();
            if dependency == own_key || !seen.insert(dependency.clone()) {
                continue;
            }
            // Dependencies outside the pending set are tolerated and ignored.
            if let Some(&dep_index) = index_by_key.get(&dependency) {
                successors[dep_index].push(index);
                in_degree[index] += 1;
            }
        }
    }

    let rank = |index: usize| {
        (
            nodes[index].object.kind.create_priority(),
            nodes[index].object.lookup_key(),
        )
    };

    let mut ready: Vec<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
    ready.sort_by_key(|&i| rank(i));

    let mut output = Vec::with_capacity(nodes.len());
    let mut emitted = vec![false; nodes.len()];
    while !ready.is_empty() {
        let index = ready.remove(0);
        emitted[index] = true;
        output.push(nodes[index].statement.clone());
        for &successor in &successors[index] {
            in_degree[successor] -= 1;
            if in_degree[successor] == 0 {
                let position = ready
                    .binary_search_by_key(&rank(successor), |&i| rank(i))
                    .unwrap_or_else(|insert_at| insert_at);
                ready.insert(position, successor);
            }
        }
    }

    if output.len() < nodes.len() {
        output.push(CYCLE_WARNING.to_string());
        let mut remaining: Vec<usize> = (0..nodes.len()).filter(|&i| !emitted[i]).collect();
        remaining.sort_by_key(|&i| rank(i));
        for index in remaining {
            output.push(nodes[index].statement.clone());
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::engine::model::ObjectKind;

    fn pending(kind: ObjectKind, name: &str, dependencies: &[&str]) -> PendingCreate {
        PendingCreate {
            object: SchemaObject {
                kind,
                schema: "dbo".to_string(),
                name: name.to_string(),
                definition: String::new(),
                dependencies: dependencies.iter().map(|d| d.to_string()).collect::<BTreeSet<_>>(),
            },
            statement: format!("CREATE {}\nGO\n", name),
        }
    }

    #[test]
    fn dependencies_come_first() {
        let creates = vec![
            pending(ObjectKind::Table, "Child", &["Table:dbo.Parent"]),
            pending(ObjectKind::Table, "Parent", &[]),
        ];
        let ordered = order_creates(&creates);
        assert_eq!(ordered, vec!["CREATE Parent\nGO\n", "CREATE Child\nGO\n"]);
    }

    #[test]
    fn free_nodes_follow_priority_then_key() {
        let creates = vec![
            pending(ObjectKind::StoredProcedure, "GetOrders", &[]),
            pending(ObjectKind::View, "Orders", &[]),
            pending(ObjectKind::Table, "b_table", &[]),
            pending(ObjectKind::Table, "A_Table", &[]),
            pending(ObjectKind::Function, "fn_total", &[]),
        ];
        let ordered = order_creates(&creates);
        assert_eq!(
            ordered,
            vec![
                "CREATE A_Table\nGO\n",
                "CREATE b_table\nGO\n",
                "CREATE fn_total\nGO\n",
                "CREATE Orders\nGO\n",
                "CREATE GetOrders\nGO\n",
            ]
        );
    }

    #[test]
    fn dependency_keys_compare_case_insensitively() {
        let creates = vec![
            pending(ObjectKind::View, "Detail", &["view:DBO.BASE"]),
            pending(ObjectKind::View, "Base", &[]),
        ];
        let ordered = order_creates(&creates);
        assert_eq!(ordered, vec!["CREATE Base\nGO\n", "CREATE Detail\nGO\n"]);
    }

    #[test]
    fn duplicate_pending_entries_keep_first_occurrence() {
        let mut first = pending(ObjectKind::Table, "T", &[]);
        first.statement = "first\n".to_string();
        let mut second = pending(ObjectKind::Table, "t", &[]);
        second.statement = "second\n".to_string();
        let ordered = order_creates(&[first, second]);
        assert_eq!(ordered, vec!["first\n"]);
    }

    #[test]
    fn self_dependencies_and_absent_targets_are_ignored() {
        let creates = vec![pending(
            ObjectKind::Table,
            "T",
            &["Table:dbo.T", "Table:dbo.Elsewhere"],
        )];
        let ordered = order_creates(&creates);
        assert_eq!(ordered, vec!["CREATE T\nGO\n"]);
    }

    #[test]
    fn cycles_fall_back_with_a_warning() {
        let creates = vec![
            pending(ObjectKind::View, "A", &["View:dbo.B"]),
            pending(ObjectKind::View, "B", &["View:dbo.A"]),
            pending(ObjectKind::Table, "Free", &[]),
        ];
        let ordered = order_creates(&creates);
        assert_eq!(
            ordered,
            vec![
                "CREATE Free\nGO\n",
                CYCLE_WARNING,
                "CREATE A\nGO\n",
                "CREATE B\nGO\n",
            ]
        );
    }
}
