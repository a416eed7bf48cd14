//! Topological ordering of a task graph.
//!
//! Iterative depth-first search with three marks: a task is white before it
//! is reached, gray while its dependencies are being explored, and black once
//! it has been appended to the order. Reaching a gray task again means the
//! graph has a cycle, which is reported instead of producing a partial order.

use std::collections::HashMap;

use uuid::Uuid;

use planwright_model::Task;

use crate::error::GraphError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Gray,
    Black,
}

/// Order `tasks` so that every task appears after all of its dependencies.
///
/// Roots are visited in slice order and dependencies in id order, so the
/// result is deterministic for a given graph. Dependency ids that do not
/// name a task in `tasks` are ignored.
pub fn topological_order(tasks: &[Task]) -> Result<Vec<Uuid>, GraphError> {
    let index: HashMap<Uuid, usize> =
        tasks.iter().enumerate().map(|(i, t)| (t.id, i)).collect();

    let adjacency: Vec<Vec<usize>> = tasks
        .iter()
        .map(|t| {
            t.dependencies
                .iter()
                .filter_map(|dep| index.get(dep).copied())
                .collect()
        })
        .collect();

    let mut marks = vec![Mark::White; tasks.len()];
    let mut order = Vec::with_capacity(tasks.len());
    // Each frame is (task position, index of the next dependency to visit).
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..tasks.len() {
        if marks[root] != Mark::White {
            continue;
        }
        marks[root] = Mark::Gray;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            match adjacency[node].get(next) {
                Some(&dep) => {
                    frame.1 += 1;
                    match marks[dep] {
                        Mark::White => {
                            marks[dep] = Mark::Gray;
                            stack.push((dep, 0));
                        }
                        Mark::Gray => {
                            let start = stack.iter().position(|&(n, _)| n == dep).unwrap_or(0);
                            let task_ids =
                                stack[start..].iter().map(|&(n, _)| tasks[n].id).collect();
                            return Err(GraphError::CycleDetected { task_ids });
                        }
                        Mark::Black => {}
                    }
                }
                None => {
                    marks[node] = Mark::Black;
                    order.push(tasks[node].id);
                    stack.pop();
                }
            }
        }
    }

    Ok(order)
}
