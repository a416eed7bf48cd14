//! Critical path analysis (forward pass + backward trace).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use uuid::Uuid;

use planwright_model::Task;

use super::topo::topological_order;
use crate::error::GraphError;

/// Tolerance used when matching completion times in the backward trace.
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// Result of a critical path analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CriticalPath {
    /// Task ids in chronological order.
    pub task_ids: Vec<Uuid>,
    /// Earliest completion time of every task, in hours from project start.
    pub earliest_completion: BTreeMap<Uuid, f64>,
    /// Latest earliest-completion time over all tasks.
    pub project_completion: f64,
}

impl CriticalPath {
    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.task_ids.len()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.task_ids.contains(&id)
    }
}

/// Computes earliest completion times and the longest duration-weighted
/// dependency chain through a task graph.
#[derive(Debug, Clone, Copy)]
pub struct CriticalPathAnalyzer {
    tolerance: f64,
}

impl Default for CriticalPathAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl CriticalPathAnalyzer {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Run the analysis.
    ///
    /// Forward pass: in topological order, a task completes at its own
    /// duration plus the latest completion among its dependencies.
    ///
    /// Backward trace: starting from the latest completion, repeatedly pick a
    /// task finishing at the current time and step back to the latest
    /// completion among its dependencies. Candidates among the previously
    /// picked task's dependencies are preferred so the result is a literal
    /// dependency chain; ties go to the smallest task id.
    ///
    /// A task shorter than the tolerance finishes within tolerance of its
    /// own dependency, so the two compete as candidates. When the
    /// dependency has the smaller id it wins and the short task is left
    /// off the path. Use a tighter tolerance when sub-tolerance durations
    /// matter.
    ///
    /// Returns [`GraphError::CycleDetected`] if the graph is cyclic. An empty
    /// task set yields an empty path.
    pub fn analyze(&self, tasks: &[Task]) -> Result<CriticalPath, GraphError> {
        if tasks.is_empty() {
            return Ok(CriticalPath::default());
        }

        let by_id: HashMap<Uuid, &Task> = tasks.iter().map(|t| (t.id, t)).collect();
        let order = topological_order(tasks)?;

        let mut earliest: HashMap<Uuid, f64> = HashMap::with_capacity(tasks.len());
        for id in &order {
            let task = by_id[id];
            let start = latest_completion(task, &earliest).unwrap_or(0.0);
            earliest.insert(*id, start + task.estimated_hours);
        }

        let project_completion = earliest
            .values()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        let mut remaining: BTreeSet<Uuid> = earliest.keys().copied().collect();
        let mut current_time = project_completion;
        let mut previous: Option<&Task> = None;
        let mut path = Vec::new();

        loop {
            let matches = |id: &&Uuid| (earliest[*id] - current_time).abs() <= self.tolerance;
            let preferred = previous.and_then(|p| {
                p.dependencies
                    .iter()
                    .filter(|d| remaining.contains(*d))
                    .find(matches)
                    .copied()
            });
            let Some(id) = preferred.or_else(|| remaining.iter().find(matches).copied()) else {
                break;
            };

            remaining.remove(&id);
            path.push(id);
            let task = by_id[&id];

            match latest_completion(task, &earliest) {
                Some(t) => current_time = t,
                None => break,
            }
            previous = Some(task);
        }

        path.reverse();

        Ok(CriticalPath {
            task_ids: path,
            earliest_completion: earliest.into_iter().collect(),
            project_completion,
        })
    }
}

/// Latest earliest-completion among the task's known dependencies, or `None`
/// when it has none.
fn latest_completion(task: &Task, earliest: &HashMap<Uuid, f64>) -> Option<f64> {
    task.dependencies
        .iter()
        .filter_map(|dep| earliest.get(dep).copied())
        .reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use planwright_model::TaskKind;

    fn task(name: &str, hours: f64) -> Task {
        Task::new(TaskKind::Implement, name, name, hours, 3)
    }

    fn path_hours(tasks: &[Task], path: &CriticalPath) -> f64 {
        path.task_ids
            .iter()
            .map(|id| tasks.iter().find(|t| t.id == *id).unwrap().estimated_hours)
            .sum()
    }

    #[test]
    fn empty_graph_has_empty_path() {
        let path = CriticalPathAnalyzer::default().analyze(&[]).unwrap();
        assert!(path.is_empty());
        assert!(path.earliest_completion.is_empty());
        assert_eq!(path.project_completion, 0.0);
    }

    #[test]
    fn single_task() {
        let a = task("a", 7.5);
        let path = CriticalPathAnalyzer::default().analyze(&[a.clone()]).unwrap();
        assert_eq!(path.task_ids, vec![a.id]);
        assert_eq!(path.earliest_completion[&a.id], 7.5);
        assert_eq!(path.project_completion, 7.5);
    }

    #[test]
    fn roots_complete_at_their_own_duration() {
        let a = task("a", 3.0);
        let b = task("b", 5.0);
        let path = CriticalPathAnalyzer::default()
            .analyze(&[a.clone(), b.clone()])
            .unwrap();
        assert_eq!(path.earliest_completion[&a.id], 3.0);
        assert_eq!(path.earliest_completion[&b.id], 5.0);
        assert_eq!(path.task_ids, vec![b.id]);
    }

    #[test]
    fn picks_the_longest_branch_of_a_diamond() {
        let a = task("a", 2.0);
        let mut short = task("short", 1.0);
        let mut long = task("long", 10.0);
        let mut end = task("end", 3.0);
        short.dependencies.insert(a.id);
        long.dependencies.insert(a.id);
        end.dependencies.extend([short.id, long.id]);
        let tasks = vec![end.clone(), short.clone(), long.clone(), a.clone()];

        let path = CriticalPathAnalyzer::default().analyze(&tasks).unwrap();
        assert_eq!(path.task_ids, vec![a.id, long.id, end.id]);
        assert_eq!(path.earliest_completion[&short.id], 3.0);
        assert_eq!(path.earliest_completion[&long.id], 12.0);
        assert_eq!(path.project_completion, 15.0);
        assert_eq!(path_hours(&tasks, &path), path.project_completion);
    }

    #[test]
    fn ties_break_on_smallest_id() {
        let a = task("a", 4.0);
        let b = task("b", 4.0);
        let expected = a.id.min(b.id);
        for tasks in [vec![a.clone(), b.clone()], vec![b.clone(), a.clone()]] {
            let path = CriticalPathAnalyzer::default().analyze(&tasks).unwrap();
            assert_eq!(path.task_ids, vec![expected]);
        }
    }

    #[test]
    fn trace_follows_dependencies_when_times_collide() {
        // `decoy` finishes at the same time as `a` but is not a dependency
        // of `b`; the path must still be a real chain.
        let a = task("a", 5.0);
        let decoy = task("decoy", 5.0);
        let mut b = task("b", 5.0);
        b.dependencies.insert(a.id);
        let tasks = vec![a.clone(), decoy.clone(), b.clone()];

        let path = CriticalPathAnalyzer::default().analyze(&tasks).unwrap();
        assert_eq!(path.task_ids, vec![a.id, b.id]);
    }

    #[test]
    fn tolerance_absorbs_float_noise() {
        let a = task("a", 0.1);
        let mut b = task("b", 0.2);
        let mut c = task("c", 0.3000001);
        b.dependencies.insert(a.id);
        c.dependencies.insert(b.id);
        let tasks = vec![a.clone(), b.clone(), c.clone()];
        let path = CriticalPathAnalyzer::default().analyze(&tasks).unwrap();
        assert_eq!(path.task_ids, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn sub_tolerance_task_competes_with_its_dependency() {
        let a = task("a", 10.0);
        let mut b = task("b", 0.0005);
        b.dependencies.insert(a.id);
        let tasks = vec![a.clone(), b.clone()];

        let path = CriticalPathAnalyzer::default().analyze(&tasks).unwrap();
        let expected = if a.id < b.id { vec![a.id] } else { vec![a.id, b.id] };
        assert_eq!(path.task_ids, expected);
        assert!((path.project_completion - 10.0005).abs() < 1e-12);

        let path = CriticalPathAnalyzer::new(1e-6).analyze(&tasks).unwrap();
        assert_eq!(path.task_ids, vec![a.id, b.id]);
    }

    #[test]
    fn cycle_is_an_error() {
        let mut a = task("a", 1.0);
        let mut b = task("b", 1.0);
        a.dependencies.insert(b.id);
        b.dependencies.insert(a.id);
        let err = CriticalPathAnalyzer::default()
            .analyze(&[a, b])
            .unwrap_err();
        assert!(matches!(err, GraphError::CycleDetected { .. }));
    }
}
