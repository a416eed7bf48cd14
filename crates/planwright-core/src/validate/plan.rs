//! Structural checks over a [`Plan`] and its components.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use serde_json::json;

use planwright_model::{IssueCode, Plan, ValidationIssue};

/// Check plan identity, components, requirements and the component
/// dependency graph.
///
/// Unresolved dependency names and unrecognized effort/priority levels are
/// reported as warnings; everything else is an error.
pub fn validate_plan(plan: &Plan) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if plan.id.is_nil() {
        issues.push(
            ValidationIssue::new(IssueCode::MissingId, "plan id is empty").with_field("id"),
        );
    }
    if plan.title.trim().is_empty() {
        issues.push(
            ValidationIssue::new(IssueCode::MissingTitle, "plan title is empty")
                .with_field("title"),
        );
    }
    if plan.components.is_empty() {
        issues.push(
            ValidationIssue::new(
                IssueCode::NoComponents,
                "plan must contain at least one component",
            )
            .with_field("components"),
        );
    }
    if plan.requirements.is_empty() {
        issues.push(
            ValidationIssue::new(IssueCode::NoRequirements, "plan declares no requirements")
                .with_field("requirements"),
        );
    }

    let names: HashSet<&str> = plan.components.iter().map(|c| c.name.as_str()).collect();
    let mut seen = HashSet::new();

    for (i, component) in plan.components.iter().enumerate() {
        if !seen.insert(component.name.as_str()) {
            issues.push(
                ValidationIssue::new(
                    IssueCode::DuplicateComponent,
                    format!("duplicate component name: {:?}", component.name),
                )
                .with_field(format!("components[{i}].name")),
            );
        }

        for dependency in &component.dependencies {
            if *dependency == component.name {
                issues.push(
                    ValidationIssue::new(
                        IssueCode::SelfDependency,
                        format!("component {:?} depends on itself", component.name),
                    )
                    .with_field(format!("components[{i}].dependencies")),
                );
            } else if !names.contains(dependency.as_str()) {
                issues.push(
                    ValidationIssue::new(
                        IssueCode::InvalidDependency,
                        format!(
                            "component {:?} depends on unknown component {:?}",
                            component.name, dependency
                        ),
                    )
                    .with_field(format!("components[{i}].dependencies"))
                    .with_details(json!({
                        "component": component.name,
                        "dependency": dependency,
                    })),
                );
            }
        }

        if component.effort_level().is_none() {
            issues.push(
                ValidationIssue::new(
                    IssueCode::InvalidEffort,
                    format!(
                        "invalid estimated_effort {:?} on component {:?} (expected low, medium, or high)",
                        component.estimated_effort, component.name
                    ),
                )
                .with_field(format!("components[{i}].estimated_effort")),
            );
        }
        if component.priority_level().is_none() {
            issues.push(
                ValidationIssue::new(
                    IssueCode::InvalidPriorityLevel,
                    format!(
                        "invalid priority {:?} on component {:?} (expected low, medium, or high)",
                        component.priority, component.name
                    ),
                )
                .with_field(format!("components[{i}].priority")),
            );
        }
    }

    if let Some(cycle) = find_circular_components(plan) {
        issues.push(
            ValidationIssue::new(
                IssueCode::CircularDependency,
                format!("dependency cycle detected involving components: {}", cycle.join(", ")),
            )
            .with_field("components")
            .with_details(json!({ "components": cycle })),
        );
    }

    issues
}

/// Detect circular component dependencies using Kahn's algorithm.
///
/// Self-dependencies and unresolved names are ignored here since they are
/// reported separately. Returns the names of every component that could not
/// be ordered (members of a cycle and anything downstream of one), sorted.
fn find_circular_components(plan: &Plan) -> Option<Vec<String>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    for component in &plan.components {
        let next = index.len();
        index.entry(component.name.as_str()).or_insert(next);
    }

    let n = index.len();
    let mut in_degree = vec![0usize; n];
    let mut adj: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];

    for component in &plan.components {
        let node = index[component.name.as_str()];
        for dependency in &component.dependencies {
            let Some(&dep) = index.get(dependency.as_str()) else {
                continue;
            };
            // Edge: dependency -> component (dependency must finish first).
            if dep != node && adj[dep].insert(node) {
                in_degree[node] += 1;
            }
        }
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut sorted = 0usize;
    while let Some(node) = queue.pop_front() {
        sorted += 1;
        for &next in &adj[node] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if sorted == n {
        return None;
    }

    let mut names: Vec<String> = index
        .iter()
        .filter(|&(_, &i)| in_degree[i] > 0)
        .map(|(name, _)| name.to_string())
        .collect();
    names.sort();
    Some(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use planwright_model::{Component, Requirements, Severity};
    use uuid::Uuid;

    fn component(name: &str, deps: &[&str]) -> Component {
        let mut c = Component::new(name, "");
        c.dependencies = deps.iter().map(|d| d.to_string()).collect();
        c
    }

    fn valid_plan(components: Vec<Component>) -> Plan {
        Plan::new("Plan", "").with_components(components).with_requirements(Requirements {
            frameworks: vec!["torch".to_string()],
            ..Requirements::default()
        })
    }

    fn codes(issues: &[ValidationIssue]) -> Vec<IssueCode> {
        issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn valid_plan_has_no_issues() {
        let plan = valid_plan(vec![component("a", &[]), component("b", &["a"])]);
        assert!(validate_plan(&plan).is_empty());
    }

    #[test]
    fn reports_missing_identity_and_content() {
        let mut plan = Plan::new("  ", "");
        plan.id = Uuid::nil();
        let issues = validate_plan(&plan);
        assert_eq!(
            codes(&issues),
            vec![
                IssueCode::MissingId,
                IssueCode::MissingTitle,
                IssueCode::NoComponents,
                IssueCode::NoRequirements,
            ]
        );
        assert!(issues.iter().all(|i| i.severity == Severity::Error));
    }

    #[test]
    fn unknown_dependency_is_a_warning() {
        let plan = valid_plan(vec![component("a", &["ghost"])]);
        let issues = validate_plan(&plan);
        assert_eq!(codes(&issues), vec![IssueCode::InvalidDependency]);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].field.as_deref(), Some("components[0].dependencies"));
        assert_eq!(issues[0].details.as_ref().unwrap()["dependency"], "ghost");
    }

    #[test]
    fn invalid_levels_are_warnings() {
        let mut c = component("a", &[]);
        c.estimated_effort = "massive".to_string();
        c.priority = "asap".to_string();
        let issues = validate_plan(&valid_plan(vec![c]));
        assert_eq!(
            codes(&issues),
            vec![IssueCode::InvalidEffort, IssueCode::InvalidPriorityLevel]
        );
        assert!(issues.iter().all(|i| !i.is_error()));
    }

    #[test]
    fn duplicate_component_names() {
        let plan = valid_plan(vec![component("a", &[]), component("a", &[])]);
        let issues = validate_plan(&plan);
        assert_eq!(codes(&issues), vec![IssueCode::DuplicateComponent]);
        assert_eq!(issues[0].field.as_deref(), Some("components[1].name"));
    }

    #[test]
    fn self_dependency() {
        let plan = valid_plan(vec![component("a", &["a"])]);
        assert_eq!(codes(&validate_plan(&plan)), vec![IssueCode::SelfDependency]);
    }

    #[test]
    fn direct_cycle() {
        let plan = valid_plan(vec![component("a", &["b"]), component("b", &["a"])]);
        let issues = validate_plan(&plan);
        assert_eq!(codes(&issues), vec![IssueCode::CircularDependency]);
        assert_eq!(
            issues[0].details.as_ref().unwrap()["components"],
            serde_json::json!(["a", "b"])
        );
    }

    #[test]
    fn transitive_cycle() {
        let plan = valid_plan(vec![
            component("root", &[]),
            component("a", &["c", "root"]),
            component("b", &["a"]),
            component("c", &["b"]),
        ]);
        let issues = validate_plan(&plan);
        assert_eq!(codes(&issues), vec![IssueCode::CircularDependency]);
        assert!(issues[0].message.contains("a, b, c"));
        assert!(!issues[0].message.contains("root"));
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let plan = valid_plan(vec![
            component("a", &[]),
            component("b", &["a"]),
            component("c", &["a"]),
            component("d", &["b", "c"]),
        ]);
        assert!(validate_plan(&plan).is_empty());
    }
}
