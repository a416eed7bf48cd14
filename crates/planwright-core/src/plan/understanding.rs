//! Mapping from an understanding record to a [`Plan`].

use std::collections::BTreeMap;

use serde_json::Value;

use planwright_model::{
    AlgorithmDescriptor, Component, EffortLevel, Plan, PriorityLevel, Requirements, Understanding,
};

/// Build a draft plan from an understanding record.
///
/// Algorithms come first, in declaration order, as high-effort high-priority
/// components. Architecture entries follow in name order as medium-effort
/// medium-priority components that keep their declared dependencies.
pub fn plan_from_understanding(understanding: &Understanding) -> Plan {
    let mut components: Vec<Component> = Vec::with_capacity(
        understanding.algorithm_count() + understanding.architecture_count(),
    );

    for algorithm in understanding.algorithms.iter().flatten() {
        components.push(algorithm_component(algorithm));
    }

    for (name, entry) in understanding.architecture.iter().flatten() {
        let mut component = Component::new(name, &entry.description);
        component.dependencies = entry.dependencies.iter().cloned().collect();
        component.estimated_effort = EffortLevel::Medium.to_string();
        component.priority = PriorityLevel::Medium.to_string();
        components.push(component);
    }

    let details = understanding.implementation_details.clone().unwrap_or_default();
    let requirements = Requirements {
        frameworks: details.frameworks,
        libraries: details.libraries,
        compute: details.compute_requirements,
        datasets: details.datasets,
        evaluation_metrics: understanding
            .evaluation
            .as_ref()
            .map(|e| e.metrics.clone())
            .unwrap_or_default(),
    };

    let title = match understanding.title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => derive_title(&components),
    };
    let description = understanding.summary.clone().unwrap_or_default();

    Plan::new(title, description)
        .with_components(components)
        .with_requirements(requirements)
}

fn algorithm_component(algorithm: &AlgorithmDescriptor) -> Component {
    let mut requirements = BTreeMap::new();
    if !algorithm.inputs.is_empty() {
        requirements.insert("inputs".to_string(), Value::from(algorithm.inputs.clone()));
    }
    if !algorithm.outputs.is_empty() {
        requirements.insert("outputs".to_string(), Value::from(algorithm.outputs.clone()));
    }
    if !algorithm.parameters.is_empty() {
        let parameters = algorithm.parameters.clone().into_iter().collect();
        requirements.insert("parameters".to_string(), Value::Object(parameters));
    }

    let mut component = Component::new(&algorithm.name, &algorithm.description);
    component.requirements = requirements;
    component.estimated_effort = EffortLevel::High.to_string();
    component.priority = PriorityLevel::High.to_string();
    component
}

fn derive_title(components: &[Component]) -> String {
    match components.first() {
        Some(first) => format!("Implementation plan: {}", first.name),
        None => "Implementation plan".to_string(),
    }
}
