//! Shared fixtures for planwright integration tests.

use std::collections::BTreeMap;

use serde_json::json;

use planwright_model::{
    AlgorithmDescriptor, ArchitectureComponent, Component, Evaluation, ImplementationDetails,
    Plan, Requirements, Understanding,
};

/// A complete understanding record: one algorithm, a three-entry
/// architecture (`decoder` and `trainer` depend on `encoder`), pytorch as
/// framework.
pub fn sample_understanding() -> Understanding {
    Understanding {
        title: Some("Sequence model reproduction".to_string()),
        summary: Some("Reimplement the encoder/decoder model and its training loop".to_string()),
        algorithms: Some(vec![AlgorithmDescriptor {
            name: "attention".to_string(),
            description: "Scaled dot-product attention".to_string(),
            inputs: vec!["queries".to_string(), "keys".to_string(), "values".to_string()],
            outputs: vec!["context".to_string()],
            parameters: BTreeMap::from([("heads".to_string(), json!(8))]),
        }]),
        architecture: Some(BTreeMap::from([
            (
                "encoder".to_string(),
                architecture_entry("Stack of attention layers", &[]),
            ),
            (
                "decoder".to_string(),
                architecture_entry("Autoregressive decoder", &["encoder"]),
            ),
            (
                "trainer".to_string(),
                architecture_entry("Training loop", &["encoder", "decoder"]),
            ),
        ])),
        implementation_details: Some(ImplementationDetails {
            frameworks: vec!["pytorch".to_string()],
            libraries: vec!["numpy".to_string()],
            compute_requirements: vec!["1 GPU".to_string()],
            datasets: vec!["wmt14".to_string()],
        }),
        evaluation: Some(Evaluation {
            metrics: vec!["bleu".to_string()],
        }),
    }
}

/// Same as [`sample_understanding`] but serialized to JSON.
pub fn sample_understanding_json() -> String {
    serde_json::to_string_pretty(&sample_understanding()).unwrap_or_default()
}

fn architecture_entry(description: &str, dependencies: &[&str]) -> ArchitectureComponent {
    ArchitectureComponent {
        description: description.to_string(),
        dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
    }
}

/// A medium-effort, medium-priority component with the given dependencies.
pub fn component(name: &str, dependencies: &[&str]) -> Component {
    let mut c = Component::new(name, format!("{name} component"));
    c.dependencies = dependencies.iter().map(|d| d.to_string()).collect();
    c
}

/// A plan with `components` whose aggregate requirements name the given
/// frameworks. With no frameworks a dataset is declared instead so the plan
/// still has requirements but needs no setup task.
pub fn plan_with(components: Vec<Component>, frameworks: &[&str]) -> Plan {
    let requirements = if frameworks.is_empty() {
        Requirements {
            datasets: vec!["sample".to_string()],
            ..Requirements::default()
        }
    } else {
        Requirements {
            frameworks: frameworks.iter().map(|f| f.to_string()).collect(),
            ..Requirements::default()
        }
    };
    Plan::new("Test plan", "")
        .with_components(components)
        .with_requirements(requirements)
}

/// The two-component scenario: `A`, and `B` depending on `A`, with
/// framework `x`.
pub fn two_component_plan() -> Plan {
    plan_with(vec![component("A", &[]), component("B", &["A"])], &["x"])
}
