//! Checks over the understanding record before a plan is built from it.

use planwright_model::{IssueCode, Understanding, ValidationIssue};

/// Check that every top-level block is present and that at least one
/// algorithm or architecture entry exists.
pub fn validate_understanding(understanding: &Understanding) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let blocks = [
        ("algorithms", understanding.algorithms.is_some()),
        ("architecture", understanding.architecture.is_some()),
        (
            "implementation_details",
            understanding.implementation_details.is_some(),
        ),
        ("evaluation", understanding.evaluation.is_some()),
    ];
    for (field, present) in blocks {
        if !present {
            issues.push(
                ValidationIssue::new(
                    IssueCode::MissingField,
                    format!("missing required field: {field}"),
                )
                .with_field(field),
            );
        }
    }

    if let Some(algorithms) = &understanding.algorithms {
        for (i, algorithm) in algorithms.iter().enumerate() {
            if algorithm.name.trim().is_empty() {
                issues.push(
                    ValidationIssue::new(IssueCode::MissingField, "algorithm has an empty name")
                        .with_field(format!("algorithms[{i}].name")),
                );
            }
        }
    }
    if let Some(architecture) = &understanding.architecture {
        if architecture.keys().any(|k| k.trim().is_empty()) {
            issues.push(
                ValidationIssue::new(
                    IssueCode::MissingField,
                    "architecture entry has an empty name",
                )
                .with_field("architecture"),
            );
        }
    }

    if understanding.algorithm_count() == 0 && understanding.architecture_count() == 0 {
        issues.push(ValidationIssue::new(
            IssueCode::NoAlgorithmsOrArchitecture,
            "understanding must describe at least one algorithm or architecture component",
        ));
    }

    issues
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use planwright_model::{
        AlgorithmDescriptor, ArchitectureComponent, Evaluation, ImplementationDetails,
    };

    fn complete() -> Understanding {
        Understanding {
            algorithms: Some(vec![AlgorithmDescriptor {
                name: "attention".to_string(),
                description: String::new(),
                inputs: vec![],
                outputs: vec![],
                parameters: BTreeMap::new(),
            }]),
            architecture: Some(BTreeMap::new()),
            implementation_details: Some(ImplementationDetails::default()),
            evaluation: Some(Evaluation::default()),
            ..Understanding::default()
        }
    }

    #[test]
    fn complete_understanding_passes() {
        assert!(validate_understanding(&complete()).is_empty());
    }

    #[test]
    fn every_missing_block_is_reported() {
        let issues = validate_understanding(&Understanding::default());
        let fields: Vec<_> = issues.iter().filter_map(|i| i.field.as_deref()).collect();
        assert_eq!(
            fields,
            vec![
                "algorithms",
                "architecture",
                "implementation_details",
                "evaluation"
            ]
        );
        assert_eq!(
            issues.last().map(|i| i.code),
            Some(IssueCode::NoAlgorithmsOrArchitecture)
        );
    }

    #[test]
    fn architecture_alone_is_enough() {
        let mut u = complete();
        u.algorithms = Some(vec![]);
        u.architecture = Some(BTreeMap::from([(
            "encoder".to_string(),
            ArchitectureComponent::default(),
        )]));
        assert!(validate_understanding(&u).is_empty());
    }

    #[test]
    fn empty_blocks_are_not_enough() {
        let mut u = complete();
        u.algorithms = Some(vec![]);
        let issues = validate_understanding(&u);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::NoAlgorithmsOrArchitecture);
    }

    #[test]
    fn blank_names_are_missing_fields() {
        let mut u = complete();
        if let Some(algorithms) = u.algorithms.as_mut() {
            algorithms[0].name = "  ".to_string();
        }
        let issues = validate_understanding(&u);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field.as_deref(), Some("algorithms[0].name"));
    }
}
