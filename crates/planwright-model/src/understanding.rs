//! Input types for the "understanding" record produced by the extraction
//! collaborator.
//!
//! Every top-level block is optional at the type level so that a record
//! missing one can still be deserialized and then reported on by the
//! validator instead of failing with an opaque parse error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Structured summary of a source document, ready to be turned into a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Understanding {
    /// Optional human-readable title for the resulting plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithms: Option<Vec<AlgorithmDescriptor>>,
    /// Architecture components keyed by name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<BTreeMap<String, ArchitectureComponent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_details: Option<ImplementationDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
}

impl Understanding {
    /// Number of algorithm descriptors, zero when the block is absent.
    pub fn algorithm_count(&self) -> usize {
        self.algorithms.as_ref().map_or(0, Vec::len)
    }

    /// Number of architecture entries, zero when the block is absent.
    pub fn architecture_count(&self) -> usize {
        self.architecture.as_ref().map_or(0, BTreeMap::len)
    }
}

/// One algorithm described by the source document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlgorithmDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,
}

/// One architecture component described by the source document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArchitectureComponent {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Tooling the implementation needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImplementationDetails {
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub libraries: Vec<String>,
    #[serde(default)]
    pub compute_requirements: Vec<String>,
    #[serde(default)]
    pub datasets: Vec<String>,
}

/// How the implementation is evaluated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Evaluation {
    #[serde(default)]
    pub metrics: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_json_understanding() {
        let json = r#"{
            "algorithms": [
                {"name": "attention", "description": "scaled dot product",
                 "inputs": ["q", "k", "v"], "outputs": ["context"],
                 "parameters": {"heads": 8}}
            ],
            "architecture": {
                "encoder": {"description": "stack of layers", "dependencies": ["attention"]}
            },
            "implementation_details": {"frameworks": ["pytorch"]},
            "evaluation": {"metrics": ["bleu"]}
        }"#;
        let u: Understanding = serde_json::from_str(json).expect("should parse");
        assert_eq!(u.algorithm_count(), 1);
        assert_eq!(u.architecture_count(), 1);
        let algo = &u.algorithms.as_ref().unwrap()[0];
        assert_eq!(algo.inputs, vec!["q", "k", "v"]);
        assert_eq!(algo.parameters["heads"], serde_json::json!(8));
        assert_eq!(
            u.implementation_details.unwrap().frameworks,
            vec!["pytorch".to_string()]
        );
        assert!(u.title.is_none());
    }

    #[test]
    fn deserialize_toml_understanding() {
        let toml_str = r#"
title = "Transformer"

[[algorithms]]
name = "attention"
description = "scaled dot product"

[architecture.encoder]
description = "encoder stack"
dependencies = ["attention"]

[implementation_details]
libraries = ["numpy"]

[evaluation]
metrics = ["accuracy"]
"#;
        let u: Understanding = toml::from_str(toml_str).expect("should parse");
        assert_eq!(u.title.as_deref(), Some("Transformer"));
        assert_eq!(u.algorithm_count(), 1);
        assert_eq!(
            u.architecture.as_ref().unwrap()["encoder"].dependencies,
            vec!["attention"]
        );
    }

    #[test]
    fn missing_blocks_are_none() {
        let u: Understanding = serde_json::from_str("{}").unwrap();
        assert!(u.algorithms.is_none());
        assert!(u.architecture.is_none());
        assert!(u.implementation_details.is_none());
        assert!(u.evaluation.is_none());
        assert_eq!(u.algorithm_count(), 0);
    }
}
