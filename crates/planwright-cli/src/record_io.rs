//! Reading inputs and writing results for the file-based commands.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use planwright_model::{GenerationRecord, Understanding};

/// Read an understanding record, picking the format from the extension.
pub fn read_understanding(path: &Path) -> Result<Understanding> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read understanding file: {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON understanding: {}", path.display())),
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("failed to parse TOML understanding: {}", path.display())),
        _ => bail!(
            "unsupported understanding file {} (expected .json or .toml)",
            path.display()
        ),
    }
}

/// Read a generation record previously written by `planwright generate`.
pub fn read_record(path: &Path) -> Result<GenerationRecord> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read record file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse record file: {}", path.display()))
}

/// Serialize `value` as JSON to `output`, or to stdout when `None`.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("failed to serialize output")?;

    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use planwright_test_utils::sample_understanding;

    #[test]
    fn reads_json_and_toml() {
        let tmp = tempfile::TempDir::new().unwrap();
        let expected = sample_understanding();

        let json_path = tmp.path().join("u.json");
        std::fs::write(&json_path, serde_json::to_string(&expected).unwrap()).unwrap();
        assert_eq!(read_understanding(&json_path).unwrap(), expected);

        let toml_path = tmp.path().join("u.TOML");
        std::fs::write(&toml_path, toml::to_string(&expected).unwrap()).unwrap();
        assert_eq!(read_understanding(&toml_path).unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("u.yaml");
        std::fs::write(&path, "algorithms: []").unwrap();
        let err = read_understanding(&path).unwrap_err();
        assert!(err.to_string().contains("expected .json or .toml"), "{err}");
    }

    #[test]
    fn write_json_to_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        write_json(&serde_json::json!({"a": 1}), Some(&path), false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"a\":1}\n");
    }
}
