use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use refinance_core::offers::OfferCatalog;

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Read a JSON or YAML file, chosen by extension.
pub fn read_structured<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    if !is_yaml(&canonical) {
        return read_json(path);
    }
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Load and validate an offer catalog file.
pub fn read_catalog(path: &str) -> Result<OfferCatalog, Box<dyn std::error::Error>> {
    let catalog: OfferCatalog = read_structured(path)?;
    catalog.validate()?;
    log::debug!("loaded {} offers from {}", catalog.offers.len(), path);
    Ok(catalog)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Resolve and validate the path, preventing directory traversal.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_detection() {
        assert!(is_yaml(Path::new("catalog.yaml")));
        assert!(is_yaml(Path::new("/etc/refi/catalog.yml")));
        assert!(!is_yaml(Path::new("catalog.json")));
        assert!(!is_yaml(Path::new("catalog")));
    }

    #[test]
    fn test_missing_file_reported() {
        let err = read_catalog("definitely/not/here.json").unwrap_err();
        assert!(err.to_string().starts_with("File not found"));
    }
}
