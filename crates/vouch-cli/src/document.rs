//! # Data Documents
//!
//! Loads the data and context maps handed to `vouch validate`.

use std::path::Path;

use vouch_core::{data_from_json, Data};

use crate::declaration::{parse_as, read, DeclarationError};

/// Load a JSON or YAML mapping as a [`Data`] map.
///
/// # Errors
///
/// [`DeclarationError::Io`], or [`DeclarationError::Parse`] if the file is
/// unparseable or its top level is not a mapping.
pub fn load_data(path: &Path) -> Result<Data, DeclarationError> {
    let content = read(path)?;
    let json: serde_json::Value = parse_as(&content, path)?;
    if !json.is_object() {
        return Err(DeclarationError::Parse {
            path: path.to_path_buf(),
            message: "top level must be a mapping".to_owned(),
        });
    }
    Ok(data_from_json(&json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use vouch_core::Value;

    #[test]
    fn loads_yaml_and_json() {
        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(yaml, "per_page: 50\nsort: name").unwrap();
        let data = load_data(yaml.path()).unwrap();
        assert_eq!(data.get("per_page"), Some(&Value::Int(50)));
        assert_eq!(data.get("sort"), Some(&Value::from("name")));

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"flags": [true, false]}}"#).unwrap();
        let data = load_data(json.path()).unwrap();
        assert_eq!(data.get("flags"), Some(&Value::from(vec![true, false])));
    }

    #[test]
    fn rejects_non_mapping_documents() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, "[1, 2]").unwrap();
        assert!(matches!(load_data(json.path()), Err(DeclarationError::Parse { .. })));
    }
}
