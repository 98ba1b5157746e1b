//! Local JSON export
//!
//! ACF loads field groups from `<theme>/acf-json/<group key>.json`. This
//! module renders built groups in that layout.

use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::group::BuiltGroup;

/// Render `value` as JSON text
pub fn render_json(value: &Value, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

/// Write `group` to `<dir>/<group key>.json`, creating `dir` if needed
pub fn write_group_json(group: &BuiltGroup, dir: impl AsRef<Path>, pretty: bool) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let path = dir.join(format!("{}.json", group.key()));
    let mut contents = render_json(&group.to_value(), pretty)?;
    contents.push('\n');
    std::fs::write(&path, contents)?;

    tracing::debug!(path = %path.display(), "wrote group JSON");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDefinition;
    use crate::group::FieldGroup;
    use serde_json::json;

    #[test]
    fn test_render_json_compact_and_pretty() {
        let value = json!({"key": "group_a", "fields": []});
        assert_eq!(
            render_json(&value, false).unwrap(),
            r#"{"key":"group_a","fields":[]}"#
        );
        assert!(render_json(&value, true).unwrap().contains("\n  \"fields\""));
    }

    #[test]
    fn test_write_group_json() {
        let dir = tempfile::tempdir().unwrap();
        let group = FieldGroup::new("Employee")
            .field(FieldDefinition::text("Name"))
            .build()
            .unwrap();

        let path = write_group_json(&group, dir.path().join("acf-json"), true).unwrap();
        assert_eq!(path, dir.path().join("acf-json/group_employee.json"));

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["fields"][0]["key"], json!("field_employee_name"));
    }
}
