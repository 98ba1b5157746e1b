//! Field groups
//!
//! A group is the root of one build: it opens a fresh [`BuildSession`],
//! builds every field below its own key and serializes to the document ACF
//! reads from its local JSON directory.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::field::{Field, FieldDefinition};
use crate::key::{self, GROUP_PREFIX, ParentKey};
use crate::location::Location;
use crate::registry::BuildSession;

/// Output keys written by the group itself
const RESERVED_KEYS: &[&str] = &["key", "title", "fields", "location"];

/// Group as written in YAML
#[derive(Debug, Deserialize)]
struct RawGroup {
    title: String,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    fields: Vec<FieldDefinition>,
    #[serde(default)]
    location: Location,
    #[serde(flatten)]
    settings: Map<String, Value>,
}

/// Declarative field group
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawGroup")]
pub struct FieldGroup {
    title: String,
    key: String,
    fields: Vec<FieldDefinition>,
    location: Location,
    settings: Map<String, Value>,
}

impl From<RawGroup> for FieldGroup {
    fn from(raw: RawGroup) -> Self {
        let mut group = FieldGroup::new(raw.title);
        if let Some(key) = raw.key {
            group = group.key(key);
        }
        group.fields = raw.fields;
        group.location = raw.location;
        group.settings = raw.settings;
        group
    }
}

impl FieldGroup {
    /// Create a group; the key defaults to the sanitized title
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            key: key::sanitize(&title),
            title,
            fields: Vec::new(),
            location: Location::new(),
            settings: Map::new(),
        }
    }

    /// Override the key (sanitized, without the `group_` prefix)
    pub fn key(mut self, key: impl AsRef<str>) -> Self {
        self.key = key::sanitize(key.as_ref());
        self
    }

    /// Add a field
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Add several fields
    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldDefinition>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Where the group is shown
    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Group level setting such as `position`, `style` or `menu_order`
    pub fn setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Group key without prefix
    pub fn group_key(&self) -> &str {
        &self.key
    }

    /// Group title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Build with a fresh session
    pub fn build(&self) -> Result<BuiltGroup> {
        self.build_in(&mut BuildSession::new())
    }

    /// Build reusing `session`. The session is reset first, so uniqueness is
    /// enforced across this group's whole tree and nothing else.
    pub fn build_in(&self, session: &mut BuildSession) -> Result<BuiltGroup> {
        if self.key.is_empty() {
            return Err(Error::InvalidField {
                name: self.title.clone(),
                message: "group key must contain at least one letter or digit".to_string(),
            });
        }
        session.reset();

        let parent = ParentKey::group(&self.key);
        let fields = self
            .fields
            .iter()
            .cloned()
            .map(|definition| Field::build(definition, &parent, session))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            group = %self.key,
            fields = session.registry().len(),
            "built field group"
        );

        Ok(BuiltGroup {
            key: self.key.clone(),
            title: self.title.clone(),
            fields,
            location: self.location.clone(),
            settings: self.settings.clone(),
        })
    }
}

/// A group whose fields are all built
#[derive(Debug, Clone)]
pub struct BuiltGroup {
    key: String,
    title: String,
    fields: Vec<Field>,
    location: Location,
    settings: Map<String, Value>,
}

impl BuiltGroup {
    /// Prefixed key, e.g. `group_employee`
    pub fn key(&self) -> String {
        format!("{GROUP_PREFIX}{}", self.key)
    }

    /// Group title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Top level fields
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of fields at every depth
    pub fn field_count(&self) -> usize {
        self.fields.iter().map(Field::count).sum()
    }

    /// Flatten the group into ACF's format
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("key".to_string(), Value::String(self.key()));
        map.insert("title".to_string(), Value::String(self.title.clone()));
        map.insert(
            "fields".to_string(),
            Value::Array(
                self.fields
                    .iter()
                    .map(|field| Value::Object(field.to_map()))
                    .collect(),
            ),
        );
        map.insert("location".to_string(), self.location.to_value());

        for (setting, value) in &self.settings {
            if RESERVED_KEYS.contains(&setting.as_str()) {
                tracing::warn!(
                    group = %self.key,
                    setting = %setting,
                    "ignoring setting that shadows a reserved key"
                );
                continue;
            }
            map.insert(setting.clone(), value.clone());
        }
        map
    }

    /// [`to_map`](Self::to_map) as a JSON value
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{LocationGroup, LocationRule};
    use serde_json::json;

    #[test]
    fn test_group_key_from_title() {
        let group = FieldGroup::new("Employee Details");
        assert_eq!(group.group_key(), "employee_details");
        assert_eq!(FieldGroup::new("x").key("Employee").group_key(), "employee");
    }

    #[test]
    fn test_build_group() {
        let built = FieldGroup::new("Employee")
            .field(FieldDefinition::text("Name").required())
            .field(FieldDefinition::repeater("Links").sub_fields([FieldDefinition::url("Link")]))
            .location(
                Location::new()
                    .or(LocationGroup::new().and(LocationRule::is("post_type", "employee").unwrap())),
            )
            .setting("position", "side")
            .build()
            .unwrap();

        assert_eq!(built.key(), "group_employee");
        assert_eq!(built.field_count(), 3);

        let value = built.to_value();
        assert_eq!(value["title"], json!("Employee"));
        assert_eq!(value["fields"][0]["key"], json!("field_employee_name"));
        assert_eq!(value["fields"][1]["sub_fields"][0]["key"], json!("field_employee_links_link"));
        assert_eq!(value["location"][0][0]["value"], json!("employee"));
        assert_eq!(value["position"], json!("side"));
    }

    #[test]
    fn test_group_without_location_emits_empty_list() {
        let built = FieldGroup::new("Employee").build().unwrap();
        assert_eq!(built.to_value()["location"], json!([]));
        assert_eq!(built.to_value()["fields"], json!([]));
    }

    #[test]
    fn test_duplicate_field_aborts_group() {
        let err = FieldGroup::new("Employee")
            .field(FieldDefinition::url("Link"))
            .field(FieldDefinition::url("Link"))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { key } if key == "field_employee_link"));
    }

    #[test]
    fn test_rebuilding_is_independent() {
        let group = FieldGroup::new("Employee").field(FieldDefinition::url("Link"));
        let mut session = BuildSession::new();
        group.build_in(&mut session).unwrap();
        group.build_in(&mut session).unwrap();
        group.build().unwrap();
    }

    #[test]
    fn test_empty_group_key_is_rejected() {
        let err = FieldGroup::new("***").build().unwrap_err();
        assert!(matches!(err, Error::InvalidField { .. }));
    }

    #[test]
    fn test_parse_group_from_yaml() {
        let yaml = r#"
title: Employee
style: seamless
location:
  - - param: post_type
      value: employee
fields:
  - type: text
    label: Name
  - type: true_false
    label: Has website
  - type: url
    label: Website
    conditional_logic:
      - - field: has_website
          operator: "=="
          value: 1
"#;
        let group: FieldGroup = serde_yaml::from_str(yaml).unwrap();
        let value = group.build().unwrap().to_value();

        assert_eq!(value["key"], json!("group_employee"));
        assert_eq!(value["style"], json!("seamless"));
        assert_eq!(value["fields"].as_array().unwrap().len(), 3);
        assert_eq!(
            value["fields"][2]["conditional_logic"][0][0]["field"],
            json!("field_employee_has_website")
        );
        assert_eq!(value["fields"][1]["key"], json!("field_employee_has_website"));
    }
}
