//! Group location rules
//!
//! Locations decide on which edit screens a field group appears. Like
//! conditional logic they form a disjunction of conjunctions, but compare
//! WordPress parameters (`post_type`, `page_template`, `options_page`, ...)
//! instead of other fields, and only support equality.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Location rule as written in YAML
#[derive(Debug, Deserialize)]
struct RawLocationRule {
    param: String,
    #[serde(default = "default_operator")]
    operator: String,
    value: String,
}

fn default_operator() -> String {
    "==".to_string()
}

/// One comparison of a WordPress parameter
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawLocationRule")]
pub struct LocationRule {
    param: String,
    negated: bool,
    value: String,
}

impl TryFrom<RawLocationRule> for LocationRule {
    type Error = Error;

    fn try_from(raw: RawLocationRule) -> Result<Self> {
        Self::new(raw.param, &raw.operator, raw.value)
    }
}

impl LocationRule {
    /// Create a rule; `operator` must be `==` or `!=`
    pub fn new(
        param: impl Into<String>,
        operator: &str,
        value: impl Into<String>,
    ) -> Result<Self> {
        let param = param.into();
        if param.trim().is_empty() {
            return Err(Error::InvalidLocation {
                message: "param must not be empty".to_string(),
            });
        }
        let negated = match operator {
            "==" => false,
            "!=" => true,
            other => {
                return Err(Error::InvalidLocation {
                    message: format!("unsupported operator [{other}] for '{param}'"),
                });
            }
        };
        Ok(Self {
            param,
            negated,
            value: value.into(),
        })
    }

    /// Shorthand for an equality rule
    pub fn is(param: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        Self::new(param, "==", value)
    }

    fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("param".to_string(), Value::String(self.param.clone()));
        map.insert(
            "operator".to_string(),
            Value::from(if self.negated { "!=" } else { "==" }),
        );
        map.insert("value".to_string(), Value::String(self.value.clone()));
        map
    }
}

/// Rules that must all match
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LocationGroup {
    rules: Vec<LocationRule>,
}

impl LocationGroup {
    /// Create an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule
    pub fn and(mut self, rule: LocationRule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// Alternative groups of location rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Location {
    groups: Vec<LocationGroup>,
}

impl Location {
    /// Location without rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an alternative group
    pub fn or(mut self, group: LocationGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Whether no group was added
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Render as `[[{param, operator, value}]]`
    pub fn to_value(&self) -> Value {
        Value::Array(
            self.groups
                .iter()
                .map(|group| {
                    Value::Array(
                        group
                            .rules
                            .iter()
                            .map(|rule| Value::Object(rule.to_map()))
                            .collect(),
                    )
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_to_value() {
        let location = Location::new()
            .or(LocationGroup::new()
                .and(LocationRule::is("post_type", "page").unwrap())
                .and(LocationRule::new("page_template", "!=", "default").unwrap()))
            .or(LocationGroup::new().and(LocationRule::is("options_page", "settings").unwrap()));

        assert_eq!(
            location.to_value(),
            json!([
                [
                    {"param": "post_type", "operator": "==", "value": "page"},
                    {"param": "page_template", "operator": "!=", "value": "default"},
                ],
                [
                    {"param": "options_page", "operator": "==", "value": "settings"},
                ],
            ])
        );
    }

    #[test]
    fn test_invalid_location_operator() {
        let err = LocationRule::new("post_type", ">", "page").unwrap_err();
        assert!(matches!(err, Error::InvalidLocation { .. }));
    }

    #[test]
    fn test_empty_param_is_rejected() {
        assert!(LocationRule::is(" ", "page").is_err());
    }

    #[test]
    fn test_parse_location_defaults_operator() {
        let yaml = r#"
- - param: post_type
    value: employee
"#;
        let location: Location = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            location.to_value(),
            json!([[{"param": "post_type", "operator": "==", "value": "employee"}]])
        );
    }
}
