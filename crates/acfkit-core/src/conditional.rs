//! Conditional logic
//!
//! A field can be shown or hidden depending on the values of other fields.
//! ACF stores this as a disjunction of conjunctions:
//!
//! ```text
//! conditional_logic:
//!   - - { field: field_employee_source, operator: "==", value: "https://example.com/" }
//!     - { field: field_employee_kind, operator: "!=empty" }     # AND
//!   - - { field: field_employee_fallback, operator: "==empty" } # OR
//! ```
//!
//! Rules name their target field and are only resolved to a key when the
//! tree is serialized, so a rule may point at a field that has not been
//! built yet.
//!
//! # Example
//!
//! ```rust
//! use acfkit_core::conditional::{ConditionalLogic, ConditionalRule, RuleGroup};
//!
//! let logic = ConditionalLogic::new().or(
//!     RuleGroup::new().and(ConditionalRule::when("source", "==", "https://example.com/")?),
//! );
//! assert_eq!(logic.len(), 1);
//! # Ok::<(), acfkit_core::Error>(())
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::key;

/// Comparison operator of a conditional rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `==` is equal to
    Equal,
    /// `!=` is not equal to
    NotEqual,
    /// `>` is greater than
    GreaterThan,
    /// `<` is less than
    LessThan,
    /// `==pattern` matches pattern
    Pattern,
    /// `==contains` contains value
    Contains,
    /// `==empty` has no value
    Empty,
    /// `!=empty` has any value
    NotEmpty,
}

impl Operator {
    /// Every operator ACF accepts
    pub const ALL: [Operator; 8] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::Pattern,
        Operator::Contains,
        Operator::Empty,
        Operator::NotEmpty,
    ];

    /// The operator as ACF spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::Pattern => "==pattern",
            Operator::Contains => "==contains",
            Operator::Empty => "==empty",
            Operator::NotEmpty => "!=empty",
        }
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| Error::InvalidOperator {
                operator: s.to_string(),
            })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a rule value counts as present.
///
/// `null`, `false`, `0`, `""`, `"0"` and empty arrays or objects are all
/// treated as "no value".
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Rule as written in YAML, before operator validation
#[derive(Debug, Deserialize)]
struct RawRule {
    field: String,
    operator: String,
    #[serde(default)]
    value: Option<Value>,
}

/// One comparison against another field's value
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawRule")]
pub struct ConditionalRule {
    name: String,
    operator: Operator,
    value: Option<Value>,
}

impl TryFrom<RawRule> for ConditionalRule {
    type Error = Error;

    fn try_from(raw: RawRule) -> Result<Self> {
        Self::new(raw.field, &raw.operator, raw.value)
    }
}

impl ConditionalRule {
    /// Create a rule targeting the field named `name`.
    ///
    /// Fails with [`Error::InvalidOperator`] when `operator` is not one of
    /// [`Operator::ALL`].
    pub fn new(name: impl Into<String>, operator: &str, value: Option<Value>) -> Result<Self> {
        let operator = operator.parse::<Operator>()?;
        Ok(Self {
            name: name.into(),
            operator,
            value,
        })
    }

    /// Shorthand for a rule comparing against a value
    pub fn when(name: impl Into<String>, operator: &str, value: impl Into<Value>) -> Result<Self> {
        Self::new(name, operator, Some(value.into()))
    }

    /// Shorthand for a rule without a value, such as `==empty`
    pub fn when_op(name: impl Into<String>, operator: &str) -> Result<Self> {
        Self::new(name, operator, None)
    }

    /// Name of the referenced field
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Comparison operator
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Comparison value, if any
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Resolve the rule against `parent_key` and render it as ACF expects.
    ///
    /// Without a parent key the target's own name stands in for the chain,
    /// so `source` resolves to `field_source_source`. The value is left out
    /// entirely when it is not truthy.
    pub fn to_rule(&self, parent_key: Option<&str>) -> Map<String, Value> {
        let name = key::sanitize(&self.name);
        let parent_key = key::resolve_parent_key(parent_key, &name);
        let target = key::derive_key(&parent_key, &name);

        let mut rule = Map::new();
        rule.insert("field".to_string(), Value::String(target));
        rule.insert(
            "operator".to_string(),
            Value::String(self.operator.as_str().to_string()),
        );
        if let Some(value) = self.value.as_ref().filter(|v| is_truthy(v)) {
            rule.insert("value".to_string(), value.clone());
        }
        rule
    }
}

/// Rules that must all match (AND)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RuleGroup {
    rules: Vec<ConditionalRule>,
}

impl RuleGroup {
    /// Create an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule
    pub fn and(mut self, rule: ConditionalRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rules in order
    pub fn rules(&self) -> &[ConditionalRule] {
        &self.rules
    }

    /// Render every rule against `parent_key`
    pub fn to_value(&self, parent_key: Option<&str>) -> Value {
        Value::Array(
            self.rules
                .iter()
                .map(|rule| Value::Object(rule.to_rule(parent_key)))
                .collect(),
        )
    }
}

impl FromIterator<ConditionalRule> for RuleGroup {
    fn from_iter<I: IntoIterator<Item = ConditionalRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

/// Groups of rules of which at least one must match (OR)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ConditionalLogic {
    groups: Vec<RuleGroup>,
}

impl ConditionalLogic {
    /// Create logic without any group
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an alternative group
    pub fn or(mut self, group: RuleGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Groups in order
    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there is no group
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Render all groups against `parent_key`, keeping group and rule order
    pub fn to_value(&self, parent_key: Option<&str>) -> Value {
        Value::Array(
            self.groups
                .iter()
                .map(|group| group.to_value(parent_key))
                .collect(),
        )
    }
}

impl FromIterator<RuleGroup> for ConditionalLogic {
    fn from_iter<I: IntoIterator<Item = RuleGroup>>(iter: I) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("==")]
    #[case("!=")]
    #[case(">")]
    #[case("<")]
    #[case("==pattern")]
    #[case("==contains")]
    #[case("==empty")]
    #[case("!=empty")]
    fn test_allowed_operator_is_kept_verbatim(#[case] operator: &str) {
        let rule = ConditionalRule::when("source", operator, "x").unwrap();
        let map = rule.to_rule(Some("employee"));
        assert_eq!(map["operator"], json!(operator));
    }

    #[rstest]
    #[case("=")]
    #[case("===")]
    #[case(">=")]
    #[case("<=")]
    #[case("contains")]
    #[case("== ")]
    #[case("")]
    fn test_invalid_operator_is_rejected(#[case] operator: &str) {
        let err = ConditionalRule::when("source", operator, "x").unwrap_err();
        match err {
            Error::InvalidOperator { operator: rejected } => assert_eq!(rejected, operator),
            other => panic!("Expected InvalidOperator, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_operator_message() {
        let err = ConditionalRule::when_op("source", "is").unwrap_err();
        assert_eq!(err.to_string(), "invalid conditional logic operator [is]");
    }

    #[test]
    fn test_rule_resolves_against_parent() {
        let rule = ConditionalRule::when("Source", "==", "https://example.com/").unwrap();
        assert_eq!(
            Value::Object(rule.to_rule(Some("employee"))),
            json!({
                "field": "field_employee_source",
                "operator": "==",
                "value": "https://example.com/",
            })
        );
    }

    #[test]
    fn test_rule_without_parent_falls_back_to_own_name() {
        let rule = ConditionalRule::when("Source", "==", "x").unwrap();
        assert_eq!(rule.to_rule(None)["field"], json!("field_source_source"));
        assert_eq!(rule.to_rule(Some(""))["field"], json!("field_source_source"));
    }

    #[test]
    fn test_rule_resolution_is_repeatable() {
        let rule = ConditionalRule::when("source", "==", 1).unwrap();
        let first = rule.to_rule(Some("employee"));
        let moved = rule.to_rule(Some("company_employee"));
        let again = rule.to_rule(Some("employee"));
        assert_eq!(first, again);
        assert_eq!(moved["field"], json!("field_company_employee_source"));
    }

    #[rstest]
    #[case(json!(""))]
    #[case(json!(0))]
    #[case(json!(0.0))]
    #[case(json!(null))]
    #[case(json!(false))]
    #[case(json!("0"))]
    #[case(json!([]))]
    fn test_falsy_value_is_omitted(#[case] value: Value) {
        let rule = ConditionalRule::new("source", "==", Some(value)).unwrap();
        assert!(!rule.to_rule(Some("employee")).contains_key("value"));
    }

    #[rstest]
    #[case(json!("https://example.com/"))]
    #[case(json!(1))]
    #[case(json!(true))]
    #[case(json!(["a"]))]
    fn test_truthy_value_is_kept(#[case] value: Value) {
        let rule = ConditionalRule::new("source", "==", Some(value.clone())).unwrap();
        assert_eq!(rule.to_rule(Some("employee"))["value"], value);
    }

    #[test]
    fn test_missing_value_is_omitted() {
        let rule = ConditionalRule::when_op("source", "==empty").unwrap();
        assert!(!rule.to_rule(None).contains_key("value"));
    }

    #[test]
    fn test_logic_preserves_group_and_rule_order() {
        let logic = ConditionalLogic::new()
            .or(RuleGroup::new()
                .and(ConditionalRule::when("a", "==", "1").unwrap())
                .and(ConditionalRule::when("b", ">", 2).unwrap()))
            .or(RuleGroup::new())
            .or(RuleGroup::new().and(ConditionalRule::when_op("c", "==empty").unwrap()));

        assert_eq!(
            logic.to_value(Some("employee")),
            json!([
                [
                    {"field": "field_employee_a", "operator": "==", "value": "1"},
                    {"field": "field_employee_b", "operator": ">", "value": 2},
                ],
                [],
                [
                    {"field": "field_employee_c", "operator": "==empty"},
                ],
            ])
        );
    }

    #[test]
    fn test_parse_logic_from_yaml() {
        let yaml = r#"
- - field: source
    operator: "=="
    value: "https://example.com/"
  - field: kind
    operator: "!=empty"
- []
"#;
        let logic: ConditionalLogic = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(logic.len(), 2);
        assert_eq!(logic.groups()[0].rules().len(), 2);
        assert_eq!(logic.groups()[0].rules()[1].operator(), Operator::NotEmpty);
        assert!(logic.groups()[1].rules().is_empty());
    }

    #[test]
    fn test_parse_logic_with_invalid_operator_fails() {
        let yaml = r#"
- - field: source
    operator: "~="
"#;
        let result: std::result::Result<ConditionalLogic, _> = serde_yaml::from_str(yaml);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("invalid conditional logic operator [~=]"));
    }
}
