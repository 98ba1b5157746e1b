//! Field attributes
//!
//! Attributes are small values that each write one concern into a field's
//! output map. Which attributes a field accepts is decided by its
//! [`FieldType`](crate::field_type::FieldType) through a set of
//! [`Capability`] values; see [`FieldType::capabilities`].
//!
//! [`FieldType::capabilities`]: crate::field_type::FieldType::capabilities

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// An orthogonal concern a field type may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Help text below the label
    Instructions,
    /// Value must be provided
    Required,
    /// Empty selection allowed
    Nullable,
    /// Several values may be selected
    Multiple,
    /// Wrapper element attributes
    Wrapper,
    /// Restrict by post type and taxonomy
    FilterBy,
    /// Initial value
    DefaultValue,
    /// Input placeholder
    Placeholder,
    /// Maximum input length
    CharacterLimit,
    /// Visibility rules
    ConditionalLogic,
    /// Nested fields
    SubFields,
    /// Flexible content layouts
    Layouts,
}

impl Capability {
    /// Name used in error messages, matching the output key where one exists
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Instructions => "instructions",
            Capability::Required => "required",
            Capability::Nullable => "allow_null",
            Capability::Multiple => "multiple",
            Capability::Wrapper => "wrapper",
            Capability::FilterBy => "filter_by",
            Capability::DefaultValue => "default_value",
            Capability::Placeholder => "placeholder",
            Capability::CharacterLimit => "maxlength",
            Capability::ConditionalLogic => "conditional_logic",
            Capability::SubFields => "sub_fields",
            Capability::Layouts => "layouts",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that writes itself into a field's output map
pub trait ContributeTo {
    /// Insert this value's entries into `map`
    fn contribute_to(&self, map: &mut Map<String, Value>);
}

/// `required`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Required(pub bool);

impl ContributeTo for Required {
    fn contribute_to(&self, map: &mut Map<String, Value>) {
        map.insert("required".to_string(), Value::Bool(self.0));
    }
}

/// `allow_null`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nullable(pub bool);

impl ContributeTo for Nullable {
    fn contribute_to(&self, map: &mut Map<String, Value>) {
        map.insert("allow_null".to_string(), Value::Bool(self.0));
    }
}

/// `multiple`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Multiple(pub bool);

impl ContributeTo for Multiple {
    fn contribute_to(&self, map: &mut Map<String, Value>) {
        map.insert("multiple".to_string(), Value::Bool(self.0));
    }
}

/// `instructions`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instructions(pub String);

impl ContributeTo for Instructions {
    fn contribute_to(&self, map: &mut Map<String, Value>) {
        map.insert("instructions".to_string(), Value::String(self.0.clone()));
    }
}

/// `placeholder`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder(pub String);

impl ContributeTo for Placeholder {
    fn contribute_to(&self, map: &mut Map<String, Value>) {
        map.insert("placeholder".to_string(), Value::String(self.0.clone()));
    }
}

/// `maxlength`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterLimit(pub u32);

impl ContributeTo for CharacterLimit {
    fn contribute_to(&self, map: &mut Map<String, Value>) {
        map.insert("maxlength".to_string(), Value::from(self.0));
    }
}

/// `default_value`
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultValue(pub Value);

impl ContributeTo for DefaultValue {
    fn contribute_to(&self, map: &mut Map<String, Value>) {
        map.insert("default_value".to_string(), self.0.clone());
    }
}

/// `wrapper` element attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Wrapper {
    /// Width in percent
    #[serde(default)]
    pub width: Option<u8>,
    /// CSS class
    #[serde(default)]
    pub class: Option<String>,
    /// HTML id
    #[serde(default)]
    pub id: Option<String>,
}

impl Wrapper {
    /// Wrapper with only a width
    pub fn width(width: u8) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }
}

impl ContributeTo for Wrapper {
    fn contribute_to(&self, map: &mut Map<String, Value>) {
        let mut wrapper = Map::new();
        wrapper.insert(
            "width".to_string(),
            Value::String(self.width.map(|w| w.to_string()).unwrap_or_default()),
        );
        wrapper.insert(
            "class".to_string(),
            Value::String(self.class.clone().unwrap_or_default()),
        );
        wrapper.insert(
            "id".to_string(),
            Value::String(self.id.clone().unwrap_or_default()),
        );
        map.insert("wrapper".to_string(), Value::Object(wrapper));
    }
}

/// `post_type` and `taxonomy` filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterBy {
    /// Allowed post types
    pub post_types: Vec<String>,
    /// Allowed taxonomy terms, e.g. `category:news`
    pub taxonomies: Vec<String>,
}

impl FilterBy {
    /// Filter by post types
    pub fn post_types<I, S>(post_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            post_types: post_types.into_iter().map(Into::into).collect(),
            taxonomies: Vec::new(),
        }
    }

    /// Add taxonomy filters
    pub fn with_taxonomies<I, S>(mut self, taxonomies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.taxonomies = taxonomies.into_iter().map(Into::into).collect();
        self
    }
}

impl ContributeTo for FilterBy {
    fn contribute_to(&self, map: &mut Map<String, Value>) {
        if !self.post_types.is_empty() {
            map.insert("post_type".to_string(), Value::from(self.post_types.clone()));
        }
        if !self.taxonomies.is_empty() {
            map.insert("taxonomy".to_string(), Value::from(self.taxonomies.clone()));
        }
    }
}

/// Any attribute a field may carry
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// See [`Required`]
    Required(Required),
    /// See [`Nullable`]
    Nullable(Nullable),
    /// See [`Multiple`]
    Multiple(Multiple),
    /// See [`Instructions`]
    Instructions(Instructions),
    /// See [`Placeholder`]
    Placeholder(Placeholder),
    /// See [`CharacterLimit`]
    CharacterLimit(CharacterLimit),
    /// See [`DefaultValue`]
    DefaultValue(DefaultValue),
    /// See [`Wrapper`]
    Wrapper(Wrapper),
    /// See [`FilterBy`]
    FilterBy(FilterBy),
}

impl Attribute {
    /// The capability a field type needs to accept this attribute
    pub fn capability(&self) -> Capability {
        match self {
            Attribute::Required(_) => Capability::Required,
            Attribute::Nullable(_) => Capability::Nullable,
            Attribute::Multiple(_) => Capability::Multiple,
            Attribute::Instructions(_) => Capability::Instructions,
            Attribute::Placeholder(_) => Capability::Placeholder,
            Attribute::CharacterLimit(_) => Capability::CharacterLimit,
            Attribute::DefaultValue(_) => Capability::DefaultValue,
            Attribute::Wrapper(_) => Capability::Wrapper,
            Attribute::FilterBy(_) => Capability::FilterBy,
        }
    }
}

impl ContributeTo for Attribute {
    fn contribute_to(&self, map: &mut Map<String, Value>) {
        match self {
            Attribute::Required(a) => a.contribute_to(map),
            Attribute::Nullable(a) => a.contribute_to(map),
            Attribute::Multiple(a) => a.contribute_to(map),
            Attribute::Instructions(a) => a.contribute_to(map),
            Attribute::Placeholder(a) => a.contribute_to(map),
            Attribute::CharacterLimit(a) => a.contribute_to(map),
            Attribute::DefaultValue(a) => a.contribute_to(map),
            Attribute::Wrapper(a) => a.contribute_to(map),
            Attribute::FilterBy(a) => a.contribute_to(map),
        }
    }
}

macro_rules! impl_from_attribute {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for Attribute {
                fn from(value: $ty) -> Self {
                    Attribute::$ty(value)
                }
            }
        )*
    };
}

impl_from_attribute!(
    Required,
    Nullable,
    Multiple,
    Instructions,
    Placeholder,
    CharacterLimit,
    DefaultValue,
    Wrapper,
    FilterBy,
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(attribute: impl Into<Attribute>) -> Value {
        let mut map = Map::new();
        attribute.into().contribute_to(&mut map);
        Value::Object(map)
    }

    #[test]
    fn test_flag_attributes() {
        assert_eq!(render(Required(true)), json!({"required": true}));
        assert_eq!(render(Nullable(false)), json!({"allow_null": false}));
        assert_eq!(render(Multiple(true)), json!({"multiple": true}));
    }

    #[test]
    fn test_wrapper_fills_missing_parts() {
        assert_eq!(
            render(Wrapper::width(50)),
            json!({"wrapper": {"width": "50", "class": "", "id": ""}})
        );
    }

    #[test]
    fn test_filter_by_skips_empty_lists() {
        assert_eq!(
            render(FilterBy::post_types(["page"])),
            json!({"post_type": ["page"]})
        );
        assert_eq!(
            render(FilterBy::post_types(["post"]).with_taxonomies(["category:news"])),
            json!({"post_type": ["post"], "taxonomy": ["category:news"]})
        );
    }

    #[test]
    fn test_attribute_capability() {
        assert_eq!(
            Attribute::from(CharacterLimit(10)).capability(),
            Capability::CharacterLimit
        );
        assert_eq!(Capability::Nullable.to_string(), "allow_null");
    }

    #[test]
    fn test_parse_wrapper() {
        let wrapper: Wrapper = serde_yaml::from_str("width: 25\nclass: half\n").unwrap();
        assert_eq!(wrapper.width, Some(25));
        assert_eq!(wrapper.class.as_deref(), Some("half"));
        assert!(wrapper.id.is_none());
    }
}
