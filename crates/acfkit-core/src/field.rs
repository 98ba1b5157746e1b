//! Field definitions and built fields
//!
//! Building happens in two phases:
//!
//! 1. [`Field::build`] turns a [`FieldDefinition`] into a [`Field`]: the key
//!    is derived from the name and parent chain and registered with the
//!    [`BuildSession`], attributes are checked against the field type, and
//!    children are built below the field's own chain.
//! 2. [`Field::to_map`] flattens the tree into the map ACF consumes. Only
//!    here are conditional rules resolved to keys.
//!
//! # Example
//!
//! ```rust
//! use acfkit_core::{BuildSession, Field, FieldDefinition, ParentKey};
//!
//! let mut session = BuildSession::new();
//! let definition = FieldDefinition::page_link("Contact page").allow_archives();
//! let field = Field::build(definition, &ParentKey::group("employee"), &mut session)?;
//! assert_eq!(field.key(), "field_employee_contact_page");
//! # Ok::<(), acfkit_core::Error>(())
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::attributes::{
    Attribute, Capability, CharacterLimit, ContributeTo, DefaultValue, FilterBy, Instructions,
    Multiple, Nullable, Placeholder, Required, Wrapper,
};
use crate::conditional::ConditionalLogic;
use crate::error::{Error, Result};
use crate::field_type::FieldType;
use crate::key::{self, ParentKey};
use crate::registry::BuildSession;

/// Output keys written by the field itself; settings may not override them
const RESERVED_KEYS: &[&str] = &[
    "type",
    "label",
    "name",
    "key",
    "sub_fields",
    "layouts",
    "conditional_logic",
];

/// Declarative description of one field, before keys are assigned
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawField")]
pub struct FieldDefinition {
    field_type: FieldType,
    label: String,
    name: String,
    key: Option<String>,
    attributes: Vec<Attribute>,
    settings: Map<String, Value>,
    sub_fields: Vec<FieldDefinition>,
    layouts: Vec<FieldDefinition>,
    conditional_logic: Option<ConditionalLogic>,
}

impl FieldDefinition {
    /// Create a definition; the name defaults to the sanitized label
    pub fn new(field_type: impl Into<FieldType>, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            field_type: field_type.into(),
            name: key::sanitize(&label),
            label,
            key: None,
            attributes: Vec::new(),
            settings: Map::new(),
            sub_fields: Vec::new(),
            layouts: Vec::new(),
            conditional_logic: None,
        }
    }

    /// Text field
    pub fn text(label: impl Into<String>) -> Self {
        Self::new(FieldType::Text, label)
    }

    /// Textarea field
    pub fn textarea(label: impl Into<String>) -> Self {
        Self::new(FieldType::Textarea, label)
    }

    /// Email field
    pub fn email(label: impl Into<String>) -> Self {
        Self::new(FieldType::Email, label)
    }

    /// URL field
    pub fn url(label: impl Into<String>) -> Self {
        Self::new(FieldType::Url, label)
    }

    /// Number field
    pub fn number(label: impl Into<String>) -> Self {
        Self::new(FieldType::Number, label)
    }

    /// True/false field
    pub fn true_false(label: impl Into<String>) -> Self {
        Self::new(FieldType::TrueFalse, label)
    }

    /// Image field
    pub fn image(label: impl Into<String>) -> Self {
        Self::new(FieldType::Image, label)
    }

    /// Page link field
    pub fn page_link(label: impl Into<String>) -> Self {
        Self::new(FieldType::PageLink, label)
    }

    /// Select field
    pub fn select(label: impl Into<String>) -> Self {
        Self::new(FieldType::Select, label)
    }

    /// Repeater field
    pub fn repeater(label: impl Into<String>) -> Self {
        Self::new(FieldType::Repeater, label)
    }

    /// Group field
    pub fn group(label: impl Into<String>) -> Self {
        Self::new(FieldType::Group, label)
    }

    /// Flexible content field
    pub fn flexible_content(label: impl Into<String>) -> Self {
        Self::new(FieldType::FlexibleContent, label)
    }

    /// Flexible content layout
    pub fn layout(label: impl Into<String>) -> Self {
        Self::new(FieldType::Layout, label)
    }

    /// Override the field name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Derive the key from `key` instead of the name.
    ///
    /// Only the last key segment changes; the output `name` is kept.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Attach an attribute
    pub fn with(mut self, attribute: impl Into<Attribute>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// Mark the field as required
    pub fn required(self) -> Self {
        self.with(Required(true))
    }

    /// Allow an empty selection
    pub fn nullable(self) -> Self {
        self.with(Nullable(true))
    }

    /// Allow selecting several values
    pub fn multiple(self) -> Self {
        self.with(Multiple(true))
    }

    /// Help text shown below the label
    pub fn instructions(self, instructions: impl Into<String>) -> Self {
        self.with(Instructions(instructions.into()))
    }

    /// Input placeholder
    pub fn placeholder(self, placeholder: impl Into<String>) -> Self {
        self.with(Placeholder(placeholder.into()))
    }

    /// Maximum input length
    pub fn character_limit(self, limit: u32) -> Self {
        self.with(CharacterLimit(limit))
    }

    /// Initial value
    pub fn default_value(self, value: impl Into<Value>) -> Self {
        self.with(DefaultValue(value.into()))
    }

    /// Wrapper element attributes
    pub fn wrapper(self, wrapper: Wrapper) -> Self {
        self.with(wrapper)
    }

    /// Restrict selectable posts
    pub fn filter_by(self, filter: FilterBy) -> Self {
        self.with(filter)
    }

    /// Set a type specific setting
    pub fn setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Page link: list archives too
    pub fn allow_archives(self) -> Self {
        self.setting("allow_archives", true)
    }

    /// Minimum value or row count
    pub fn min(self, min: i64) -> Self {
        self.setting("min", min)
    }

    /// Maximum value or row count
    pub fn max(self, max: i64) -> Self {
        self.setting("max", max)
    }

    /// Label of the "add row" button
    pub fn button_label(self, label: impl Into<String>) -> Self {
        self.setting("button_label", label.into())
    }

    /// Select choices as value/label pairs, in order
    pub fn choices<I, K, V>(self, choices: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let choices: Map<String, Value> = choices
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect();
        self.setting("choices", Value::Object(choices))
    }

    /// Repeater and flexible content: `table`, `block` or `row`
    pub fn layout_style(self, style: impl Into<String>) -> Self {
        self.setting("layout", style.into())
    }

    /// Nested fields
    pub fn sub_fields(mut self, fields: impl IntoIterator<Item = FieldDefinition>) -> Self {
        self.sub_fields.extend(fields);
        self
    }

    /// Flexible content layouts
    pub fn layouts(mut self, layouts: impl IntoIterator<Item = FieldDefinition>) -> Self {
        self.layouts.extend(layouts);
        self
    }

    /// Visibility rules. An empty [`ConditionalLogic`] is still emitted.
    pub fn conditional_logic(mut self, logic: ConditionalLogic) -> Self {
        self.conditional_logic = Some(logic);
        self
    }

    /// Field type
    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Field label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Field name
    pub fn field_name(&self) -> &str {
        &self.name
    }

    /// Segment the key is derived from: the override, else the name
    fn key_segment(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.name)
    }

    /// Reject anything the field type cannot carry
    fn check_capabilities(&self) -> Result<()> {
        let mut needed: Vec<Capability> =
            self.attributes.iter().map(Attribute::capability).collect();
        if !self.sub_fields.is_empty() {
            needed.push(Capability::SubFields);
        }
        if !self.layouts.is_empty() {
            needed.push(Capability::Layouts);
        }
        if self.conditional_logic.is_some() {
            needed.push(Capability::ConditionalLogic);
        }

        match needed.into_iter().find(|c| !self.field_type.supports(*c)) {
            Some(capability) => Err(Error::UnsupportedAttribute {
                field_type: self.field_type.to_string(),
                attribute: capability.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Field as written in YAML
#[derive(Debug, Deserialize)]
struct RawField {
    #[serde(rename = "type")]
    field_type: FieldType,
    label: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    instructions: Option<String>,
    #[serde(default)]
    required: Option<bool>,
    #[serde(default)]
    allow_null: Option<bool>,
    #[serde(default)]
    multiple: Option<bool>,
    #[serde(default)]
    placeholder: Option<String>,
    #[serde(default)]
    maxlength: Option<u32>,
    #[serde(default)]
    default_value: Option<Value>,
    #[serde(default)]
    wrapper: Option<Wrapper>,
    #[serde(default)]
    post_type: Vec<String>,
    #[serde(default)]
    taxonomy: Vec<String>,
    #[serde(default)]
    sub_fields: Vec<FieldDefinition>,
    #[serde(default)]
    layouts: Vec<FieldDefinition>,
    #[serde(default)]
    conditional_logic: Option<ConditionalLogic>,
    #[serde(flatten)]
    settings: Map<String, Value>,
}

impl TryFrom<RawField> for FieldDefinition {
    type Error = Error;

    fn try_from(raw: RawField) -> Result<Self> {
        if raw.label.trim().is_empty() {
            return Err(Error::InvalidField {
                name: raw.name.unwrap_or_default(),
                message: "label must not be empty".to_string(),
            });
        }

        let mut definition = FieldDefinition::new(raw.field_type, raw.label);
        if let Some(name) = raw.name {
            definition = definition.name(name);
        }
        definition.key = raw.key;

        let flags = [
            raw.required.map(|v| Attribute::from(Required(v))),
            raw.allow_null.map(|v| Attribute::from(Nullable(v))),
            raw.multiple.map(|v| Attribute::from(Multiple(v))),
        ];
        let texts = [
            raw.instructions.map(|v| Attribute::from(Instructions(v))),
            raw.placeholder.map(|v| Attribute::from(Placeholder(v))),
        ];
        let others = [
            raw.maxlength.map(|v| Attribute::from(CharacterLimit(v))),
            raw.default_value.map(|v| Attribute::from(DefaultValue(v))),
            raw.wrapper.map(Attribute::from),
        ];
        definition.attributes = flags
            .into_iter()
            .chain(texts)
            .chain(others)
            .flatten()
            .collect();

        if !raw.post_type.is_empty() || !raw.taxonomy.is_empty() {
            definition = definition.filter_by(FilterBy {
                post_types: raw.post_type,
                taxonomies: raw.taxonomy,
            });
        }

        definition.settings = raw.settings;
        definition.sub_fields = raw.sub_fields;
        definition.layouts = raw.layouts;
        definition.conditional_logic = raw.conditional_logic;
        Ok(definition)
    }
}

/// A field with its key assigned and its children built
#[derive(Debug, Clone)]
pub struct Field {
    definition: FieldDefinition,
    key: String,
    parent: ParentKey,
    sub_fields: Vec<Field>,
    layouts: Vec<Field>,
}

impl Field {
    /// Build `definition` below `parent`, registering every key in `session`.
    ///
    /// Errors ([`Error::DuplicateKey`], [`Error::UnsupportedAttribute`],
    /// [`Error::InvalidField`]) abort the build; nothing is recovered.
    pub fn build(
        mut definition: FieldDefinition,
        parent: &ParentKey,
        session: &mut BuildSession,
    ) -> Result<Self> {
        if definition.key.is_none()
            && let Some(Value::String(key)) = definition.settings.get("key")
        {
            definition.key = Some(key.clone());
            definition.settings.remove("key");
        }
        if key::sanitize(definition.key_segment()).is_empty() {
            return Err(Error::InvalidField {
                name: definition.name,
                message: "key must contain at least one letter or digit".to_string(),
            });
        }
        definition.check_capabilities()?;

        let key = parent.key_for(definition.key_segment());
        session.register_key(&key)?;

        let chain = parent.child(definition.key_segment());
        let sub_fields = std::mem::take(&mut definition.sub_fields)
            .into_iter()
            .map(|child| Field::build(child, &chain, session))
            .collect::<Result<Vec<_>>>()?;
        let layouts = std::mem::take(&mut definition.layouts)
            .into_iter()
            .map(|child| Field::build(child, &chain, session))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            key = %key,
            field_type = %definition.field_type,
            depth = parent.depth(),
            "built field"
        );

        Ok(Self {
            definition,
            key,
            parent: parent.clone(),
            sub_fields,
            layouts,
        })
    }

    /// Derived field key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Field type
    pub fn field_type(&self) -> &FieldType {
        &self.definition.field_type
    }

    /// Chain the key was derived from
    pub fn parent_key(&self) -> &ParentKey {
        &self.parent
    }

    /// Built sub fields
    pub fn sub_fields(&self) -> &[Field] {
        &self.sub_fields
    }

    /// Built layouts
    pub fn layouts(&self) -> &[Field] {
        &self.layouts
    }

    /// Visibility rules, if any were set
    pub fn conditional_logic(&self) -> Option<&ConditionalLogic> {
        self.definition.conditional_logic.as_ref()
    }

    /// Number of fields in this subtree, this one included
    pub fn count(&self) -> usize {
        1 + self
            .sub_fields
            .iter()
            .chain(&self.layouts)
            .map(Field::count)
            .sum::<usize>()
    }

    /// Conditional logic resolved against this field's siblings.
    ///
    /// `None` when the field never received conditional logic.
    pub fn resolved_conditional_logic(&self) -> Option<Value> {
        let parent = self.parent.prefix();
        self.definition
            .conditional_logic
            .as_ref()
            .map(|logic| logic.to_value(Some(&parent)))
    }

    /// Flatten this field and its descendants into ACF's format
    pub fn to_map(&self) -> Map<String, Value> {
        let definition = &self.definition;
        let mut map = Map::new();
        map.insert(
            "type".to_string(),
            Value::String(definition.field_type.to_string()),
        );
        map.insert("label".to_string(), Value::String(definition.label.clone()));
        map.insert("name".to_string(), Value::String(definition.name.clone()));

        for attribute in &definition.attributes {
            attribute.contribute_to(&mut map);
        }

        for (setting, value) in &definition.settings {
            if RESERVED_KEYS.contains(&setting.as_str()) {
                tracing::warn!(
                    key = %self.key,
                    setting = %setting,
                    "ignoring setting that shadows a reserved key"
                );
                continue;
            }
            map.insert(setting.clone(), value.clone());
        }

        if !self.sub_fields.is_empty() {
            map.insert("sub_fields".to_string(), children_to_value(&self.sub_fields));
        }
        if !self.layouts.is_empty() {
            map.insert("layouts".to_string(), children_to_value(&self.layouts));
        }
        if let Some(logic) = self.resolved_conditional_logic() {
            map.insert("conditional_logic".to_string(), logic);
        }

        map.insert("key".to_string(), Value::String(self.key.clone()));
        map
    }
}

fn children_to_value(children: &[Field]) -> Value {
    Value::Array(
        children
            .iter()
            .map(|child| Value::Object(child.to_map()))
            .collect(),
    )
}
