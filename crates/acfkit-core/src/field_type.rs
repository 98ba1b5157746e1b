//! Field types and the attributes each one accepts

use serde::Deserialize;
use std::fmt;

use crate::attributes::Capability;

/// Capabilities every field type has
const COMMON: &[Capability] = &[
    Capability::Instructions,
    Capability::Required,
    Capability::Wrapper,
    Capability::ConditionalLogic,
];

const TEXT: &[Capability] = &[
    Capability::DefaultValue,
    Capability::Placeholder,
    Capability::CharacterLimit,
];

const EVERY_SPECIFIC: &[Capability] = &[
    Capability::Nullable,
    Capability::Multiple,
    Capability::FilterBy,
    Capability::DefaultValue,
    Capability::Placeholder,
    Capability::CharacterLimit,
    Capability::SubFields,
    Capability::Layouts,
];

const INPUT: &[Capability] = &[Capability::DefaultValue, Capability::Placeholder];

const PAGE_LINK: &[Capability] = &[
    Capability::FilterBy,
    Capability::Multiple,
    Capability::Nullable,
];

const SELECT: &[Capability] = &[
    Capability::DefaultValue,
    Capability::Multiple,
    Capability::Nullable,
];

/// ACF field type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum FieldType {
    /// Single line text
    Text,
    /// Multi line text
    Textarea,
    /// Email address
    Email,
    /// URL
    Url,
    /// Number
    Number,
    /// Boolean toggle
    TrueFalse,
    /// Image attachment
    Image,
    /// Link to a post, page or archive
    PageLink,
    /// Choice from a list
    Select,
    /// Repeating rows of sub fields
    Repeater,
    /// Fixed set of sub fields
    Group,
    /// Rows picked from a set of layouts
    FlexibleContent,
    /// One layout of a flexible content field
    Layout,
    /// Type registered by a third-party plugin; accepts every attribute
    Custom(String),
}

impl FieldType {
    /// Type name as ACF spells it
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::Number => "number",
            FieldType::TrueFalse => "true_false",
            FieldType::Image => "image",
            FieldType::PageLink => "page_link",
            FieldType::Select => "select",
            FieldType::Repeater => "repeater",
            FieldType::Group => "group",
            FieldType::FlexibleContent => "flexible_content",
            FieldType::Layout => "layout",
            FieldType::Custom(name) => name,
        }
    }

    /// Type specific capabilities, on top of the common ones
    fn specific(&self) -> &'static [Capability] {
        match self {
            FieldType::Text | FieldType::Textarea => TEXT,
            FieldType::Email | FieldType::Url | FieldType::Number => INPUT,
            FieldType::TrueFalse => &[Capability::DefaultValue],
            FieldType::Image => &[],
            FieldType::PageLink => PAGE_LINK,
            FieldType::Select => SELECT,
            FieldType::Repeater | FieldType::Group | FieldType::Layout => {
                &[Capability::SubFields]
            }
            FieldType::FlexibleContent => &[Capability::Layouts],
            FieldType::Custom(_) => EVERY_SPECIFIC,
        }
    }

    /// Every capability of this type
    pub fn capabilities(&self) -> Vec<Capability> {
        COMMON.iter().chain(self.specific()).copied().collect()
    }

    /// Whether this type accepts attributes of the given capability
    pub fn supports(&self, capability: Capability) -> bool {
        COMMON.contains(&capability) || self.specific().contains(&capability)
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "text" => FieldType::Text,
            "textarea" => FieldType::Textarea,
            "email" => FieldType::Email,
            "url" => FieldType::Url,
            "number" => FieldType::Number,
            "true_false" => FieldType::TrueFalse,
            "image" => FieldType::Image,
            "page_link" => FieldType::PageLink,
            "select" => FieldType::Select,
            "repeater" => FieldType::Repeater,
            "group" => FieldType::Group,
            "flexible_content" => FieldType::FlexibleContent,
            "layout" => FieldType::Layout,
            _ => FieldType::Custom(value),
        }
    }
}

impl From<&str> for FieldType {
    fn from(value: &str) -> Self {
        FieldType::from(value.to_string())
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
