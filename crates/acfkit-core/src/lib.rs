//! acfkit Core Library
//!
//! This crate turns declarative field definitions into the configuration
//! Advanced Custom Fields consumes:
//! - Field and group definitions, from Rust or YAML
//! - Deterministic key derivation and key uniqueness checks
//! - Conditional logic and location rules
//! - Local JSON export
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Definitions │────▶│    Build    │────▶│  Serialize  │
//! │ (YAML/Rust) │     │ keys+unique │     │ rules→keys  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use acfkit_core::{ConditionalLogic, ConditionalRule, FieldDefinition, FieldGroup, RuleGroup};
//!
//! let group = FieldGroup::new("Employee")
//!     .field(FieldDefinition::true_false("Has website"))
//!     .field(FieldDefinition::url("Website").conditional_logic(
//!         ConditionalLogic::new().or(RuleGroup::new().and(ConditionalRule::when(
//!             "has_website",
//!             "==",
//!             1,
//!         )?)),
//!     ))
//!     .build()?;
//!
//! let value = group.to_value();
//! assert_eq!(value["fields"][1]["key"], "field_employee_website");
//! assert_eq!(
//!     value["fields"][1]["conditional_logic"][0][0]["field"],
//!     "field_employee_has_website"
//! );
//! # Ok::<(), acfkit_core::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attributes;
pub mod conditional;
pub mod config;
pub mod error;
pub mod export;
pub mod field;
pub mod field_type;
pub mod group;
pub mod key;
pub mod location;
pub mod registry;

pub use conditional::{ConditionalLogic, ConditionalRule, Operator, RuleGroup};
pub use config::{Config, ProjectConfig};
pub use error::{Error, Result};
pub use field::{Field, FieldDefinition};
pub use field_type::FieldType;
pub use group::{BuiltGroup, FieldGroup};
pub use key::ParentKey;
pub use location::{Location, LocationGroup, LocationRule};
pub use registry::{BuildSession, KeyRegistry};
