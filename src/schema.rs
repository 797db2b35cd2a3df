//! Rosetta schema structs for serde deserialization.
//!
//! This module defines the subset of a Rosetta-style model document the
//! converter interprets: class and enum declarations with single
//! inheritance, annotations and occurrence bounds. Declaration kinds other
//! than classes and enums deserialize but are ignored downstream.
//!
//! `SchemaIndex` is the sole cross-reference mechanism: an immutable
//! identifier-to-declaration lookup built once per run, with classes and
//! enums kept in separate maps. Base-chain acyclicity is validated here so
//! the memo-free flattening recursion in the normalizer always terminates.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::error::GenError;

/// A parsed schema document: an ordered collection of top-level
/// declarations.
#[derive(Debug, Deserialize)]
pub struct RosettaSchema {
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

/// A top-level declaration. Unrecognized kinds parse as `Other` and are
/// skipped by the normalizer.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Declaration {
    Class(ClassDecl),
    Enum(EnumDecl),
    #[serde(other)]
    Other,
}

/// A class declaration, optionally extending one base class.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDecl {
    pub name: String,
    /// Base class identifier; base fields are inlined before own fields.
    pub super_type: Option<String>,
    /// Annotation markers, e.g. "key", "keyValue".
    #[serde(default)]
    pub annotations: Vec<String>,
    #[serde(default)]
    pub fields: Vec<SchemaField>,
    /// Documentation from the source model.
    pub definition: Option<String>,
}

impl ClassDecl {
    pub fn has_annotation(&self, marker: &str) -> bool {
        self.annotations.iter().any(|a| a == marker)
    }
}

/// An enum declaration, optionally extending one base enum.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDecl {
    pub name: String,
    /// Base enum identifier; base values are inlined before own values.
    pub super_type: Option<String>,
    #[serde(default)]
    pub values: Vec<EnumValueDecl>,
    pub definition: Option<String>,
}

/// One tagged value of an enum declaration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValueDecl {
    pub name: String,
    pub definition: Option<String>,
}

/// A field of a class declaration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    pub name: String,
    /// Declared type name. Absence never fails conversion: the field
    /// degrades to Text.
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub cardinality: SchemaCardinality,
    /// Annotation markers, e.g. "key", "keyValue", "reference".
    #[serde(default)]
    pub annotations: Vec<String>,
    pub definition: Option<String>,
}

impl SchemaField {
    pub fn has_annotation(&self, marker: &str) -> bool {
        self.annotations.iter().any(|a| a == marker)
    }
}

/// Numeric occurrence bounds as declared in the schema. `upper: None`
/// means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SchemaCardinality {
    pub lower: u32,
    pub upper: Option<u32>,
}

impl SchemaCardinality {
    /// A field with bounds (0, 0) can never be present and is dropped
    /// from the flattened field list entirely.
    pub fn is_never_present(&self) -> bool {
        self.lower == 0 && self.upper == Some(0)
    }
}

impl Default for SchemaCardinality {
    fn default() -> Self {
        SchemaCardinality {
            lower: 1,
            upper: Some(1),
        }
    }
}

impl RosettaSchema {
    /// Parse a schema from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, GenError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Read-only lookup index over a schema's declarations.
///
/// Built once per conversion run and shared read-only; no declaration
/// holds a direct reference to another.
#[derive(Debug)]
pub struct SchemaIndex<'a> {
    classes: HashMap<&'a str, &'a ClassDecl>,
    enums: HashMap<&'a str, &'a EnumDecl>,
}

impl<'a> SchemaIndex<'a> {
    /// Build the index and validate every base-chain.
    ///
    /// A base reference to an undeclared identifier or a cycle in the
    /// base-reference graph is a hard error naming the offender.
    pub fn build(schema: &'a RosettaSchema) -> Result<Self, GenError> {
        let mut classes = HashMap::new();
        let mut enums = HashMap::new();

        for decl in &schema.declarations {
            match decl {
                Declaration::Class(c) => {
                    classes.insert(c.name.as_str(), c);
                }
                Declaration::Enum(e) => {
                    enums.insert(e.name.as_str(), e);
                }
                Declaration::Other => {}
            }
        }

        let index = SchemaIndex { classes, enums };

        // Chains are checked in declaration order, not map order, so the
        // same defect is reported on every run.
        for decl in &schema.declarations {
            match decl {
                Declaration::Class(c) => {
                    index.check_chain(&c.name, |name| {
                        index.classes.get(name).map(|cl| cl.super_type.as_deref())
                    })?;
                }
                Declaration::Enum(e) => {
                    index.check_chain(&e.name, |name| {
                        index.enums.get(name).map(|en| en.super_type.as_deref())
                    })?;
                }
                Declaration::Other => {}
            }
        }

        Ok(index)
    }

    /// Walk the ancestor chain starting at `name`, failing on a missing
    /// base or a revisited identifier.
    fn check_chain(
        &self,
        name: &str,
        base_of: impl Fn(&str) -> Option<Option<&'a str>>,
    ) -> Result<(), GenError> {
        let mut seen = HashSet::new();
        let mut current = name.to_string();

        while seen.insert(current.clone()) {
            // Only base references can be undeclared; `name` itself came
            // from the index.
            let Some(base) = base_of(&current) else {
                return Err(GenError::MissingBase {
                    name: name.to_string(),
                    base: current,
                });
            };
            match base {
                Some(next) => current = next.to_string(),
                None => return Ok(()),
            }
        }
        Err(GenError::CyclicInheritance(current))
    }

    /// Look up a class by identifier.
    pub fn class(&self, name: &str) -> Option<&'a ClassDecl> {
        self.classes.get(name).copied()
    }

    /// Look up an enum by identifier.
    pub fn enumeration(&self, name: &str) -> Option<&'a EnumDecl> {
        self.enums.get(name).copied()
    }
}
