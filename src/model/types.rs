//! Target-agnostic type model for DAML code generation.
//!
//! This module defines the intermediate representation between a flattened
//! Rosetta schema and rendered DAML source:
//! - Module: one output unit owning imports and declarations
//! - Decl: records, sum types, enumerations, aliases, templates
//! - Type: primitives, nominal references, structural products
//! - Cardinality: the 2x2 optionality/repetition lattice
//!
//! The model is pure data. It is built once per conversion run by the
//! normalizer, validated, consumed once by the renderer, then discarded.

/// A complete output module: one rendered DAML file.
#[derive(Debug, Clone)]
pub struct Module {
    /// Qualified module name, e.g. "Org.Isda.Cdm.Classes".
    pub name: String,
    /// Imports rendered after the module header, in order.
    pub imports: Vec<Import>,
    /// Declarations rendered in order, separated by a blank line.
    ///
    /// Order is presentation only; all cross-references resolve by name.
    pub decls: Vec<Decl>,
    /// Module-level documentation, word-wrapped at render time.
    pub comment: Option<String>,
}

/// An import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Import {
    /// `import Some.Module`
    Unqualified(String),
    /// `import qualified Some.Module as Alias`
    Qualified(String, String),
}

/// A top-level declaration.
///
/// References between declarations are nominal: a `Type::Nominal` names
/// another `Decl` in the same module and is resolved by lookup, never by
/// ownership.
#[derive(Debug, Clone)]
pub enum Decl {
    /// An enumeration: a sum type whose constructors all wrap unit.
    EnumType {
        name: String,
        constructors: Vec<EnumConstructor>,
        comment: Option<String>,
    },
    /// A labeled-field record.
    RecordType {
        name: String,
        fields: Vec<Field>,
        comment: Option<String>,
    },
    /// A tagged union; each alternative's type is its payload.
    ///
    /// An empty alternative list is a degenerate case rendered as a single
    /// nullary constructor named after the type.
    VariantType {
        name: String,
        alternatives: Vec<Field>,
        comment: Option<String>,
    },
    /// A transparent alias to a base type.
    NewType {
        name: String,
        base: Type,
        comment: Option<String>,
    },
    /// A record with a designated ownership field, rendered as a DAML
    /// template whose signatory clause names that field.
    TemplateType {
        name: String,
        fields: Vec<Field>,
        signatory: String,
        comment: Option<String>,
    },
}

impl Decl {
    /// The declared name, as referenced by `Type::Nominal`.
    pub fn name(&self) -> &str {
        match self {
            Decl::EnumType { name, .. }
            | Decl::RecordType { name, .. }
            | Decl::VariantType { name, .. }
            | Decl::NewType { name, .. }
            | Decl::TemplateType { name, .. } => name,
        }
    }
}

/// One constructor of an enumeration, carrying no payload.
#[derive(Debug, Clone)]
pub struct EnumConstructor {
    /// Tag name, qualified with the type name at render time.
    pub tag: String,
    /// Provenance of the tag in the source schema.
    pub meta: FieldMeta,
    pub comment: Option<String>,
}

/// A named field of a record, template, or variant alternative.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub cardinality: Cardinality,
    pub comment: Option<String>,
    /// Provenance of the field in the source schema.
    pub meta: FieldMeta,
}

/// Opaque provenance carried for traceability, never interpreted by the
/// renderer.
#[derive(Debug, Clone, Default)]
pub struct FieldMeta {
    /// Original schema identifier, before any renaming.
    pub source_name: Option<String>,
    /// Original schema type name, before primitive mapping.
    pub source_type: Option<String>,
}

impl FieldMeta {
    /// Provenance for a field that existed in the source schema.
    pub fn from_source(name: &str, type_name: Option<&str>) -> Self {
        FieldMeta {
            source_name: Some(name.to_string()),
            source_type: type_name.map(str::to_string),
        }
    }
}

/// A type expression in field position.
#[derive(Debug, Clone)]
pub enum Type {
    /// A built-in primitive.
    Prim(PrimitiveKind),
    /// A by-name reference to another declaration in the same module.
    Nominal(String),
    /// An anonymous tuple, the only structural type permitted.
    Product(Vec<Field>),
    /// Reserved: an anonymous enumeration. Has no nominal identity, so
    /// rendering it is a hard error.
    Enum(Vec<EnumConstructor>),
    /// Reserved: an anonymous sum. Has no nominal identity, so rendering
    /// it is a hard error.
    Sum(Vec<Field>),
}

/// The closed set of primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Text,
    Bool,
    Integer,
    Decimal,
    Time,
    Date,
    Unit,
    Party,
}

/// Occurrence bounds of a field, collapsed to a 2x2 lattice.
///
/// Not a numeric range: only optionality (lower) and repetition (upper)
/// survive into the model. The upper bound dominates at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cardinality {
    pub lower: Lower,
    pub upper: Upper,
}

/// Lower occurrence bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lower {
    Zero,
    One,
}

/// Upper occurrence bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upper {
    ToOne,
    ToMany,
}

impl Cardinality {
    /// Exactly one occurrence: rendered as the bare type.
    pub const fn required() -> Self {
        Cardinality {
            lower: Lower::One,
            upper: Upper::ToOne,
        }
    }

    /// Zero or one occurrence: rendered as `Optional`.
    pub const fn optional() -> Self {
        Cardinality {
            lower: Lower::Zero,
            upper: Upper::ToOne,
        }
    }

    /// Any repeated occurrence: rendered as a list regardless of lower
    /// bound.
    pub const fn repeated() -> Self {
        Cardinality {
            lower: Lower::Zero,
            upper: Upper::ToMany,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decl_name() {
        let decl = Decl::RecordType {
            name: "Trade".into(),
            fields: vec![],
            comment: None,
        };
        assert_eq!(decl.name(), "Trade");

        let decl = Decl::NewType {
            name: "Quantity".into(),
            base: Type::Prim(PrimitiveKind::Decimal),
            comment: None,
        };
        assert_eq!(decl.name(), "Quantity");
    }

    #[test]
    fn test_cardinality_lattice() {
        assert_eq!(
            Cardinality::required(),
            Cardinality {
                lower: Lower::One,
                upper: Upper::ToOne
            }
        );
        assert_eq!(
            Cardinality::optional(),
            Cardinality {
                lower: Lower::Zero,
                upper: Upper::ToOne
            }
        );
        assert_eq!(Cardinality::repeated().upper, Upper::ToMany);
    }
}
