//! Normalization from a Rosetta schema to the type model.
//!
//! This module handles all the schema-specific logic:
//! - Inheritance flattening (base members inlined before own members)
//! - Synthetic field injection for domain-significant classes
//! - Primitive dictionary and reserved-name renaming
//! - Cardinality collapse to the 2x2 lattice
//!
//! Conversion never fails on missing or unknown schema details: absent
//! types degrade to Text, unknown annotations are ignored, absent
//! documentation renders nothing. The hard failures (cycles, missing
//! bases, duplicate or unresolved names) are consistency violations caught
//! before rendering.

use std::collections::HashSet;

use tracing::debug;

use crate::error::GenError;
use crate::model::{
    Cardinality, Decl, EnumConstructor, Field, FieldMeta, Lower, Module, PrimitiveKind, Type,
    Upper,
};
use crate::schema::{
    ClassDecl, Declaration, EnumDecl, EnumValueDecl, RosettaSchema, SchemaCardinality,
    SchemaField, SchemaIndex,
};

/// Fixed documentation stamped on every generated module.
pub const MODULE_COMMENT: &str =
    "Generated by rosetta-daml from a Rosetta schema. Do not edit by hand.";

/// Fixed documentation stamped on every tool-inserted field.
pub const SYNTHETIC_FIELD_COMMENT: &str = "Field added by the Rosetta to DAML converter.";

/// Annotation marker for keyed classes and identifier fields.
const KEY: &str = "key";
/// Annotation marker for key-value classes and identifier fields.
const KEY_VALUE: &str = "keyValue";
/// Annotation marker for reference fields.
const REFERENCE: &str = "reference";

/// Schema identifiers that collide with DAML built-in or reserved names,
/// with their safe replacements. Consulted at declaration sites and at
/// every nominal reference so renamed declarations stay referable.
const DECL_RENAMES: &[(&str, &str)] = &[
    ("Event", "EventData"),
    ("Contract", "ContractData"),
    ("Party", "PartyData"),
    ("Product", "ProductData"),
];

/// Field names that collide with DAML keywords.
const FIELD_RENAMES: &[(&str, &str)] = &[("type", "typ"), ("exercise", "exe")];

/// Apply the declaration rename table; identity for safe names.
fn rename_decl(name: &str) -> String {
    DECL_RENAMES
        .iter()
        .find(|(from, _)| *from == name)
        .map_or_else(|| name.to_string(), |(_, to)| (*to).to_string())
}

/// Apply the field rename table; identity for safe names.
fn rename_field(name: &str) -> String {
    FIELD_RENAMES
        .iter()
        .find(|(from, _)| *from == name)
        .map_or_else(|| name.to_string(), |(_, to)| (*to).to_string())
}

/// What makes a class eligible for synthetic augmentation.
enum Trigger {
    ClassName(&'static str),
    Annotation(&'static str),
}

/// A synthetic field prepended to a flattened class.
struct Synthetic {
    trigger: Trigger,
    name: &'static str,
    prim: PrimitiveKind,
    cardinality: Cardinality,
}

/// Domain-significant names and markers that gain tool-inserted fields.
/// Kept as a table rather than scattered conditionals so the special cases
/// stay auditable in one place. First match wins.
const SYNTHETIC_FIELDS: &[Synthetic] = &[
    Synthetic {
        trigger: Trigger::ClassName("Party"),
        name: "party",
        prim: PrimitiveKind::Party,
        cardinality: Cardinality::required(),
    },
    Synthetic {
        trigger: Trigger::ClassName("MessageInformation"),
        name: "parties",
        prim: PrimitiveKind::Party,
        cardinality: Cardinality::repeated(),
    },
    Synthetic {
        trigger: Trigger::Annotation(KEY),
        name: "rosettaKey",
        prim: PrimitiveKind::Text,
        cardinality: Cardinality::required(),
    },
    Synthetic {
        trigger: Trigger::Annotation(KEY_VALUE),
        name: "rosettaKeyValue",
        prim: PrimitiveKind::Text,
        cardinality: Cardinality::required(),
    },
];

fn synthetic_for(class: &ClassDecl) -> Option<&'static Synthetic> {
    SYNTHETIC_FIELDS.iter().find(|s| match s.trigger {
        Trigger::ClassName(name) => class.name == name,
        Trigger::Annotation(marker) => class.has_annotation(marker),
    })
}

impl Synthetic {
    fn to_field(&self) -> Field {
        Field {
            name: self.name.to_string(),
            ty: Type::Prim(self.prim),
            cardinality: self.cardinality,
            comment: Some(SYNTHETIC_FIELD_COMMENT.to_string()),
            meta: FieldMeta::default(),
        }
    }
}

/// The fixed schema-primitive dictionary.
///
/// `time` degrades to Text because DAML has no pure time-of-day primitive;
/// the calculation-like Rosetta basic types are textual by definition.
fn primitive_for(type_name: &str) -> Option<PrimitiveKind> {
    match type_name {
        "int" => Some(PrimitiveKind::Integer),
        "number" => Some(PrimitiveKind::Decimal),
        "boolean" => Some(PrimitiveKind::Bool),
        "string" => Some(PrimitiveKind::Text),
        "date" => Some(PrimitiveKind::Date),
        "time" => Some(PrimitiveKind::Text),
        "dateTime" | "zonedDateTime" => Some(PrimitiveKind::Time),
        "calculation" | "eventType" | "productType" => Some(PrimitiveKind::Text),
        "party" => Some(PrimitiveKind::Party),
        _ => None,
    }
}

/// Normalize a schema into a single flat module.
///
/// Builds the lookup index (validating base-chains), flattens every class
/// and enum, and checks module-level consistency before handing the model
/// to the renderer.
pub fn normalize_schema(module_name: &str, schema: &RosettaSchema) -> Result<Module, GenError> {
    let index = SchemaIndex::build(schema)?;

    let mut decls = Vec::new();
    for decl in &schema.declarations {
        match decl {
            Declaration::Class(class) => decls.push(normalize_class(class, &index)),
            Declaration::Enum(en) => decls.push(normalize_enum(en, &index)),
            Declaration::Other => {
                debug!("skipping uninterpreted declaration kind");
            }
        }
    }

    let module = Module {
        name: module_name.to_string(),
        imports: Vec::new(),
        decls,
        comment: Some(MODULE_COMMENT.to_string()),
    };
    validate_module(&module)?;

    debug!(
        module = %module.name,
        decls = module.decls.len(),
        "normalized schema into type model"
    );
    Ok(module)
}

/// Flatten a class chain into base-to-derived field order. Memo-free:
/// bases re-flatten on each access, which is fine because depth is bounded
/// and the index guarantees acyclicity.
fn flattened_class_fields<'a>(
    class: &'a ClassDecl,
    index: &SchemaIndex<'a>,
) -> Vec<&'a SchemaField> {
    let mut fields = Vec::new();
    if let Some(base) = class.super_type.as_deref()
        && let Some(base_class) = index.class(base)
    {
        fields.extend(flattened_class_fields(base_class, index));
    }
    fields.extend(class.fields.iter());
    fields
}

/// Flatten an enum chain into base-to-derived value order.
fn flattened_enum_values<'a>(
    en: &'a EnumDecl,
    index: &SchemaIndex<'a>,
) -> Vec<&'a EnumValueDecl> {
    let mut values = Vec::new();
    if let Some(base) = en.super_type.as_deref()
        && let Some(base_enum) = index.enumeration(base)
    {
        values.extend(flattened_enum_values(base_enum, index));
    }
    values.extend(en.values.iter());
    values
}

fn normalize_class(class: &ClassDecl, index: &SchemaIndex<'_>) -> Decl {
    let mut fields = Vec::new();

    if let Some(synthetic) = synthetic_for(class) {
        fields.push(synthetic.to_field());
    }

    for schema_field in flattened_class_fields(class, index) {
        // A never-present field contributes nothing to the output type.
        if schema_field.cardinality.is_never_present() {
            continue;
        }
        fields.push(convert_field(schema_field));
    }

    Decl::RecordType {
        name: rename_decl(&class.name),
        fields,
        comment: class.definition.clone(),
    }
}

fn normalize_enum(en: &EnumDecl, index: &SchemaIndex<'_>) -> Decl {
    let constructors = flattened_enum_values(en, index)
        .into_iter()
        .map(|value| EnumConstructor {
            tag: value.name.clone(),
            meta: FieldMeta::from_source(&value.name, None),
            comment: value.definition.clone(),
        })
        .collect();

    Decl::EnumType {
        name: rename_decl(&en.name),
        constructors,
        comment: en.definition.clone(),
    }
}

fn convert_field(schema_field: &SchemaField) -> Field {
    Field {
        name: rename_field(&schema_field.name),
        ty: convert_type(schema_field),
        cardinality: convert_cardinality(&schema_field.cardinality),
        comment: schema_field.definition.clone(),
        meta: FieldMeta::from_source(&schema_field.name, schema_field.type_name.as_deref()),
    }
}

fn convert_type(schema_field: &SchemaField) -> Type {
    // Identifier-like fields are always textual in DAML, whatever their
    // nominal declared type.
    if schema_field.has_annotation(KEY)
        || schema_field.has_annotation(KEY_VALUE)
        || schema_field.has_annotation(REFERENCE)
    {
        return Type::Prim(PrimitiveKind::Text);
    }

    match schema_field.type_name.as_deref() {
        // Absence of type information never fails conversion.
        None => Type::Prim(PrimitiveKind::Text),
        Some(name) => match primitive_for(name) {
            Some(prim) => Type::Prim(prim),
            None => Type::Nominal(rename_decl(name)),
        },
    }
}

fn convert_cardinality(c: &SchemaCardinality) -> Cardinality {
    Cardinality {
        lower: if c.lower == 0 { Lower::Zero } else { Lower::One },
        upper: match c.upper {
            Some(1) => Upper::ToOne,
            _ => Upper::ToMany,
        },
    }
}

/// Module-level consistency checks, run once after normalization.
///
/// Violations are programming errors given a well-formed schema, but they
/// must surface as hard, diagnosable failures naming the offender, never
/// as silently dropped or re-renamed declarations.
fn validate_module(module: &Module) -> Result<(), GenError> {
    let mut names: HashSet<&str> = HashSet::new();
    for decl in &module.decls {
        if !names.insert(decl.name()) {
            return Err(GenError::DuplicateDeclaration(decl.name().to_string()));
        }
    }

    for decl in &module.decls {
        match decl {
            Decl::RecordType { fields, .. }
            | Decl::VariantType {
                alternatives: fields,
                ..
            }
            | Decl::TemplateType { fields, .. } => {
                for field in fields {
                    check_references(&field.ty, &names, module)?;
                }
            }
            Decl::NewType { base, .. } => check_references(base, &names, module)?,
            Decl::EnumType { .. } => {}
        }
    }
    Ok(())
}

fn check_references(
    ty: &Type,
    names: &HashSet<&str>,
    module: &Module,
) -> Result<(), GenError> {
    match ty {
        Type::Nominal(name) if !names.contains(name.as_str()) => {
            Err(GenError::UnresolvedReference {
                name: name.clone(),
                module: module.name.clone(),
            })
        }
        Type::Product(fields) | Type::Sum(fields) => {
            for field in fields {
                check_references(&field.ty, names, module)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
