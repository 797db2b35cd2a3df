//! DAML source emission via the Emit trait.
//!
//! Each type model node implements `Emit` to produce its DAML string
//! representation. Emission is purely mechanical: all schema logic has been
//! resolved during normalization, so rendering a well-formed module is
//! deterministic. The one hard failure is an anonymous enum or sum type in
//! field position, which has no nominal identity to reference and aborts
//! the whole render rather than producing partial output.

use thiserror::Error;

use super::types::{
    Decl, EnumConstructor, Field, Import, Lower, Module, PrimitiveKind, Type, Upper,
};
use super::util::{CommentPosition, emit_comment, parenthesize};

/// Render-time configuration.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    /// Column width for word-wrapped documentation comments.
    pub width: usize,
    /// Line-spacing multiplier for wrapped comments; 1 means no blank
    /// comment lines between wrapped lines.
    pub line_spacing: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: 80,
            line_spacing: 1,
        }
    }
}

/// A failure during emission. No partial output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// An anonymous enum or sum type appeared in field position.
    #[error("anonymous {kind} type has no declaration to reference and cannot be rendered")]
    AnonymousType { kind: &'static str },
}

/// Trait for emitting DAML source from type model nodes.
pub trait Emit {
    /// Convert the node to its DAML string representation.
    fn emit(&self, cfg: &RenderConfig) -> Result<String, RenderError>;
}

impl PrimitiveKind {
    /// The DAML built-in type token for this primitive. Tokens are unique
    /// across the closed set.
    pub fn token(&self) -> &'static str {
        match self {
            PrimitiveKind::Text => "Text",
            PrimitiveKind::Bool => "Bool",
            PrimitiveKind::Integer => "Int",
            PrimitiveKind::Decimal => "Decimal",
            PrimitiveKind::Time => "Time",
            PrimitiveKind::Date => "Date",
            PrimitiveKind::Unit => "()",
            PrimitiveKind::Party => "Party",
        }
    }
}

impl Emit for Type {
    fn emit(&self, cfg: &RenderConfig) -> Result<String, RenderError> {
        match self {
            Type::Prim(p) => Ok(p.token().to_string()),
            Type::Nominal(name) => Ok(name.clone()),
            Type::Product(fields) => {
                // The structural tuple keeps one type per named field; the
                // field names themselves only survive in metadata.
                let parts = fields
                    .iter()
                    .map(|f| shaped_type(f, cfg))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("({})", parts.join(", ")))
            }
            Type::Enum(_) => Err(RenderError::AnonymousType { kind: "enum" }),
            Type::Sum(_) => Err(RenderError::AnonymousType { kind: "sum" }),
        }
    }
}

/// Render a field's type shaped by its cardinality.
///
/// The upper bound dominates: any repeated field is a list regardless of
/// its lower bound. Only a non-repeated, optional field wraps in
/// `Optional`.
pub fn shaped_type(field: &Field, cfg: &RenderConfig) -> Result<String, RenderError> {
    let inner = field.ty.emit(cfg)?;
    Ok(match field.cardinality.upper {
        Upper::ToMany => format!("[{inner}]"),
        Upper::ToOne => match field.cardinality.lower {
            Lower::Zero => format!("Optional {}", parenthesize(inner)),
            Lower::One => inner,
        },
    })
}

impl Emit for Import {
    fn emit(&self, _cfg: &RenderConfig) -> Result<String, RenderError> {
        Ok(match self {
            Import::Unqualified(module) => format!("import {module}\n"),
            Import::Qualified(module, alias) => {
                format!("import qualified {module} as {alias}\n")
            }
        })
    }
}

/// Fixed capability derivation for value types.
const DERIVING: &str = "  deriving (Eq, Ord, Show)\n";

impl Emit for Decl {
    fn emit(&self, cfg: &RenderConfig) -> Result<String, RenderError> {
        match self {
            Decl::EnumType {
                name,
                constructors,
                comment,
            } => Ok(emit_enum(name, constructors, comment.as_deref(), cfg)),
            Decl::RecordType {
                name,
                fields,
                comment,
            } => emit_record(name, fields, comment.as_deref(), cfg),
            Decl::VariantType {
                name,
                alternatives,
                comment,
            } => emit_variant(name, alternatives, comment.as_deref(), cfg),
            Decl::NewType {
                name,
                base,
                comment,
            } => emit_newtype(name, base, comment.as_deref(), cfg),
            Decl::TemplateType {
                name,
                fields,
                signatory,
                comment,
            } => emit_template(name, fields, signatory, comment.as_deref(), cfg),
            // Forward compatibility: a declaration shape with no DAML
            // rendering degrades to a diagnostic comment, never a panic.
            #[allow(unreachable_patterns)]
            other => Ok(format!("-- unsupported declaration: {}\n", other.name())),
        }
    }
}

fn emit_enum(
    name: &str,
    constructors: &[EnumConstructor],
    comment: Option<&str>,
    cfg: &RenderConfig,
) -> String {
    let mut out = String::new();
    if let Some(doc) = comment {
        out.push_str(&emit_comment(doc, CommentPosition::Before, "", cfg));
    }
    out.push_str(&format!("data {name}\n"));

    if constructors.is_empty() {
        out.push_str(&format!("  = {name}\n"));
    }
    for (i, con) in constructors.iter().enumerate() {
        if let Some(doc) = &con.comment {
            out.push_str(&emit_comment(doc, CommentPosition::Before, "  ", cfg));
        }
        let sep = if i == 0 { '=' } else { '|' };
        out.push_str(&format!("  {sep} {name}_{} ()\n", con.tag));
    }
    out.push_str(DERIVING);
    out
}

fn emit_record(
    name: &str,
    fields: &[Field],
    comment: Option<&str>,
    cfg: &RenderConfig,
) -> Result<String, RenderError> {
    let mut out = String::new();
    if let Some(doc) = comment {
        out.push_str(&emit_comment(doc, CommentPosition::Before, "", cfg));
    }

    if fields.is_empty() {
        // A fieldless `with` block does not parse; degrade to a nullary
        // constructor.
        out.push_str(&format!("data {name} = {name}\n"));
    } else {
        out.push_str(&format!("data {name} = {name} with\n"));
        for field in fields {
            out.push_str(&emit_record_field(field, "    ", cfg)?);
        }
    }
    out.push_str(DERIVING);
    Ok(out)
}

fn emit_record_field(
    field: &Field,
    indent: &str,
    cfg: &RenderConfig,
) -> Result<String, RenderError> {
    let mut out = format!("{indent}{} : {}\n", field.name, shaped_type(field, cfg)?);
    if let Some(doc) = &field.comment {
        let doc_indent = format!("{indent}  ");
        out.push_str(&emit_comment(doc, CommentPosition::After, &doc_indent, cfg));
    }
    Ok(out)
}

fn emit_variant(
    name: &str,
    alternatives: &[Field],
    comment: Option<&str>,
    cfg: &RenderConfig,
) -> Result<String, RenderError> {
    let mut out = String::new();
    if let Some(doc) = comment {
        out.push_str(&emit_comment(doc, CommentPosition::Before, "", cfg));
    }
    out.push_str(&format!("data {name}\n"));

    if alternatives.is_empty() {
        // Degenerate placeholder; arguably this should be an error, kept
        // as a documented gap.
        out.push_str(&format!("  = {name}\n"));
    }
    for (i, alt) in alternatives.iter().enumerate() {
        if let Some(doc) = &alt.comment {
            out.push_str(&emit_comment(doc, CommentPosition::Before, "  ", cfg));
        }
        let sep = if i == 0 { '=' } else { '|' };
        let payload = parenthesize(shaped_type(alt, cfg)?);
        out.push_str(&format!("  {sep} {name}_{} {payload}\n", alt.name));
    }
    out.push_str(DERIVING);
    Ok(out)
}

fn emit_newtype(
    name: &str,
    base: &Type,
    comment: Option<&str>,
    cfg: &RenderConfig,
) -> Result<String, RenderError> {
    let mut out = String::new();
    if let Some(doc) = comment {
        out.push_str(&emit_comment(doc, CommentPosition::Before, "", cfg));
    }
    // Transparent alias, not a nominal wrapper.
    out.push_str(&format!("type {name} = {}\n", base.emit(cfg)?));
    Ok(out)
}

fn emit_template(
    name: &str,
    fields: &[Field],
    signatory: &str,
    comment: Option<&str>,
    cfg: &RenderConfig,
) -> Result<String, RenderError> {
    let mut out = String::new();
    if let Some(doc) = comment {
        out.push_str(&emit_comment(doc, CommentPosition::Before, "", cfg));
    }
    out.push_str(&format!("template {name}\n"));
    out.push_str("  with\n");
    for field in fields {
        out.push_str(&emit_record_field(field, "    ", cfg)?);
    }
    out.push_str("  where\n");
    out.push_str(&format!("    signatory {signatory}\n"));
    Ok(out)
}

impl Emit for Module {
    fn emit(&self, cfg: &RenderConfig) -> Result<String, RenderError> {
        let mut out = String::from("daml 1.2\n\n");

        if let Some(doc) = &self.comment {
            out.push_str(&emit_comment(doc, CommentPosition::Before, "", cfg));
        }
        out.push_str(&format!("module {} where\n", self.name));

        if !self.imports.is_empty() {
            out.push('\n');
            for import in &self.imports {
                out.push_str(&import.emit(cfg)?);
            }
        }

        for decl in &self.decls {
            out.push('\n');
            out.push_str(&decl.emit(cfg)?);
        }

        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::types::{Cardinality, FieldMeta};
    use std::collections::HashSet;

    fn field(name: &str, ty: Type, cardinality: Cardinality) -> Field {
        Field {
            name: name.into(),
            ty,
            cardinality,
            comment: None,
            meta: FieldMeta::default(),
        }
    }

    fn cfg() -> RenderConfig {
        RenderConfig::default()
    }

    #[test]
    fn test_primitive_tokens_unique() {
        let prims = [
            PrimitiveKind::Text,
            PrimitiveKind::Bool,
            PrimitiveKind::Integer,
            PrimitiveKind::Decimal,
            PrimitiveKind::Time,
            PrimitiveKind::Date,
            PrimitiveKind::Unit,
            PrimitiveKind::Party,
        ];
        let tokens: HashSet<_> = prims.iter().map(|p| p.token()).collect();
        assert_eq!(tokens.len(), prims.len());
        assert_eq!(PrimitiveKind::Integer.token(), "Int");
        assert_eq!(PrimitiveKind::Unit.token(), "()");
    }

    #[test]
    fn test_shaped_type_lattice() {
        let bare = field("a", Type::Prim(PrimitiveKind::Text), Cardinality::required());
        assert_eq!(shaped_type(&bare, &cfg()).unwrap(), "Text");

        let opt = field("a", Type::Prim(PrimitiveKind::Text), Cardinality::optional());
        assert_eq!(shaped_type(&opt, &cfg()).unwrap(), "Optional Text");

        let many = field("a", Type::Prim(PrimitiveKind::Text), Cardinality::repeated());
        assert_eq!(shaped_type(&many, &cfg()).unwrap(), "[Text]");

        // (One, ToMany) renders identically to (Zero, ToMany): the upper
        // bound dominates.
        let one_many = field(
            "a",
            Type::Prim(PrimitiveKind::Text),
            Cardinality {
                lower: Lower::One,
                upper: Upper::ToMany,
            },
        );
        assert_eq!(shaped_type(&one_many, &cfg()).unwrap(), "[Text]");
    }

    #[test]
    fn test_product_type_render() {
        let ty = Type::Product(vec![
            field("px", Type::Prim(PrimitiveKind::Decimal), Cardinality::required()),
            field("ccy", Type::Prim(PrimitiveKind::Text), Cardinality::optional()),
        ]);
        assert_eq!(ty.emit(&cfg()).unwrap(), "(Decimal, Optional Text)");
    }

    #[test]
    fn test_anonymous_enum_fails_hard() {
        let ty = Type::Enum(vec![]);
        assert_eq!(
            ty.emit(&cfg()),
            Err(RenderError::AnonymousType { kind: "enum" })
        );

        let ty = Type::Sum(vec![]);
        assert_eq!(
            ty.emit(&cfg()),
            Err(RenderError::AnonymousType { kind: "sum" })
        );
    }

    #[test]
    fn test_anonymous_type_aborts_whole_module() {
        let module = Module {
            name: "Broken".into(),
            imports: vec![],
            decls: vec![Decl::RecordType {
                name: "Holder".into(),
                fields: vec![field("bad", Type::Sum(vec![]), Cardinality::required())],
                comment: None,
            }],
            comment: None,
        };
        assert!(module.emit(&cfg()).is_err());
    }

    #[test]
    fn test_enum_render() {
        let decl = Decl::EnumType {
            name: "Status".into(),
            constructors: vec![
                EnumConstructor {
                    tag: "Pending".into(),
                    meta: FieldMeta::default(),
                    comment: None,
                },
                EnumConstructor {
                    tag: "Closed".into(),
                    meta: FieldMeta::default(),
                    comment: None,
                },
            ],
            comment: None,
        };
        let expected = "data Status\n  = Status_Pending ()\n  | Status_Closed ()\n  deriving (Eq, Ord, Show)\n";
        assert_eq!(decl.emit(&cfg()).unwrap(), expected);
    }

    #[test]
    fn test_enum_constructor_comment() {
        let decl = Decl::EnumType {
            name: "Status".into(),
            constructors: vec![EnumConstructor {
                tag: "Pending".into(),
                meta: FieldMeta::default(),
                comment: Some("Awaiting confirmation.".into()),
            }],
            comment: None,
        };
        let out = decl.emit(&cfg()).unwrap();
        assert!(out.contains("  -- | Awaiting confirmation.\n  = Status_Pending ()"));
    }

    #[test]
    fn test_record_render() {
        let decl = Decl::RecordType {
            name: "Trade".into(),
            fields: vec![
                field("amount", Type::Prim(PrimitiveKind::Decimal), Cardinality::required()),
                field("notes", Type::Prim(PrimitiveKind::Text), Cardinality::optional()),
                field("legs", Type::Nominal("Leg".into()), Cardinality::repeated()),
            ],
            comment: Some("A trade.".into()),
        };
        let expected = "-- | A trade.\n\
                        data Trade = Trade with\n    \
                        amount : Decimal\n    \
                        notes : Optional Text\n    \
                        legs : [Leg]\n  \
                        deriving (Eq, Ord, Show)\n";
        assert_eq!(decl.emit(&cfg()).unwrap(), expected);
    }

    #[test]
    fn test_record_field_comment_after() {
        let mut f = field("amount", Type::Prim(PrimitiveKind::Decimal), Cardinality::required());
        f.comment = Some("Notional amount.".into());
        let decl = Decl::RecordType {
            name: "Trade".into(),
            fields: vec![f],
            comment: None,
        };
        let out = decl.emit(&cfg()).unwrap();
        assert!(out.contains("    amount : Decimal\n      -- ^ Notional amount.\n"));
    }

    #[test]
    fn test_empty_record_render() {
        let decl = Decl::RecordType {
            name: "Marker".into(),
            fields: vec![],
            comment: None,
        };
        assert_eq!(
            decl.emit(&cfg()).unwrap(),
            "data Marker = Marker\n  deriving (Eq, Ord, Show)\n"
        );
    }

    #[test]
    fn test_variant_render_qualifies_constructors() {
        let decl = Decl::VariantType {
            name: "Instrument".into(),
            alternatives: vec![
                field("Bond", Type::Nominal("Bond".into()), Cardinality::required()),
                field("Note", Type::Prim(PrimitiveKind::Text), Cardinality::optional()),
            ],
            comment: None,
        };
        let out = decl.emit(&cfg()).unwrap();
        assert!(out.contains("  = Instrument_Bond Bond\n"));
        // Composite payload gets parenthesized in constructor position
        assert!(out.contains("  | Instrument_Note (Optional Text)\n"));
    }

    #[test]
    fn test_empty_variant_placeholder() {
        let decl = Decl::VariantType {
            name: "Unknown".into(),
            alternatives: vec![],
            comment: None,
        };
        assert_eq!(
            decl.emit(&cfg()).unwrap(),
            "data Unknown\n  = Unknown\n  deriving (Eq, Ord, Show)\n"
        );
    }

    #[test]
    fn test_newtype_render() {
        let decl = Decl::NewType {
            name: "Quantity".into(),
            base: Type::Prim(PrimitiveKind::Decimal),
            comment: None,
        };
        assert_eq!(decl.emit(&cfg()).unwrap(), "type Quantity = Decimal\n");
    }

    #[test]
    fn test_template_render() {
        let decl = Decl::TemplateType {
            name: "Agreement".into(),
            fields: vec![
                field("owner", Type::Prim(PrimitiveKind::Party), Cardinality::required()),
                field("terms", Type::Prim(PrimitiveKind::Text), Cardinality::required()),
            ],
            signatory: "owner".into(),
            comment: None,
        };
        let expected = "template Agreement\n  with\n    \
                        owner : Party\n    \
                        terms : Text\n  \
                        where\n    signatory owner\n";
        assert_eq!(decl.emit(&cfg()).unwrap(), expected);
    }

    #[test]
    fn test_module_render() {
        let module = Module {
            name: "Org.Demo".into(),
            imports: vec![
                Import::Unqualified("Org.Base".into()),
                Import::Qualified("Org.Util".into(), "U".into()),
            ],
            decls: vec![
                Decl::NewType {
                    name: "Id".into(),
                    base: Type::Prim(PrimitiveKind::Text),
                    comment: None,
                },
                Decl::RecordType {
                    name: "Thing".into(),
                    fields: vec![field("id", Type::Nominal("Id".into()), Cardinality::required())],
                    comment: None,
                },
            ],
            comment: Some("Generated module.".into()),
        };
        let out = module.emit(&cfg()).unwrap();
        let expected = "daml 1.2\n\n\
                        -- | Generated module.\n\
                        module Org.Demo where\n\n\
                        import Org.Base\n\
                        import qualified Org.Util as U\n\n\
                        type Id = Text\n\n\
                        data Thing = Thing with\n    \
                        id : Id\n  \
                        deriving (Eq, Ord, Show)\n";
        assert_eq!(out, expected);
    }
}
