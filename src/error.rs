//! Error types for the conversion pipeline.
//!
//! Missing type information, unknown annotations and absent comments are
//! not errors: they degrade to documented defaults during normalization.
//! Everything here is a hard failure that aborts the conversion with no
//! partial output.

use thiserror::Error;

use crate::model::RenderError;

/// A hard failure anywhere in the schema-to-DAML pipeline.
#[derive(Debug, Error)]
pub enum GenError {
    /// The input document is not a valid schema.
    #[error("failed to parse schema: {0}")]
    Parse(#[from] serde_json::Error),

    /// A class or enum is its own ancestor. Flattening would not
    /// terminate, so this is rejected when the lookup index is built.
    #[error("cyclic inheritance chain involving '{0}'")]
    CyclicInheritance(String),

    /// A declaration names a base that is not declared anywhere in the
    /// schema.
    #[error("'{name}' extends undeclared base '{base}'")]
    MissingBase { name: String, base: String },

    /// Two declarations map to the same name after reserved-word renaming.
    #[error("duplicate declaration name '{0}' after renaming")]
    DuplicateDeclaration(String),

    /// A nominal type reference does not resolve to any declaration in
    /// the module.
    #[error("type reference '{name}' does not resolve to any declaration in module '{module}'")]
    UnresolvedReference { name: String, module: String },

    /// Rendering failed; see [`RenderError`].
    #[error(transparent)]
    Render(#[from] RenderError),
}
