//! The type model and its DAML renderer.
//!
//! Two-layer split, mirroring the pipeline:
//! 1. `types`: the target-agnostic type model built by the normalizer
//! 2. `render`: type model -> DAML source strings via the `Emit` trait
//!
//! `util` holds the word-wrapping and comment-formatting helpers shared by
//! the render impls.

pub mod render;
pub mod types;
pub mod util;

pub use render::{Emit, RenderConfig, RenderError};
pub use types::{
    Cardinality, Decl, EnumConstructor, Field, FieldMeta, Import, Lower, Module, PrimitiveKind,
    Type, Upper,
};
