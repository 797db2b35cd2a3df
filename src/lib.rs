//! Rosetta schema to DAML type-declaration generator.
//!
//! Converts a Rosetta-style model of class and enum declarations, with
//! single inheritance, annotations and occurrence bounds, into a DAML
//! module of flat type declarations.
//!
//! # Architecture
//!
//! ```text
//! schema JSON -> RosettaSchema -> Module (type model) -> DAML source
//!    (serde)      (schema.rs)      (normalize.rs)       (model::render)
//! ```
//!
//! The pipeline is one pure batch transformation over immutable inputs:
//! the schema index is built once and shared read-only, the type model is
//! built once, validated, rendered once and discarded. All degradations
//! (missing types, unknown annotations) resolve to documented defaults;
//! hard failures surface as [`GenError`] with no partial output.
//!
//! # Example
//!
//! ```
//! let json = r#"{
//!     "declarations": [
//!         {
//!             "kind": "class",
//!             "name": "Trade",
//!             "fields": [{ "name": "amount", "type": "number" }]
//!         }
//!     ]
//! }"#;
//!
//! let daml = rosetta_daml::generate_from_json("Org.Demo", json).unwrap();
//! assert!(daml.contains("data Trade = Trade with"));
//! assert!(daml.contains("amount : Decimal"));
//! ```

pub mod error;
pub mod generate;
pub mod model;
pub mod normalize;
pub mod schema;

pub use error::GenError;
pub use generate::{generate, generate_from_json, generate_with_config};
pub use model::{Emit, RenderConfig, RenderError};
pub use normalize::normalize_schema;
pub use schema::{RosettaSchema, SchemaIndex};
