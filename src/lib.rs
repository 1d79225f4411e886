//! # schemacast
//!
//! Validation and casting of JSON-like values against composable schemas.
//!
//! A schema is a tree of validators, built programmatically or from a
//! JSON-Schema-flavored document. Validating a value yields either the cast
//! value (numeric strings to numbers, boolean spellings to booleans, property
//! defaults filled in) or a structured failure naming the violated keyword
//! and where it happened.
//!
//! ## Features
//!
//! - Leaf kinds: string, number, integer, unsigned integer, boolean, null,
//!   date, datetime, enum, url, username, uuid
//! - Structural kinds: object and array, with complete failure aggregation
//! - Composition: `anyOf`, `allOf`, `oneOf`, plus `not` on every kind
//! - Document round-trip: build from a schema document, export it back
//! - Custom types through a registry
//!
//! ## Example
//!
//! ```rust
//! use schemacast::{SchemaBuilder, Validator};
//! use serde_json::json;
//!
//! let schema = SchemaBuilder::new().build(&json!({
//!     "type": "object",
//!     "properties": {
//!         "name": {"type": "string", "minLength": 2},
//!         "age": {"type": "unsignedinteger"}
//!     },
//!     "required": ["name"]
//! }))?;
//!
//! let value = schema.parse(&json!({"name": "Ada", "age": "36"}))?;
//! assert_eq!(value, json!({"name": "Ada", "age": 36}));
//! # Ok::<(), schemacast::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;
pub mod locations;

// Resource loading
pub mod loaders;

// Validators
pub mod validators;

// Re-exports for convenience
pub use error::{Error, Result, SchemaError, ValidationError};
pub use limits::Limits;
pub use loaders::{Loader, Source};
pub use locations::InstancePath;
pub use validators::{
    build_validator, register_validator, register_validator_type, ArrayValidator,
    BooleanValidator, CompositionValidator, Compositor, DateValidator, DatetimeValidator,
    EnumValidator, Failure, FailureDetail, FailureKind, IntegerValidator, NullValidator,
    NumberValidator, ObjectValidator, Registry, SchemaBuilder, StringValidator,
    UnsignedIntegerValidator, UrlValidator, UsernameValidator, UuidValidator, ValidationResult,
    Validator, ValidatorRef, WithCommon,
};

/// Version of the schemacast library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
