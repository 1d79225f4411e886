//! Validator tree
//!
//! This module contains the validation engine: the [`Validator`] capability,
//! the leaf, structural and composition kinds, and the builders that turn
//! schema documents into validator trees.

// Foundation
pub mod base;
pub mod exceptions;
pub mod helpers;
pub mod validation;

// Keywords and facets
pub mod builtins;
pub mod facets;

// Validator kinds
pub mod arrays;
pub mod groups;
pub mod objects;
pub mod simple_types;

// Document building
pub mod builders;

// Re-exports
pub use arrays::ArrayValidator;
pub use base::{AsValidator, Callback, Common, Validator, ValidatorRef, WithCommon};
pub use builders::{
    build_validator, factory, global_registry, register_validator, register_validator_type,
    BuildContext, Factory, FromDocument, Registry, SchemaBuilder,
};
pub use exceptions::{Failure, FailureDetail, FailureKind};
pub use groups::{CompositionValidator, Compositor};
pub use objects::ObjectValidator;
pub use simple_types::{
    BooleanValidator, DateValidator, DatetimeValidator, EnumValidator, IntegerValidator,
    NullValidator, NumberValidator, StringValidator, UnsignedIntegerValidator, UrlValidator,
    UsernameValidator, UuidValidator,
};
pub use validation::ValidationResult;
