//! Schema document builders
//!
//! This module turns schema documents into validator trees. A [`Registry`]
//! maps `type` names to factories; [`SchemaBuilder`] walks a document,
//! resolving every node once, so validation never looks a type up again.
//!
//! A process-wide registry holds the built-in kinds plus anything added with
//! [`register_validator`]. Builders created with [`SchemaBuilder::new`] take a
//! snapshot of it; [`SchemaBuilder::with_registry`] injects an explicit one.

use super::arrays::ArrayValidator;
use super::base::{Validator, ValidatorRef};
use super::builtins::*;
use super::groups::CompositionValidator;
use super::objects::ObjectValidator;
use super::simple_types::{
    BooleanValidator, DateValidator, DatetimeValidator, EnumValidator, IntegerValidator,
    NullValidator, NumberValidator, StringValidator, UnsignedIntegerValidator, UrlValidator,
    UsernameValidator, UuidValidator,
};
use crate::error::{Error, Result, SchemaError};
use crate::limits::Limits;
use crate::loaders::Loader;
use crate::locations::escape;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde_json::{Map, Number, Value};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Builds one validator from the schema document of a node
pub type Factory =
    Arc<dyn Fn(&Map<String, Value>, &mut BuildContext<'_>) -> Result<ValidatorRef> + Send + Sync>;

/// Construction from a schema document node
pub trait FromDocument: Sized {
    /// Build from the keywords of `document`; child documents are built
    /// through `ctx`
    fn from_document(document: &Map<String, Value>, ctx: &mut BuildContext<'_>) -> Result<Self>;
}

/// Factory for a validator kind implementing [`FromDocument`]
pub fn factory<T>() -> Factory
where
    T: FromDocument + Validator + 'static,
{
    Arc::new(
        |document: &Map<String, Value>, ctx: &mut BuildContext<'_>| -> Result<ValidatorRef> {
            Ok(Arc::new(T::from_document(document, ctx)?))
        },
    )
}

// =============================================================================
// Registry
// =============================================================================

/// Mapping from schema `type` names to factories
#[derive(Clone, Default)]
pub struct Registry {
    factories: IndexMap<String, Factory>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in kind
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.insert(TYPE_STRING, factory::<StringValidator>());
        registry.insert(TYPE_NUMBER, factory::<NumberValidator>());
        registry.insert(TYPE_INTEGER, factory::<IntegerValidator>());
        registry.insert(TYPE_UNSIGNED_INTEGER, factory::<UnsignedIntegerValidator>());
        registry.insert(TYPE_BOOLEAN, factory::<BooleanValidator>());
        registry.insert(TYPE_NULL, factory::<NullValidator>());
        registry.insert(TYPE_DATE, factory::<DateValidator>());
        registry.insert(TYPE_DATETIME, factory::<DatetimeValidator>());
        registry.insert(TYPE_ENUM, factory::<EnumValidator>());
        registry.insert(TYPE_URL, factory::<UrlValidator>());
        registry.insert(TYPE_USERNAME, factory::<UsernameValidator>());
        registry.insert(TYPE_UUID, factory::<UuidValidator>());
        registry.insert(TYPE_OBJECT, factory::<ObjectValidator>());
        registry.insert(TYPE_ARRAY, factory::<ArrayValidator>());
        registry
    }

    fn insert(&mut self, name: &str, factory: Factory) -> Option<Factory> {
        self.factories.insert(name.to_string(), factory)
    }

    /// Register a factory, replacing any previous one for `name`
    pub fn register(&mut self, name: impl Into<String>, factory: Factory) -> &mut Self {
        let name = name.into();
        if self.insert(&name, factory).is_some() {
            warn!(type_name = %name, "replacing registered validator type");
        }
        self
    }

    /// Register a kind implementing [`FromDocument`]
    pub fn register_type<T>(&mut self, name: impl Into<String>) -> &mut Self
    where
        T: FromDocument + Validator + 'static,
    {
        self.register(name, factory::<T>())
    }

    /// Factory registered under exactly `name`
    pub fn get(&self, name: &str) -> Option<&Factory> {
        self.factories.get(name)
    }

    /// Resolve a type name: exact match first, then by normalized name
    /// (`UnsignedInteger`, `unsigned_integer` and `unsignedIntegerValidator`
    /// all find `unsignedinteger`)
    pub fn resolve(&self, name: &str) -> Option<(&str, &Factory)> {
        if let Some((key, factory)) = self.factories.get_key_value(name) {
            return Some((key.as_str(), factory));
        }
        let wanted = normalize_type_name(name);
        self.factories
            .iter()
            .find(|(key, _)| normalize_type_name(key) == wanted)
            .map(|(key, factory)| (key.as_str(), factory))
    }

    /// Check if `name` resolves to a factory
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Registered type names, in registration order
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if no type is registered
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

static GLOBAL_REGISTRY: Lazy<RwLock<Registry>> =
    Lazy::new(|| RwLock::new(Registry::with_builtins()));

/// Register a validator factory in the process-wide registry
///
/// Intended for setup time; trees built before the call keep the types they
/// were built with.
pub fn register_validator(name: impl Into<String>, factory: Factory) -> Result<()> {
    let mut registry = GLOBAL_REGISTRY
        .write()
        .map_err(|_| Error::Other("validator registry lock poisoned".to_string()))?;
    registry.register(name, factory);
    Ok(())
}

/// Register a kind implementing [`FromDocument`] in the process-wide registry
pub fn register_validator_type<T>(name: impl Into<String>) -> Result<()>
where
    T: FromDocument + Validator + 'static,
{
    register_validator(name, factory::<T>())
}

/// Snapshot of the process-wide registry
pub fn global_registry() -> Registry {
    match GLOBAL_REGISTRY.read() {
        Ok(registry) => registry.clone(),
        // a panicking writer cannot leave a half-inserted entry behind
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

// =============================================================================
// Build Context
// =============================================================================

/// State of one document walk: where the current node sits in the schema
/// document, how deep it is, and how many nodes were built so far
#[derive(Debug)]
pub struct BuildContext<'a> {
    builder: &'a SchemaBuilder,
    location: Vec<String>,
    depth: usize,
    nodes: usize,
}

impl<'a> BuildContext<'a> {
    fn new(builder: &'a SchemaBuilder) -> Self {
        Self {
            builder,
            location: Vec::new(),
            depth: 0,
            nodes: 0,
        }
    }

    /// The builder driving this walk
    pub fn builder(&self) -> &'a SchemaBuilder {
        self.builder
    }

    /// JSON Pointer of the current node inside the schema document
    pub fn location(&self) -> String {
        self.location
            .iter()
            .map(|segment| format!("/{}", escape(segment)))
            .collect()
    }

    /// Nesting depth of the current node (0 for the root); one level per
    /// child schema, however many pointer segments lead to it
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Schema error for `keyword` at the current node
    pub fn error(&self, keyword: &str, message: impl Into<String>) -> Error {
        Error::Schema(
            SchemaError::new(message)
                .with_location(self.location())
                .with_keyword(keyword),
        )
    }

    /// Attach the current location to a constructor's bound error
    pub fn located<T>(&self, result: Result<T>, keyword: &str) -> Result<T> {
        result.map_err(|err| match err {
            Error::Value(message) => self.error(keyword, message),
            other => other,
        })
    }

    /// Optional string keyword
    pub fn get_string(&self, document: &Map<String, Value>, keyword: &str) -> Result<Option<String>> {
        match document.get(keyword) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.error(keyword, format!("'{}' must be a string", keyword))),
        }
    }

    /// Optional boolean keyword
    pub fn get_bool(&self, document: &Map<String, Value>, keyword: &str) -> Result<Option<bool>> {
        match document.get(keyword) {
            None => Ok(None),
            Some(Value::Bool(flag)) => Ok(Some(*flag)),
            Some(_) => Err(self.error(keyword, format!("'{}' must be a boolean", keyword))),
        }
    }

    /// Optional numeric keyword
    pub fn get_number(
        &self,
        document: &Map<String, Value>,
        keyword: &str,
    ) -> Result<Option<Number>> {
        match document.get(keyword) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(Some(n.clone())),
            Some(_) => Err(self.error(keyword, format!("'{}' must be a number", keyword))),
        }
    }

    /// Optional non-negative integer keyword
    pub fn get_usize(&self, document: &Map<String, Value>, keyword: &str) -> Result<Option<usize>> {
        match document.get(keyword) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| {
                    self.error(
                        keyword,
                        format!("'{}' must be a non-negative integer", keyword),
                    )
                }),
        }
    }

    /// Optional list-of-strings keyword
    pub fn get_string_list(
        &self,
        document: &Map<String, Value>,
        keyword: &str,
    ) -> Result<Option<Vec<String>>> {
        let Some(value) = document.get(keyword) else {
            return Ok(None);
        };
        let strings = value.as_array().and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        });
        match strings {
            Some(strings) => Ok(Some(strings)),
            None => Err(self.error(keyword, format!("'{}' must be a list of strings", keyword))),
        }
    }

    /// Build the child document found under `segments` of the current node
    pub fn build_child(&mut self, document: &Value, segments: &[&str]) -> Result<ValidatorRef> {
        let mark = self.location.len();
        self.location.extend(segments.iter().map(|s| s.to_string()));
        self.depth += 1;
        let result = self.build_node(document);
        self.depth -= 1;
        self.location.truncate(mark);
        result
    }

    fn build_node(&mut self, document: &Value) -> Result<ValidatorRef> {
        let builder = self.builder;
        let limits = &builder.limits;
        limits.check_schema_depth(self.depth())?;
        self.nodes += 1;
        limits.check_schema_nodes(self.nodes)?;

        let Value::Object(document) = document else {
            return Err(Error::Schema(
                SchemaError::new("schema node must be an object").with_location(self.location()),
            ));
        };

        match document.get(KW_TYPE) {
            Some(Value::String(name)) => {
                let Some((resolved, factory)) = builder.registry.resolve(name) else {
                    return Err(Error::Type(format!(
                        "unknown schema type '{}' at '{}'",
                        name,
                        self.location()
                    )));
                };
                debug!(
                    type_name = resolved,
                    location = %self.location(),
                    depth = self.depth(),
                    "resolved schema node"
                );
                if builder.deny_unknown_keywords {
                    self.check_keywords(document, admitted_keywords(resolved))?;
                }
                factory(document, self)
            }
            Some(_) => Err(self.error(KW_TYPE, "'type' must be a string")),
            None if COMPOSITION_KEYWORDS.iter().any(|kw| document.contains_key(*kw)) => {
                debug!(
                    location = %self.location(),
                    depth = self.depth(),
                    "resolved composition node"
                );
                if builder.deny_unknown_keywords {
                    self.check_keywords(document, Some(&*COMPOSITION_KEYWORD_SET))?;
                }
                Ok(Arc::new(CompositionValidator::from_document(document, self)?))
            }
            None => Err(self.error(
                KW_TYPE,
                "schema node requires 'type' or one of 'anyOf', 'allOf', 'oneOf'",
            )),
        }
    }

    /// Reject keywords outside the common set and `admitted`; kinds without a
    /// known keyword set (custom types) are not checked
    fn check_keywords(
        &self,
        document: &Map<String, Value>,
        admitted: Option<&std::collections::HashSet<&'static str>>,
    ) -> Result<()> {
        let Some(admitted) = admitted else {
            return Ok(());
        };
        match document
            .keys()
            .find(|key| !COMMON_KEYWORDS.contains(key.as_str()) && !admitted.contains(key.as_str()))
        {
            Some(key) => Err(self.error(key, format!("unknown keyword '{}'", key))),
            None => Ok(()),
        }
    }
}

// =============================================================================
// Schema Builder
// =============================================================================

/// Builds validator trees from schema documents
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    registry: Registry,
    limits: Limits,
    deny_unknown_keywords: bool,
}

impl SchemaBuilder {
    /// Create a builder using a snapshot of the process-wide registry
    pub fn new() -> Self {
        Self::with_registry(global_registry())
    }

    /// Create a builder using an explicit registry
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            limits: Limits::default(),
            deny_unknown_keywords: false,
        }
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Reject keywords a kind does not admit instead of ignoring them
    pub fn with_deny_unknown_keywords(mut self, deny: bool) -> Self {
        self.deny_unknown_keywords = deny;
        self
    }

    /// The registry types are resolved through
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Build a validator tree from a schema document
    pub fn build(&self, document: &Value) -> Result<ValidatorRef> {
        let mut ctx = BuildContext::new(self);
        let validator = ctx.build_node(document)?;
        debug!(nodes = ctx.nodes, "built validator tree");
        Ok(validator)
    }

    /// Build a validator tree from JSON text
    pub fn from_json_str(&self, text: &str) -> Result<ValidatorRef> {
        self.limits.check_document_size(text.len())?;
        let document: Value = serde_json::from_str(text)?;
        self.build(&document)
    }

    /// Build a validator tree from a JSON file
    pub fn from_file(&self, path: impl AsRef<Path>) -> Result<ValidatorRef> {
        let loader = Loader::new().with_limits(self.limits.clone());
        let document = loader.load_path(path)?;
        self.build(&document)
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a validator tree with a default [`SchemaBuilder`]
pub fn build_validator(document: &Value) -> Result<ValidatorRef> {
    SchemaBuilder::new().build(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::base::Common;
    use crate::validators::exceptions::FailureKind;
    use crate::validators::validation::ValidationResult;
    use crate::locations::InstancePath;
    use serde_json::json;

    /// Even integers, as a custom kind
    #[derive(Debug)]
    struct EvenValidator {
        common: Common,
    }

    impl Validator for EvenValidator {
        fn type_name(&self) -> Option<&str> {
            Some("even")
        }

        fn common(&self) -> &Common {
            &self.common
        }

        fn check(&self, value: &Value, path: &InstancePath) -> ValidationResult {
            match value.as_i64() {
                Some(n) if n % 2 == 0 => ValidationResult::success(value.clone()),
                _ => ValidationResult::fail(
                    value.clone(),
                    crate::validators::exceptions::Failure::new(FailureKind::Type, path.to_pointer()),
                ),
            }
        }

        fn export_keywords(&self, _document: &mut Map<String, Value>) {}
    }

    impl FromDocument for EvenValidator {
        fn from_document(document: &Map<String, Value>, ctx: &mut BuildContext<'_>) -> Result<Self> {
            Ok(Self {
                common: Common::from_document(document, ctx)?,
            })
        }
    }

    #[test]
    fn test_builtins_registered() {
        let registry = Registry::with_builtins();
        assert_eq!(registry.len(), BUILTIN_TYPES.len());
        for name in BUILTIN_TYPES {
            assert!(registry.get(name).is_some(), "{name} missing");
        }
    }

    #[test]
    fn test_convention_lookup() {
        let registry = Registry::with_builtins();
        assert_eq!(registry.resolve("UnsignedInteger").map(|(n, _)| n), Some("unsignedinteger"));
        assert_eq!(registry.resolve("date_time").map(|(n, _)| n), Some("datetime"));
        assert_eq!(registry.resolve("StringValidator").map(|(n, _)| n), Some("string"));
        assert!(registry.resolve("decimal").is_none());
    }

    #[test]
    fn test_build_simple() {
        let validator = build_validator(&json!({"type": "integer", "minimum": 1})).unwrap();
        assert_eq!(validator.type_name(), Some("integer"));
        assert_eq!(validator.parse(&json!("3")).unwrap(), json!(3));
        assert!(!validator.is_valid(&json!(0)));
    }

    #[test]
    fn test_unknown_type() {
        let result = build_validator(&json!({"type": "object", "properties": {"a": {"type": "decimal"}}}));
        match result {
            Err(Error::Type(message)) => assert!(message.contains("/properties/a")),
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_type() {
        assert!(matches!(
            build_validator(&json!({"minimum": 1})),
            Err(Error::Schema(_))
        ));
        assert!(matches!(build_validator(&json!("string")), Err(Error::Schema(_))));
    }

    #[test]
    fn test_composition_without_type() {
        let validator = build_validator(&json!({
            "anyOf": [{"type": "null"}, {"type": "string"}]
        }))
        .unwrap();
        assert_eq!(validator.type_name(), None);
        assert!(validator.is_valid(&json!(null)));
        assert!(!validator.is_valid(&json!(1)));

        assert!(build_validator(&json!({"oneOf": []})).is_err());
        assert!(build_validator(&json!({"anyOf": [{"type": "null"}], "allOf": [{"type": "null"}]})).is_err());
    }

    #[test]
    fn test_invalid_bounds_located() {
        let result = build_validator(&json!({
            "type": "array",
            "items": {"type": "string", "minLength": 5, "maxLength": 2}
        }));
        match result {
            Err(Error::Schema(err)) => {
                assert_eq!(err.location.as_deref(), Some("/items"));
                assert_eq!(err.keyword.as_deref(), Some("maxLength"));
            }
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_keyword_type_errors() {
        assert!(build_validator(&json!({"type": "string", "minLength": -1})).is_err());
        assert!(build_validator(&json!({"type": "string", "pattern": 5})).is_err());
        assert!(build_validator(&json!({"type": "object", "required": "a"})).is_err());
        assert!(build_validator(&json!({"type": "array", "items": [{"type": "string"}]})).is_err());
        assert!(build_validator(&json!({"type": "string", "enum": []})).is_err());
        assert!(build_validator(&json!({"type": "enum"})).is_err());
    }

    #[test]
    fn test_deny_unknown_keywords() {
        let document = json!({"type": "string", "minimum": 3});
        assert!(SchemaBuilder::new().build(&document).is_ok());

        let strict = SchemaBuilder::new().with_deny_unknown_keywords(true);
        match strict.build(&document) {
            Err(Error::Schema(err)) => assert_eq!(err.keyword.as_deref(), Some("minimum")),
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
        assert!(strict.build(&json!({"type": "string", "title": "t"})).is_ok());
    }

    #[test]
    fn test_depth_limit() {
        let mut document = json!({"type": "string"});
        for _ in 0..10 {
            document = json!({"type": "array", "items": document});
        }
        let limits = Limits {
            max_schema_depth: 5,
            ..Limits::default()
        };
        let result = SchemaBuilder::new().with_limits(limits).build(&document);
        assert!(matches!(result, Err(Error::LimitExceeded(_))));
    }

    #[test]
    fn test_depth_counts_schemas_not_segments() {
        let nest = |levels: usize| {
            let mut document = json!({"type": "string"});
            for _ in 0..levels {
                document = json!({"type": "object", "properties": {"child": document}});
            }
            document
        };
        let limits = Limits {
            max_schema_depth: 4,
            ..Limits::default()
        };
        let builder = SchemaBuilder::new().with_limits(limits);

        assert!(builder.build(&nest(4)).is_ok());
        assert!(matches!(builder.build(&nest(5)), Err(Error::LimitExceeded(_))));
    }

    #[test]
    fn test_injected_registry() {
        let mut registry = Registry::new();
        registry.register_type::<EvenValidator>("even");

        let builder = SchemaBuilder::with_registry(registry);
        let validator = builder.build(&json!({"type": "even"})).unwrap();
        assert!(validator.is_valid(&json!(4)));
        assert!(!validator.is_valid(&json!(3)));
        assert!(builder.build(&json!({"type": "string"})).is_err());
    }

    #[test]
    fn test_global_registration() {
        register_validator_type::<EvenValidator>("evenNumberValidator").unwrap();
        let validator = build_validator(&json!({
            "type": "array",
            "items": {"type": "EvenNumber"}
        }))
        .unwrap();
        assert!(validator.is_valid(&json!([2, 4])));
        assert!(!validator.is_valid(&json!([2, 5])));
    }

    #[test]
    fn test_from_json_str() {
        let validator = SchemaBuilder::new()
            .from_json_str(r#"{"type": "boolean"}"#)
            .unwrap();
        assert_eq!(validator.parse(&json!("on")).unwrap(), json!(true));
        assert!(matches!(
            SchemaBuilder::new().from_json_str("{"),
            Err(Error::Json(_))
        ));
    }
}
