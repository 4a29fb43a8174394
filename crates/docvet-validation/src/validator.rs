//! The validation orchestrator.

use std::sync::{Mutex, PoisonError};

use docvet_source_map::MappedSource;
use docvet_yaml::AnnotatedNode;
use serde_json::Value;

use crate::engine::{CompileError, CompiledSchema, PrecompiledValidators, ValidationEngine};
use crate::error::Result;
use crate::json::yaml_to_json;
use crate::reduce::{LocalizedError, localize_and_prune};
use crate::report::{DiagnosticSink, report_errors};
use crate::schema::{Schema, SchemaRegistry};

/// What a validation call yields: the decoded document value and the
/// reduced, localized error list — empty exactly when the document
/// conforms.
#[derive(Debug)]
pub struct ValidatedDocument {
    pub result: Value,
    pub errors: Vec<LocalizedError>,
}

/// A schema-specific rewrite applied to each localized error.
///
/// Handlers run in registration order; each receives and returns the
/// error, letting a schema author improve wording for known violation
/// shapes without touching the generic engine.
pub type ErrorHandler = Box<dyn Fn(LocalizedError, &AnnotatedNode, &Schema) -> LocalizedError + Send + Sync>;

/// Owns one compiled validator and drives validation end to end.
///
/// Validation calls against the same instance are serialized internally:
/// compiled validators expose their last violation list as state on the
/// validator object (§ the engine contract), so uncoordinated parallel
/// calls would corrupt which list the reduction step observes.
/// Instances for different schemas share nothing and run concurrently.
pub struct SchemaValidator {
    schema: Schema,
    registry: SchemaRegistry,
    compiled: Mutex<Box<dyn CompiledSchema + Send>>,
    handlers: Vec<ErrorHandler>,
}

impl SchemaValidator {
    /// Compile `schema` with the injected engine.
    ///
    /// Compilation failure is fatal and surfaces here, never deferred to
    /// validation time.
    pub fn new(
        schema: Schema,
        registry: SchemaRegistry,
        engine: &dyn ValidationEngine,
    ) -> Result<Self> {
        let compiled = engine.compile(&schema, &registry)?;
        Ok(Self {
            schema,
            registry,
            compiled: Mutex::new(compiled),
            handlers: Vec::new(),
        })
    }

    /// Take a validator from a shared precompiled bundle, looked up by
    /// the schema's `$id` (or `$ref`).
    pub fn from_precompiled(
        schema: Schema,
        registry: SchemaRegistry,
        precompiled: &mut PrecompiledValidators,
    ) -> Result<Self> {
        let key = schema
            .id
            .as_deref()
            .or(schema.reference.as_deref())
            .ok_or(CompileError::MissingIdentifier)?;
        let compiled = precompiled
            .take(key)
            .ok_or_else(|| CompileError::MissingPrecompiled {
                key: key.to_string(),
            })?;
        Ok(Self {
            schema,
            registry,
            compiled: Mutex::new(compiled),
            handlers: Vec::new(),
        })
    }

    /// Register an error-rewrite handler; handlers run in registration
    /// order.
    pub fn add_handler(
        &mut self,
        handler: impl Fn(LocalizedError, &AnnotatedNode, &Schema) -> LocalizedError
        + Send
        + Sync
        + 'static,
    ) {
        self.handlers.push(Box::new(handler));
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validate a parsed document against the schema.
    ///
    /// Conformance violations come back as localized errors; only schema
    /// compilation defects and instance/tree disagreements are `Err`.
    pub fn validate(
        &self,
        source: &MappedSource,
        root: &AnnotatedNode,
    ) -> Result<ValidatedDocument> {
        let value = yaml_to_json(&root.yaml);
        let raw = {
            // a poisoned lock means another validation panicked; the
            // validator rebuilds its violation list on every run, so the
            // inner state is safe to reuse
            let mut compiled = self
                .compiled
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if compiled.validate(&value) {
                return Ok(ValidatedDocument {
                    result: value,
                    errors: Vec::new(),
                });
            }
            compiled.violations().to_vec()
        };
        let localized = localize_and_prune(root, raw, source, &self.schema, &self.registry)?;
        let errors = localized
            .into_iter()
            .map(|error| self.apply_handlers(error, root))
            .collect();
        Ok(ValidatedDocument {
            result: value,
            errors,
        })
    }

    /// Validate and render every resulting diagnostic through `sink`.
    pub fn validate_and_report(
        &self,
        source: &MappedSource,
        root: &AnnotatedNode,
        message: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<ValidatedDocument> {
        let mut result = self.validate(source, root)?;
        report_errors(&mut result, source, message, sink);
        Ok(result)
    }

    fn apply_handlers(&self, mut error: LocalizedError, root: &AnnotatedNode) -> LocalizedError {
        for handler in &self.handlers {
            error = handler(error, root, &self.schema);
        }
        error
    }
}
