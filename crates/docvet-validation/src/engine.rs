//! The injected validation-engine contract.
//!
//! The core has no compile-time dependency on a particular structural
//! validator: the engine is a capability passed at construction. Tests
//! run against fakes; hosts may bring their own engine; the crate ships
//! [`crate::NativeEngine`] as the default.

use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use crate::schema::{Schema, SchemaRegistry};
use crate::violation::RawViolation;

/// Failure to compile a schema. A broken schema is a configuration
/// defect: fatal, surfaced at construction, never retried.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("unresolved schema reference '{reference}'")]
    UnresolvedReference { reference: String },

    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("no precompiled validator for schema '{key}'")]
    MissingPrecompiled { key: String },

    #[error("schema carries neither $id nor $ref to identify a precompiled validator")]
    MissingIdentifier,

    /// Escape hatch for foreign engines.
    #[error("{0}")]
    Engine(String),
}

/// A validation engine: compiles schemas into validators.
pub trait ValidationEngine {
    fn compile(
        &self,
        schema: &Schema,
        registry: &SchemaRegistry,
    ) -> Result<Box<dyn CompiledSchema + Send>, CompileError>;
}

/// A compiled validator for one schema.
///
/// Implementations record the previous run's violation list as state on
/// the validator itself, so a compiled schema is **not reentrant**:
/// concurrent calls on one instance would corrupt which list a caller
/// observes. The orchestrator serializes calls per instance; validators
/// for different schemas are fully independent.
pub trait CompiledSchema {
    /// Validate a decoded document value; `true` means conformant.
    fn validate(&mut self, value: &Value) -> bool;

    /// The violations recorded by the most recent `validate` call, in
    /// the order the engine reported them. Empty after a passing run.
    fn violations(&self) -> &[RawViolation];
}

/// Compiled validators shared ahead of time, keyed by schema `$id` or
/// `$ref` — the original deployment compiled all schemas once into a
/// bundle and looked validators up by identifier.
#[derive(Default)]
pub struct PrecompiledValidators {
    validators: HashMap<String, Box<dyn CompiledSchema + Send>>,
}

impl PrecompiledValidators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, validator: Box<dyn CompiledSchema + Send>) {
        self.validators.insert(key.into(), validator);
    }

    /// Remove and return the validator for `key`; ownership moves to
    /// the requesting orchestrator.
    pub fn take(&mut self, key: &str) -> Option<Box<dyn CompiledSchema + Send>> {
        self.validators.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}
