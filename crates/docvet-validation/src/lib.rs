//! # docvet-validation
//!
//! Schema-driven validation and diagnostic localization for structured
//! documents.
//!
//! Given a position-annotated document tree ([`docvet_yaml::AnnotatedNode`])
//! and a [`Schema`], a [`SchemaValidator`] runs an injected validation
//! engine over the decoded document value, then distills the engine's
//! exhaustive violation list into a minimal set of [`LocalizedError`]s,
//! each pinned to an exact span of the source text:
//!
//! ```text
//! engine (all errors) ──▶ reduction (group/prune/narrow)
//!        ──▶ localized errors ──▶ handler rewrites ──▶ rendered context
//! ```
//!
//! The engine is pluggable (see [`ValidationEngine`]); [`NativeEngine`]
//! is the built-in implementation. Rendering goes through caller-supplied
//! [`DiagnosticSink`]s, so the same core serves a terminal tool and an
//! editor host.

mod engine;
mod error;
mod json;
mod native;
mod navigate;
mod reduce;
mod report;
mod schema;
mod validator;
mod violation;

pub use engine::{CompileError, CompiledSchema, PrecompiledValidators, ValidationEngine};
pub use error::{Error, Result};
pub use json::yaml_to_json;
pub use native::NativeEngine;
pub use navigate::{NavigateError, navigate};
pub use reduce::{LocalizedError, localize_and_prune};
pub use report::{CollectingSink, DiagnosticSink, report_errors};
pub use schema::{AdditionalProperties, Schema, SchemaRegistry, navigate_schema};
pub use validator::{ErrorHandler, SchemaValidator, ValidatedDocument};
pub use violation::{InstancePath, Keyword, PathSegment, RawViolation, SchemaPath, ViolationParams};
