//! Structured success/failure envelope shared by every extraction stage.
//!
//! Failures are data: an [`ExtractionOutcome`] is the only way an error
//! leaves an extractor, the guard, or the query evaluator. [`attempt`] is the
//! single boundary helper that turns a fallible call (including a panic) into
//! a stage-tagged failure.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};

use crate::error::SemannotError;

/// Which stage of processing a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorStage {
    /// Reading the archive manifest.
    Manifest,
    /// Retrieving a container entry.
    Extract,
    /// Parsing RDF, including protection guard rejections.
    RdfParse,
    SingularExtract,
    CompositeExtract,
    ProcessExtract,
    EnergyExtract,
    OpbCount,
    Sparql,
}

impl ErrorStage {
    /// Kebab-case tag, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manifest => "manifest",
            Self::Extract => "extract",
            Self::RdfParse => "rdf-parse",
            Self::SingularExtract => "singular-extract",
            Self::CompositeExtract => "composite-extract",
            Self::ProcessExtract => "process-extract",
            Self::EnergyExtract => "energy-extract",
            Self::OpbCount => "opb-count",
            Self::Sparql => "sparql",
        }
    }
}

impl std::fmt::Display for ErrorStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stage-tagged failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    pub stage: ErrorStage,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause_kind: Option<String>,
}

impl ExtractionFailure {
    /// A failure with no details and no cause kind.
    pub fn new(stage: ErrorStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            details: None,
            cause_kind: None,
        }
    }

    /// Build a failure from a library error, recording its kind.
    pub fn from_error(stage: ErrorStage, error: impl Into<SemannotError>) -> Self {
        let error = error.into();
        Self::new(stage, error.to_string()).with_cause_kind(error.kind())
    }

    /// Attach a structured detail. A repeated key replaces the earlier value.
    pub fn with_detail(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.details
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Record the kind of the underlying error.
    pub fn with_cause_kind(mut self, kind: impl Into<String>) -> Self {
        self.cause_kind = Some(kind.into());
        self
    }

    /// Look up a detail value.
    pub fn detail(&self, key: &str) -> Option<&serde_json::Value> {
        self.details.as_ref()?.get(key)
    }
}

impl std::fmt::Display for ExtractionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)
    }
}

/// Either the data a stage produced or the reason it could not.
///
/// Serializes with an `ok` boolean discriminator:
/// `{"ok": true, "data": ...}` or `{"ok": false, "stage": ..., "message": ...}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome<T> {
    Ok { data: T },
    Err(ExtractionFailure),
}

impl<T> ExtractionOutcome<T> {
    /// A successful outcome.
    pub fn ok(data: T) -> Self {
        Self::Ok { data }
    }

    /// A failed outcome.
    pub fn err(failure: ExtractionFailure) -> Self {
        Self::Err(failure)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }

    /// Data of a successful outcome.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ok { data } => Some(data),
            Self::Err(_) => None,
        }
    }

    /// Failure of a failed outcome.
    pub fn failure(&self) -> Option<&ExtractionFailure> {
        match self {
            Self::Ok { .. } => None,
            Self::Err(failure) => Some(failure),
        }
    }

    /// Transform the data, passing a failure through.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExtractionOutcome<U> {
        match self {
            Self::Ok { data } => ExtractionOutcome::Ok { data: f(data) },
            Self::Err(failure) => ExtractionOutcome::Err(failure),
        }
    }

    /// Chain a step that may itself fail.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> ExtractionOutcome<U>) -> ExtractionOutcome<U> {
        match self {
            Self::Ok { data } => f(data),
            Self::Err(failure) => ExtractionOutcome::Err(failure),
        }
    }

    /// Convert into a `Result`.
    pub fn into_result(self) -> Result<T, ExtractionFailure> {
        match self {
            Self::Ok { data } => Ok(data),
            Self::Err(failure) => Err(failure),
        }
    }

    /// The data, or `default` after pushing the failure onto `errors`.
    pub fn unwrap_or_record(self, default: T, errors: &mut Vec<ExtractionFailure>) -> T {
        match self {
            Self::Ok { data } => data,
            Self::Err(failure) => {
                errors.push(failure);
                default
            }
        }
    }
}

impl<T> From<Result<T, ExtractionFailure>> for ExtractionOutcome<T> {
    fn from(result: Result<T, ExtractionFailure>) -> Self {
        match result {
            Ok(data) => Self::Ok { data },
            Err(failure) => Self::Err(failure),
        }
    }
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(flatten)]
    failure: Option<&'a ExtractionFailure>,
}

impl<T: Serialize> Serialize for ExtractionOutcome<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tagged = match self {
            Self::Ok { data } => Tagged {
                ok: true,
                data: Some(data),
                failure: None,
            },
            Self::Err(failure) => Tagged {
                ok: false,
                data: None,
                failure: Some(failure),
            },
        };
        tagged.serialize(serializer)
    }
}

/// Run `f` at the boundary of `stage`.
///
/// An `Err` becomes a failure whose `cause_kind` is the error's kind; a panic
/// becomes a failure with `cause_kind = "panic"`.
pub fn attempt<T, E, F>(stage: ErrorStage, f: F) -> ExtractionOutcome<T>
where
    E: Into<SemannotError>,
    F: FnOnce() -> Result<T, E>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(data)) => ExtractionOutcome::ok(data),
        Ok(Err(error)) => ExtractionOutcome::err(ExtractionFailure::from_error(stage, error)),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            ExtractionOutcome::err(
                ExtractionFailure::new(stage, format!("panicked: {message}"))
                    .with_cause_kind("panic"),
            )
        }
    }
}
