//! Capture configuration and its resolution into per-stream decisions.
//!
//! A capture value is polymorphic: a bare boolean or path applies to both
//! streams, an object with `stdout`/`stderr` fields configures each stream
//! on its own. Resolution turns that value into one [`StreamCaptureKind`]
//! per stream.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ExecError, Result};

/// What to do with one output stream of the child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamCaptureKind {
    /// Leave the stream connected to the inherited one.
    Ignore,
    /// Redirect into a freshly generated temporary file.
    CaptureTemp,
    /// Redirect into a caller-supplied file.
    CaptureFile(PathBuf),
}

impl StreamCaptureKind {
    /// Returns `true` unless the stream is left alone.
    #[must_use]
    pub fn is_captured(&self) -> bool {
        !matches!(self, Self::Ignore)
    }
}

/// Per-stream setting inside a [`CaptureConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StreamSpec {
    /// `true` captures to a temp file, `false` ignores the stream.
    Toggle(bool),
    /// Capture to this file.
    Path(PathBuf),
}

/// The caller's capture configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, try_from = "Value")]
pub enum CaptureConfig {
    /// Shorthand applying the same setting to stdout and stderr.
    Both(StreamSpec),
    /// Independent settings; a missing field means the stream is ignored.
    Streams {
        /// Setting for standard output.
        #[serde(skip_serializing_if = "Option::is_none")]
        stdout: Option<StreamSpec>,
        /// Setting for standard error.
        #[serde(skip_serializing_if = "Option::is_none")]
        stderr: Option<StreamSpec>,
    },
}

impl CaptureConfig {
    /// Capture both streams to temp files.
    #[must_use]
    pub fn all() -> Self {
        Self::Both(StreamSpec::Toggle(true))
    }

    /// Parses a loosely typed capture value.
    ///
    /// `null` means no capture configuration at all.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::InvalidCaptureSpec`] for numbers, arrays, empty
    /// strings, and objects whose `stdout`/`stderr` fields are neither a
    /// boolean nor a non-empty string.
    pub fn from_value(value: &Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::Bool(_) | Value::String(_) => {
                Ok(Some(Self::Both(stream_spec(value, "capture")?)))
            }
            Value::Object(fields) => {
                let field = |name: &str| match fields.get(name) {
                    None | Some(Value::Null) => Ok(None),
                    Some(v) => stream_spec(v, name).map(Some),
                };
                Ok(Some(Self::Streams { stdout: field("stdout")?, stderr: field("stderr")? }))
            }
            Value::Number(_) | Value::Array(_) => Err(ExecError::invalid_capture(format!(
                "expected boolean, string or object, got {value}"
            ))),
        }
    }
}

impl TryFrom<Value> for CaptureConfig {
    type Error = ExecError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(&value)?
            .ok_or_else(|| ExecError::invalid_capture("capture value must not be null"))
    }
}

fn stream_spec(value: &Value, name: &str) -> Result<StreamSpec> {
    match value {
        Value::Bool(b) => Ok(StreamSpec::Toggle(*b)),
        Value::String(s) if s.is_empty() => {
            Err(ExecError::invalid_capture(format!("{name}: path must not be empty")))
        }
        Value::String(s) => Ok(StreamSpec::Path(PathBuf::from(s))),
        other => Err(ExecError::invalid_capture(format!(
            "{name}: expected boolean or string, got {other}"
        ))),
    }
}

/// The outcome of resolving a [`CaptureConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCapture {
    /// Decision for standard output.
    pub stdout: StreamCaptureKind,
    /// Decision for standard error.
    pub stderr: StreamCaptureKind,
}

impl ResolvedCapture {
    /// Both streams ignored.
    #[must_use]
    pub fn ignore_all() -> Self {
        Self { stdout: StreamCaptureKind::Ignore, stderr: StreamCaptureKind::Ignore }
    }

    /// Returns `true` if at least one stream is redirected.
    #[must_use]
    pub fn any_captured(&self) -> bool {
        self.stdout.is_captured() || self.stderr.is_captured()
    }
}

/// Resolves a capture configuration into per-stream decisions.
///
/// A path given through the shorthand form is used for both streams.
///
/// # Errors
///
/// Returns [`ExecError::InvalidCaptureSpec`] if a path is empty.
pub fn resolve(capture: Option<&CaptureConfig>) -> Result<ResolvedCapture> {
    let Some(capture) = capture else {
        return Ok(ResolvedCapture::ignore_all());
    };
    match capture {
        CaptureConfig::Both(spec) => {
            let kind = kind_for(Some(spec))?;
            Ok(ResolvedCapture { stdout: kind.clone(), stderr: kind })
        }
        CaptureConfig::Streams { stdout, stderr } => Ok(ResolvedCapture {
            stdout: kind_for(stdout.as_ref())?,
            stderr: kind_for(stderr.as_ref())?,
        }),
    }
}

/// Parses and resolves a loosely typed capture value in one step.
///
/// # Errors
///
/// Returns [`ExecError::InvalidCaptureSpec`] for unrecognized shapes.
pub fn resolve_value(value: &Value) -> Result<ResolvedCapture> {
    resolve(CaptureConfig::from_value(value)?.as_ref())
}

fn kind_for(spec: Option<&StreamSpec>) -> Result<StreamCaptureKind> {
    match spec {
        None | Some(StreamSpec::Toggle(false)) => Ok(StreamCaptureKind::Ignore),
        Some(StreamSpec::Toggle(true)) => Ok(StreamCaptureKind::CaptureTemp),
        Some(StreamSpec::Path(p)) if p.as_os_str().is_empty() => {
            Err(ExecError::invalid_capture("path must not be empty"))
        }
        Some(StreamSpec::Path(p)) => Ok(StreamCaptureKind::CaptureFile(p.clone())),
    }
}

/// Returns `true` when both paths are present and name the same file.
pub(crate) fn same_target(stdout: Option<&Path>, stderr: Option<&Path>) -> bool {
    matches!((stdout, stderr), (Some(a), Some(b)) if a == b)
}
