// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy shared by every stage of the pipeline.
//!
//! No stage retries internally. A failure aborts the document currently being
//! processed and carries enough context (line/column, offending token, type
//! name, field path) to diagnose it without re-running.

use crate::convert::ComponentError;
use crate::dynamic::DynamicDataError;
use std::io;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The text document is not well-formed.
    #[error("malformed input at line {line}, column {column}: {message}")]
    MalformedInput {
        line: usize,
        column: usize,
        message: String,
    },

    /// The binary payload is not a well-formed document.
    #[error("malformed binary payload: {0}")]
    MalformedPayload(String),

    /// The persisted record ends before a declared length is satisfied.
    #[error("record truncated while reading {field}: needed {needed} bytes, {available} available")]
    TruncatedRecord {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    /// The persisted record holds a value no writer can produce.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// The payload cannot be described by the record's signed 32-bit length.
    #[error("payload of {len} bytes exceeds the record limit of {max} bytes")]
    PayloadTooLarge { len: usize, max: usize },

    /// A type name could not be resolved to a concrete type.
    #[error("could not resolve type '{type_name}': {reason}")]
    TypeResolution { type_name: String, reason: String },

    /// A module could not be loaded from the type registry.
    #[error("could not load module '{module}': {reason}")]
    ModuleLoad { module: String, reason: String },

    /// A compact value token could not be decoded.
    #[error("could not convert '{token}' to {type_name}: {source}")]
    ConverterParse {
        token: String,
        type_name: String,
        #[source]
        source: ComponentError,
    },

    /// A node of the payload could not be mapped onto its target type.
    #[error("{message} Path '{path}'.")]
    Reconstruct { path: String, message: String },

    /// A value has no representation in the binary encoding.
    #[error("value cannot be encoded: {0}")]
    Unrepresentable(String),

    /// Misuse of the dynamic data API.
    #[error(transparent)]
    DynamicData(#[from] DynamicDataError),

    /// Processor configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// A type resolution failure enriched with module diagnostics.
    #[error("{message}")]
    Diagnosed {
        message: String,
        #[source]
        source: Box<Error>,
    },

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn reconstruct(path: &str, message: impl Into<String>) -> Self {
        Self::Reconstruct {
            path: path.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn type_resolution(type_name: &str, reason: impl Into<String>) -> Self {
        Self::TypeResolution {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for type resolution failures, enriched or not.
    pub fn is_type_resolution(&self) -> bool {
        match self {
            Self::TypeResolution { .. } => true,
            Self::Diagnosed { source, .. } => source.is_type_resolution(),
            _ => false,
        }
    }
}
