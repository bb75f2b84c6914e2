// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Errors raised by time zone resolution and period calculations.
///
/// All of these signal programmer or input mistakes and are non-retryable.
/// Offset queries themselves are total: a skipped or ambiguous wall-clock
/// reading is resolved deterministically, never reported as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed or out-of-range input: a non-positive amount or count, an
    /// offset of 24 hours or more, an unparseable zone or date-time string.
    InputValidation(String),
    /// A named time zone that does not exist in the IANA database.
    Lookup(String),
    /// A required argument was absent.
    NullArgument(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InputValidation(msg) => write!(f, "invalid input: {}", msg),
            Error::Lookup(name) => write!(f, "unknown time zone: {}", name),
            Error::NullArgument(what) => write!(f, "missing required argument: {}", what),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
