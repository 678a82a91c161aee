// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Error types for the X.509 object model.
//!
//! Errors are grouped by category so callers can match on the broad class
//! (parsing, attribute access, extensions, names, signatures, constraints)
//! without enumerating every leaf condition.

use thiserror::Error;

/// Result type alias for X.509 object-model operations
pub type Result<T> = core::result::Result<T, Error>;

/// Top-level error type for certificate and CRL handling
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum Error {
    /// Errors during DER/ASN.1 parsing (from der crate)
    #[error("ASN.1 error: {0}")]
    Asn1(#[from] der::Error),

    /// Certificate/CRL encoding errors (PEM/DER conversion)
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Attribute-protocol errors (dotted-path get/set/delete)
    #[error("Attribute error: {0}")]
    Attribute(#[from] AttributeError),

    /// Extension handling errors
    #[error("Extension error: {0}")]
    Extension(#[from] ExtensionError),

    /// Distinguished-name errors (DER or string-form)
    #[error("Name error: {0}")]
    Name(#[from] NameError),

    /// Signature errors (algorithm coherence, verification plumbing)
    #[error("Signature error: {0}")]
    Signature(#[from] SignatureError),

    /// Time/validity errors
    #[error("Time error: {0}")]
    Time(#[from] TimeError),

    /// Mutation addressed at a signed (immutable) object
    #[error("Object is signed and immutable")]
    Immutable,

    /// Invalid certificate or CRL version
    #[error("Invalid version: {0}")]
    InvalidVersion(u8),

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised by the attribute-access protocol
#[derive(Debug, Clone, Error)]
pub enum AttributeError {
    /// The dotted path does not name a known attribute
    #[error("Attribute not recognized: {path}")]
    NotRecognized {
        /// Path as given by the caller
        path: String,
    },

    /// The value supplied for the path has the wrong type
    #[error("Type mismatch at {path}: expected {expected}")]
    TypeMismatch {
        /// Path as given by the caller
        path: String,
        /// Human-readable description of the expected value type
        expected: &'static str,
    },

    /// The attribute exists but cannot be set or deleted
    #[error("Attribute not settable: {0}")]
    NotSettable(String),
}

/// Errors related to certificate/CRL extensions
#[derive(Debug, Clone, Error)]
pub enum ExtensionError {
    /// Same extension OID appears more than once
    #[error("Duplicate extension: {0}")]
    Duplicate(String),

    /// Extension value bytes do not decode as the registered type
    #[error("Invalid extension value for {oid}: {reason}")]
    InvalidValue {
        /// Extension OID (dotted-decimal)
        oid: String,
        /// Decode failure detail
        reason: String,
    },

    /// Extension not present in the set
    #[error("Extension not present: {0}")]
    NotPresent(String),

    /// Extensions are not allowed for this version
    #[error("Extensions not allowed in v1 object")]
    NotAllowedInV1,
}

/// Errors related to distinguished names
#[derive(Debug, Clone, Error)]
pub enum NameError {
    /// Invalid DER encoding of a name component
    #[error("Invalid name encoding: {0}")]
    InvalidEncoding(String),

    /// String-form (RFC 2253 / legacy) parse failure
    #[error("Invalid name string at position {position}: {reason}")]
    InvalidString {
        /// Byte offset into the input string
        position: usize,
        /// Failure detail
        reason: String,
    },

    /// Unknown attribute keyword in a name string
    #[error("Unknown attribute keyword: {0}")]
    UnknownKeyword(String),

    /// Invalid attribute value
    #[error("Invalid attribute value: {0}")]
    InvalidAttribute(String),
}

/// Errors related to signing and verification plumbing
#[derive(Debug, Clone, Error)]
pub enum SignatureError {
    /// Outer signatureAlgorithm differs from tbs.signature
    #[error("Signature algorithm mismatch: outer={outer}, tbs={tbs}")]
    AlgorithmMismatch {
        /// OID from the outer SEQUENCE
        outer: String,
        /// OID from the to-be-signed body
        tbs: String,
    },

    /// The signature service reported a failure (not a mismatch)
    #[error("Signature provider error: {0}")]
    Provider(String),

    /// Signature bytes are structurally invalid
    #[error("Invalid signature format: {0}")]
    InvalidFormat(String),
}

/// Errors related to time handling
#[derive(Debug, Clone, Error)]
pub enum TimeError {
    /// notAfter precedes notBefore
    #[error("Invalid validity period: notBefore={not_before}, notAfter={not_after}")]
    InvalidValidityPeriod {
        /// Formatted notBefore
        not_before: String,
        /// Formatted notAfter
        not_after: String,
    },

    /// Time value out of encodable range
    #[error("Time out of range")]
    OutOfRange,
}

/// Errors related to PEM/DER conversion
#[derive(Debug, Clone, Error)]
pub enum EncodingError {
    /// Invalid PEM format
    #[error("Invalid PEM: {0}")]
    InvalidPem(String),

    /// PEM label mismatch
    #[error("Invalid PEM label: expected '{expected}', found '{found}'")]
    InvalidPemLabel {
        /// Required label
        expected: String,
        /// Label present in the input
        found: String,
    },

    /// Input has bytes after the outer DER value
    #[error("Trailing bytes after DER value")]
    TrailingBytes,
}

/// Convert from PEM decoding errors
impl From<pem_rfc7468::Error> for Error {
    fn from(err: pem_rfc7468::Error) -> Self {
        Error::Encoding(EncodingError::InvalidPem(err.to_string()))
    }
}

// ============================================================================
// Helper constructors for common error cases
// ============================================================================

impl Error {
    /// Create an attribute-not-recognized error
    pub fn attr_not_recognized<S: Into<String>>(path: S) -> Self {
        Error::Attribute(AttributeError::NotRecognized { path: path.into() })
    }

    /// Create an attribute type-mismatch error
    pub fn attr_type_mismatch<S: Into<String>>(path: S, expected: &'static str) -> Self {
        Error::Attribute(AttributeError::TypeMismatch {
            path: path.into(),
            expected,
        })
    }

    /// Create a duplicate-extension error
    pub fn duplicate_extension<S: Into<String>>(oid: S) -> Self {
        Error::Extension(ExtensionError::Duplicate(oid.into()))
    }

    /// Create an extension-not-present error
    pub fn extension_not_present<S: Into<String>>(name: S) -> Self {
        Error::Extension(ExtensionError::NotPresent(name.into()))
    }

    /// Create a name string-parse error
    pub fn name_parse<S: Into<String>>(position: usize, reason: S) -> Self {
        Error::Name(NameError::InvalidString {
            position,
            reason: reason.into(),
        })
    }

    /// Create a signature provider error
    pub fn signature_provider<S: Into<String>>(msg: S) -> Self {
        Error::Signature(SignatureError::Provider(msg.into()))
    }

    /// Create an internal error (should be rare)
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Immutable;
        assert_eq!(err.to_string(), "Object is signed and immutable");

        let err = Error::attr_not_recognized("x509.info.bogus");
        assert!(err.to_string().contains("x509.info.bogus"));

        let err = Error::attr_type_mismatch("x509.info.serial_number", "bytes");
        assert!(err.to_string().contains("expected bytes"));
    }

    #[test]
    fn test_error_conversions() {
        let der_err = der::Error::new(der::ErrorKind::Failed, der::Length::ZERO);
        let err: Error = der_err.into();
        assert!(matches!(err, Error::Asn1(_)));
    }

    #[test]
    fn test_helper_constructors() {
        let err = Error::duplicate_extension("2.5.29.19");
        assert!(matches!(
            err,
            Error::Extension(ExtensionError::Duplicate(_))
        ));

        let err = Error::name_parse(4, "unterminated escape");
        assert!(matches!(
            err,
            Error::Name(NameError::InvalidString { position: 4, .. })
        ));
    }

    #[test]
    fn test_clone() {
        let err = Error::Immutable;
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
