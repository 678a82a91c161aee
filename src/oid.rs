// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! X.509 extension OID constants and the decoder registry
//!
//! This module defines Object Identifier (OID) constants for the standard
//! certificate and CRL extensions (RFC 5280 Section 4.2 and Section 5.2/5.3),
//! and a fixed table mapping each OID to a friendly name and the function
//! that decodes its extnValue into a typed payload.
//!
//! # Extension arc
//! All standard extensions live under the joint-iso-ccitt ce arc: 2.5.29
//!
//! # References
//! - RFC 5280 - Internet X.509 PKI Certificate and CRL Profile

use const_oid::ObjectIdentifier;

use crate::ext::ExtensionPayload;

// =============================================================================
// Certificate extension OIDs (RFC 5280 Section 4.2.1)
// =============================================================================

/// SubjectKeyIdentifier - 2.5.29.14
/// id-ce-subjectKeyIdentifier
pub const SUBJECT_KEY_IDENTIFIER: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.14");

/// KeyUsage - 2.5.29.15
/// id-ce-keyUsage
///
/// A BIT STRING of permitted key operations. Conforming CAs mark this
/// extension critical.
pub const KEY_USAGE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.15");

/// SubjectAltName - 2.5.29.17
/// id-ce-subjectAltName
pub const SUBJECT_ALT_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.17");

/// IssuerAltName - 2.5.29.18
/// id-ce-issuerAltName
pub const ISSUER_ALT_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.18");

/// BasicConstraints - 2.5.29.19
/// id-ce-basicConstraints
///
/// Identifies whether the subject is a CA and bounds the depth of
/// certification paths it may anchor.
pub const BASIC_CONSTRAINTS: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.19");

/// NameConstraints - 2.5.29.30
/// id-ce-nameConstraints
///
/// CA-certificate-only extension restricting the name space within which
/// subject names of subsequent certificates must fall.
pub const NAME_CONSTRAINTS: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.30");

/// CRLDistributionPoints - 2.5.29.31
/// id-ce-cRLDistributionPoints
pub const CRL_DISTRIBUTION_POINTS: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.31");

/// AuthorityKeyIdentifier - 2.5.29.35
/// id-ce-authorityKeyIdentifier
pub const AUTHORITY_KEY_IDENTIFIER: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.35");

/// PolicyConstraints - 2.5.29.36
/// id-ce-policyConstraints
pub const POLICY_CONSTRAINTS: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.36");

/// ExtendedKeyUsage - 2.5.29.37
/// id-ce-extKeyUsage
pub const EXTENDED_KEY_USAGE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.37");

// =============================================================================
// CRL and CRL-entry extension OIDs (RFC 5280 Section 5.2 and 5.3)
// =============================================================================

/// CRLNumber - 2.5.29.20
/// id-ce-cRLNumber
///
/// Monotonically increasing sequence number for a given CRL scope.
pub const CRL_NUMBER: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.20");

/// ReasonCode - 2.5.29.21
/// id-ce-cRLReasons (per-entry)
pub const CRL_REASON: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.21");

/// InvalidityDate - 2.5.29.24
/// id-ce-invalidityDate (per-entry)
pub const INVALIDITY_DATE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.24");

/// CertificateIssuer - 2.5.29.29
/// id-ce-certificateIssuer (per-entry)
///
/// Names the issuer of the certificates revoked by subsequent entries in an
/// indirect CRL. The override is sticky: it applies to every following entry
/// until the next CertificateIssuer extension appears.
pub const CERTIFICATE_ISSUER: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.29");

// =============================================================================
// Registry
// =============================================================================

/// One registry row: OID, friendly name, and the extnValue decoder.
pub struct RegistryEntry {
    /// Extension OID
    pub oid: ObjectIdentifier,
    /// Friendly name, used in attribute paths
    pub name: &'static str,
    /// Decode the inner extnValue bytes into a typed payload
    pub decode: fn(&[u8]) -> der::Result<ExtensionPayload>,
}

/// The process-wide extension registry.
///
/// Fixed at compile time; lookups are pure functions of OID or name.
pub static REGISTRY: &[RegistryEntry] = &[
    RegistryEntry {
        oid: BASIC_CONSTRAINTS,
        name: "BasicConstraints",
        decode: ExtensionPayload::decode_basic_constraints,
    },
    RegistryEntry {
        oid: KEY_USAGE,
        name: "KeyUsage",
        decode: ExtensionPayload::decode_key_usage,
    },
    RegistryEntry {
        oid: EXTENDED_KEY_USAGE,
        name: "ExtendedKeyUsage",
        decode: ExtensionPayload::decode_extended_key_usage,
    },
    RegistryEntry {
        oid: SUBJECT_KEY_IDENTIFIER,
        name: "SubjectKeyIdentifier",
        decode: ExtensionPayload::decode_subject_key_identifier,
    },
    RegistryEntry {
        oid: AUTHORITY_KEY_IDENTIFIER,
        name: "AuthorityKeyIdentifier",
        decode: ExtensionPayload::decode_authority_key_identifier,
    },
    RegistryEntry {
        oid: SUBJECT_ALT_NAME,
        name: "SubjectAlternativeName",
        decode: ExtensionPayload::decode_subject_alt_name,
    },
    RegistryEntry {
        oid: ISSUER_ALT_NAME,
        name: "IssuerAlternativeName",
        decode: ExtensionPayload::decode_issuer_alt_name,
    },
    RegistryEntry {
        oid: NAME_CONSTRAINTS,
        name: "NameConstraints",
        decode: ExtensionPayload::decode_name_constraints,
    },
    RegistryEntry {
        oid: POLICY_CONSTRAINTS,
        name: "PolicyConstraints",
        decode: ExtensionPayload::decode_policy_constraints,
    },
    RegistryEntry {
        oid: CRL_DISTRIBUTION_POINTS,
        name: "CRLDistributionPoints",
        decode: ExtensionPayload::decode_crl_distribution_points,
    },
    RegistryEntry {
        oid: CRL_NUMBER,
        name: "CRLNumber",
        decode: ExtensionPayload::decode_crl_number,
    },
    RegistryEntry {
        oid: CRL_REASON,
        name: "ReasonCode",
        decode: ExtensionPayload::decode_crl_reason,
    },
    RegistryEntry {
        oid: INVALIDITY_DATE,
        name: "InvalidityDate",
        decode: ExtensionPayload::decode_invalidity_date,
    },
    RegistryEntry {
        oid: CERTIFICATE_ISSUER,
        name: "CertificateIssuer",
        decode: ExtensionPayload::decode_certificate_issuer,
    },
];

/// Look up the registry entry for an OID.
pub fn entry_for(oid: &ObjectIdentifier) -> Option<&'static RegistryEntry> {
    REGISTRY.iter().find(|entry| entry.oid == *oid)
}

/// Look up the decoder for an OID.
pub fn decoder_for(oid: &ObjectIdentifier) -> Option<fn(&[u8]) -> der::Result<ExtensionPayload>> {
    entry_for(oid).map(|entry| entry.decode)
}

/// Friendly name for an OID, if registered.
pub fn name_for(oid: &ObjectIdentifier) -> Option<&'static str> {
    entry_for(oid).map(|entry| entry.name)
}

/// OID for a friendly name (case-insensitive), if registered.
pub fn oid_for(name: &str) -> Option<ObjectIdentifier> {
    REGISTRY
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(name))
        .map(|entry| entry.oid)
}

/// Build a decoded extension from an OID, criticality, and inner value
/// bytes, promoting through the registry.
pub fn build_extension(
    oid: ObjectIdentifier,
    critical: bool,
    value: Vec<u8>,
) -> crate::Result<crate::ext::DecodedExtension> {
    let extension = crate::ext::Extension::new(oid, critical, value)?;
    let (decoded, _) = crate::ext::DecodedExtension::promote(extension)?;
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let entry = entry_for(&BASIC_CONSTRAINTS).unwrap();
        assert_eq!(entry.name, "BasicConstraints");
        assert_eq!(entry.oid, BASIC_CONSTRAINTS);
        assert!(entry_for(&ObjectIdentifier::new_unwrap("1.2.3.4")).is_none());
    }

    #[test]
    fn test_name_lookup_case_insensitive() {
        assert_eq!(oid_for("basicconstraints"), Some(BASIC_CONSTRAINTS));
        assert_eq!(oid_for("KEYUSAGE"), Some(KEY_USAGE));
        assert_eq!(oid_for("no-such-extension"), None);
    }

    #[test]
    fn test_registry_determinism() {
        // Same decoder identity for the same OID across repeated lookups,
        // unaffected by lookups of other OIDs.
        let first = decoder_for(&KEY_USAGE).unwrap();
        let _ = decoder_for(&SUBJECT_ALT_NAME);
        let _ = decoder_for(&ObjectIdentifier::new_unwrap("1.2.3"));
        let second = decoder_for(&KEY_USAGE).unwrap();
        assert_eq!(first as usize, second as usize);
    }

    #[test]
    fn test_name_for() {
        assert_eq!(name_for(&CRL_NUMBER), Some("CRLNumber"));
        assert_eq!(name_for(&CERTIFICATE_ISSUER), Some("CertificateIssuer"));
        assert_eq!(name_for(&ObjectIdentifier::new_unwrap("2.5.29.99")), None);
    }

    #[test]
    fn test_build_extension() {
        let decoded = build_extension(BASIC_CONSTRAINTS, true, vec![0x30, 0x00]).unwrap();
        assert_eq!(decoded.name(), "BasicConstraints");
        assert!(decoded.critical());
        match decoded.payload {
            ExtensionPayload::BasicConstraints(bc) => assert!(!bc.ca),
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_all_entries_distinct() {
        for (i, a) in REGISTRY.iter().enumerate() {
            for b in &REGISTRY[i + 1..] {
                assert_ne!(a.oid, b.oid);
                assert!(!a.name.eq_ignore_ascii_case(b.name));
            }
        }
    }
}
