// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Extension codec and the per-object extension set.
//!
//! ```asn1
//! Extensions ::= SEQUENCE SIZE (1..MAX) OF Extension
//!
//! Extension ::= SEQUENCE {
//!     extnID      OBJECT IDENTIFIER,
//!     critical    BOOLEAN DEFAULT FALSE,
//!     extnValue   OCTET STRING
//! }
//! ```
//!
//! Every extension is carried twice: the raw [`Extension`] (OID, criticality,
//! opaque extnValue bytes) and, when the OID is registered, a typed
//! [`ExtensionPayload`]. Encoding always uses the raw form, so a decoded set
//! re-encodes byte-identically; the typed form is re-serialized into the raw
//! form only when a payload is mutated.

pub mod pkix;

use std::fmt;

use const_oid::ObjectIdentifier;
use der::asn1::OctetString;
use der::{Decode, DecodeValue, Encode, EncodeValue, Header, Length, Reader, Tag, Writer};

use crate::constraints::NameConstraints;
use crate::name::general::GeneralNames;
use crate::oid;
use crate::time::Time;
use crate::Error;

use pkix::{
    AuthorityKeyIdentifier, BasicConstraints, CrlDistributionPoints, CrlNumber, CrlReason,
    ExtendedKeyUsage, KeyUsage, SubjectKeyIdentifier,
};

fn default_false() -> bool {
    false
}

// ============================================================================
// Extension
// ============================================================================

/// Raw X.509 extension: OID, criticality, opaque DER value.
#[derive(Debug, Clone, PartialEq, Eq, der::Sequence)]
pub struct Extension {
    /// Extension OID
    pub extn_id: ObjectIdentifier,

    /// Criticality flag; omitted from the encoding when false (DEFAULT FALSE)
    #[asn1(default = "default_false")]
    pub critical: bool,

    /// Inner DER value, wrapped in an OCTET STRING on the wire
    pub extn_value: OctetString,
}

impl Extension {
    /// Build an extension from inner value bytes.
    pub fn new(extn_id: ObjectIdentifier, critical: bool, value: Vec<u8>) -> der::Result<Self> {
        Ok(Self {
            extn_id,
            critical,
            extn_value: OctetString::new(value)?,
        })
    }

    /// The inner extnValue bytes (octet-string wrapper stripped).
    pub fn value(&self) -> &[u8] {
        self.extn_value.as_bytes()
    }
}

// ============================================================================
// ExtensionPayload
// ============================================================================

/// Typed representation of a known extension value.
///
/// Unregistered OIDs decode to [`ExtensionPayload::Unknown`] carrying the
/// inner value bytes verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionPayload {
    /// BasicConstraints (2.5.29.19)
    BasicConstraints(BasicConstraints),
    /// KeyUsage (2.5.29.15)
    KeyUsage(KeyUsage),
    /// ExtendedKeyUsage (2.5.29.37)
    ExtendedKeyUsage(ExtendedKeyUsage),
    /// SubjectKeyIdentifier (2.5.29.14)
    SubjectKeyIdentifier(SubjectKeyIdentifier),
    /// AuthorityKeyIdentifier (2.5.29.35)
    AuthorityKeyIdentifier(AuthorityKeyIdentifier),
    /// SubjectAltName (2.5.29.17)
    SubjectAltName(GeneralNames),
    /// IssuerAltName (2.5.29.18)
    IssuerAltName(GeneralNames),
    /// NameConstraints (2.5.29.30)
    NameConstraints(NameConstraints),
    /// PolicyConstraints (2.5.29.36)
    PolicyConstraints(pkix::PolicyConstraints),
    /// CRLDistributionPoints (2.5.29.31)
    CrlDistributionPoints(CrlDistributionPoints),
    /// CRLNumber (2.5.29.20)
    CrlNumber(CrlNumber),
    /// ReasonCode (2.5.29.21, per-entry)
    CrlReason(CrlReason),
    /// InvalidityDate (2.5.29.24, per-entry)
    InvalidityDate(Time),
    /// CertificateIssuer (2.5.29.29, per-entry)
    CertificateIssuer(GeneralNames),
    /// Any extension without a registered decoder
    Unknown(Vec<u8>),
}

impl ExtensionPayload {
    /// Friendly variant name, matching the registry.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BasicConstraints(_) => "BasicConstraints",
            Self::KeyUsage(_) => "KeyUsage",
            Self::ExtendedKeyUsage(_) => "ExtendedKeyUsage",
            Self::SubjectKeyIdentifier(_) => "SubjectKeyIdentifier",
            Self::AuthorityKeyIdentifier(_) => "AuthorityKeyIdentifier",
            Self::SubjectAltName(_) => "SubjectAlternativeName",
            Self::IssuerAltName(_) => "IssuerAlternativeName",
            Self::NameConstraints(_) => "NameConstraints",
            Self::PolicyConstraints(_) => "PolicyConstraints",
            Self::CrlDistributionPoints(_) => "CRLDistributionPoints",
            Self::CrlNumber(_) => "CRLNumber",
            Self::CrlReason(_) => "ReasonCode",
            Self::InvalidityDate(_) => "InvalidityDate",
            Self::CertificateIssuer(_) => "CertificateIssuer",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// Extension OID for this payload, if it is a registered kind.
    pub fn oid(&self) -> Option<ObjectIdentifier> {
        match self {
            Self::BasicConstraints(_) => Some(oid::BASIC_CONSTRAINTS),
            Self::KeyUsage(_) => Some(oid::KEY_USAGE),
            Self::ExtendedKeyUsage(_) => Some(oid::EXTENDED_KEY_USAGE),
            Self::SubjectKeyIdentifier(_) => Some(oid::SUBJECT_KEY_IDENTIFIER),
            Self::AuthorityKeyIdentifier(_) => Some(oid::AUTHORITY_KEY_IDENTIFIER),
            Self::SubjectAltName(_) => Some(oid::SUBJECT_ALT_NAME),
            Self::IssuerAltName(_) => Some(oid::ISSUER_ALT_NAME),
            Self::NameConstraints(_) => Some(oid::NAME_CONSTRAINTS),
            Self::PolicyConstraints(_) => Some(oid::POLICY_CONSTRAINTS),
            Self::CrlDistributionPoints(_) => Some(oid::CRL_DISTRIBUTION_POINTS),
            Self::CrlNumber(_) => Some(oid::CRL_NUMBER),
            Self::CrlReason(_) => Some(oid::CRL_REASON),
            Self::InvalidityDate(_) => Some(oid::INVALIDITY_DATE),
            Self::CertificateIssuer(_) => Some(oid::CERTIFICATE_ISSUER),
            Self::Unknown(_) => None,
        }
    }

    /// Serialize this payload back into inner extnValue bytes.
    pub fn to_value_bytes(&self) -> der::Result<Vec<u8>> {
        match self {
            Self::BasicConstraints(v) => v.to_der(),
            Self::KeyUsage(v) => v.to_der(),
            Self::ExtendedKeyUsage(v) => v.to_der(),
            Self::SubjectKeyIdentifier(v) => v.to_der(),
            Self::AuthorityKeyIdentifier(v) => v.to_der(),
            Self::SubjectAltName(v) => v.to_der(),
            Self::IssuerAltName(v) => v.to_der(),
            Self::NameConstraints(v) => v.to_der(),
            Self::PolicyConstraints(v) => v.to_der(),
            Self::CrlDistributionPoints(v) => v.to_der(),
            Self::CrlNumber(v) => v.to_der(),
            Self::CrlReason(v) => v.to_der(),
            Self::InvalidityDate(v) => v.to_der(),
            Self::CertificateIssuer(v) => v.to_der(),
            Self::Unknown(bytes) => Ok(bytes.clone()),
        }
    }

    // ------------------------------------------------------------------
    // Registry decoder entry points
    // ------------------------------------------------------------------

    pub(crate) fn decode_basic_constraints(bytes: &[u8]) -> der::Result<Self> {
        Ok(Self::BasicConstraints(BasicConstraints::from_der(bytes)?))
    }

    pub(crate) fn decode_key_usage(bytes: &[u8]) -> der::Result<Self> {
        Ok(Self::KeyUsage(KeyUsage::from_der(bytes)?))
    }

    pub(crate) fn decode_extended_key_usage(bytes: &[u8]) -> der::Result<Self> {
        Ok(Self::ExtendedKeyUsage(ExtendedKeyUsage::from_der(bytes)?))
    }

    pub(crate) fn decode_subject_key_identifier(bytes: &[u8]) -> der::Result<Self> {
        Ok(Self::SubjectKeyIdentifier(SubjectKeyIdentifier::from_der(
            bytes,
        )?))
    }

    pub(crate) fn decode_authority_key_identifier(bytes: &[u8]) -> der::Result<Self> {
        Ok(Self::AuthorityKeyIdentifier(
            AuthorityKeyIdentifier::from_der(bytes)?,
        ))
    }

    pub(crate) fn decode_subject_alt_name(bytes: &[u8]) -> der::Result<Self> {
        Ok(Self::SubjectAltName(GeneralNames::from_der(bytes)?))
    }

    pub(crate) fn decode_issuer_alt_name(bytes: &[u8]) -> der::Result<Self> {
        Ok(Self::IssuerAltName(GeneralNames::from_der(bytes)?))
    }

    pub(crate) fn decode_name_constraints(bytes: &[u8]) -> der::Result<Self> {
        Ok(Self::NameConstraints(NameConstraints::from_der(bytes)?))
    }

    pub(crate) fn decode_policy_constraints(bytes: &[u8]) -> der::Result<Self> {
        Ok(Self::PolicyConstraints(pkix::PolicyConstraints::from_der(
            bytes,
        )?))
    }

    pub(crate) fn decode_crl_distribution_points(bytes: &[u8]) -> der::Result<Self> {
        Ok(Self::CrlDistributionPoints(CrlDistributionPoints::from_der(
            bytes,
        )?))
    }

    pub(crate) fn decode_crl_number(bytes: &[u8]) -> der::Result<Self> {
        Ok(Self::CrlNumber(CrlNumber::from_der(bytes)?))
    }

    pub(crate) fn decode_crl_reason(bytes: &[u8]) -> der::Result<Self> {
        Ok(Self::CrlReason(CrlReason::from_der(bytes)?))
    }

    pub(crate) fn decode_invalidity_date(bytes: &[u8]) -> der::Result<Self> {
        Ok(Self::InvalidityDate(Time::from_der(bytes)?))
    }

    pub(crate) fn decode_certificate_issuer(bytes: &[u8]) -> der::Result<Self> {
        Ok(Self::CertificateIssuer(GeneralNames::from_der(bytes)?))
    }
}

// ============================================================================
// DecodedExtension
// ============================================================================

/// An extension paired with its typed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedExtension {
    /// Raw form, authoritative for encoding
    pub extension: Extension,
    /// Typed form, authoritative for field access
    pub payload: ExtensionPayload,
}

impl DecodedExtension {
    /// Promote a raw extension through the registry.
    ///
    /// Returns the decoded extension and whether it is critical-but-unknown.
    pub fn promote(extension: Extension) -> der::Result<(Self, bool)> {
        let (payload, unknown) = match oid::decoder_for(&extension.extn_id) {
            Some(decode) => (decode(extension.value())?, false),
            None => (
                ExtensionPayload::Unknown(extension.value().to_vec()),
                true,
            ),
        };
        let critical_unknown = unknown && extension.critical;
        Ok((Self { extension, payload }, critical_unknown))
    }

    /// Build a decoded extension from a typed payload.
    pub fn from_payload(
        extn_id: ObjectIdentifier,
        critical: bool,
        payload: ExtensionPayload,
    ) -> der::Result<Self> {
        let extension = Extension::new(extn_id, critical, payload.to_value_bytes()?)?;
        Ok(Self { extension, payload })
    }

    /// Friendly name if registered, dotted-decimal OID otherwise.
    pub fn name(&self) -> String {
        match oid::name_for(&self.extension.extn_id) {
            Some(name) => name.to_string(),
            None => self.extension.extn_id.to_string(),
        }
    }

    /// Extension OID.
    pub fn oid(&self) -> ObjectIdentifier {
        self.extension.extn_id
    }

    /// Criticality flag.
    pub fn critical(&self) -> bool {
        self.extension.critical
    }

    /// Re-serialize the typed payload into the raw extnValue.
    ///
    /// Must be called after any payload mutation so the raw form encodes the
    /// new state.
    pub fn resync(&mut self) -> der::Result<()> {
        self.extension.extn_value = OctetString::new(self.payload.to_value_bytes()?)?;
        Ok(())
    }
}

impl fmt::Display for DecodedExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}){}",
            self.name(),
            self.oid(),
            if self.critical() { " critical" } else { "" }
        )
    }
}

// ============================================================================
// ExtensionSet
// ============================================================================

/// Insertion-ordered extension collection for a certificate, CRL, or CRL
/// entry.
///
/// The `unsupported_critical` flag is sticky: once a critical extension with
/// no registered decoder has been seen, it stays set for the lifetime of the
/// set, through inserts and deletes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtensionSet {
    items: Vec<DecodedExtension>,
    unsupported_critical: bool,
}

impl ExtensionSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw extensions, promoting each through the registry.
    ///
    /// A repeated OID is rejected; RFC 5280 forbids duplicate extensions.
    pub fn from_raw(raw: Vec<Extension>) -> crate::Result<Self> {
        let mut set = Self::new();
        for extension in raw {
            if set.get_by_oid(&extension.extn_id).is_some() {
                log::error!("duplicate extension {}", extension.extn_id);
                return Err(Error::duplicate_extension(extension.extn_id.to_string()));
            }
            let (decoded, critical_unknown) = DecodedExtension::promote(extension)?;
            if critical_unknown {
                log::debug!("unsupported critical extension {}", decoded.oid());
                set.unsupported_critical = true;
            }
            set.items.push(decoded);
        }
        Ok(set)
    }

    /// Insert a typed payload, replacing any existing extension with the same
    /// OID in place.
    pub fn insert(
        &mut self,
        extn_id: ObjectIdentifier,
        critical: bool,
        payload: ExtensionPayload,
    ) -> crate::Result<()> {
        let decoded = DecodedExtension::from_payload(extn_id, critical, payload)?;
        if critical && matches!(decoded.payload, ExtensionPayload::Unknown(_)) {
            self.unsupported_critical = true;
        }
        match self.items.iter_mut().find(|item| item.oid() == extn_id) {
            Some(slot) => *slot = decoded,
            None => self.items.push(decoded),
        }
        Ok(())
    }

    /// Look up by OID.
    pub fn get_by_oid(&self, extn_id: &ObjectIdentifier) -> Option<&DecodedExtension> {
        self.items.iter().find(|item| item.oid() == *extn_id)
    }

    /// Mutable lookup by OID. Callers must [`DecodedExtension::resync`] after
    /// changing the payload.
    pub fn get_mut_by_oid(
        &mut self,
        extn_id: &ObjectIdentifier,
    ) -> Option<&mut DecodedExtension> {
        self.items.iter_mut().find(|item| item.oid() == *extn_id)
    }

    /// Look up by friendly name (case-insensitive) or dotted-decimal OID.
    pub fn get_by_name(&self, name: &str) -> Option<&DecodedExtension> {
        if let Some(oid) = oid::oid_for(name) {
            return self.get_by_oid(&oid);
        }
        if let Ok(oid) = name.parse::<ObjectIdentifier>() {
            return self.get_by_oid(&oid);
        }
        None
    }

    /// Mutable lookup by friendly name or dotted-decimal OID.
    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut DecodedExtension> {
        let oid = oid::oid_for(name).or_else(|| name.parse::<ObjectIdentifier>().ok())?;
        self.get_mut_by_oid(&oid)
    }

    /// Remove an extension by OID. The sticky flag is not cleared.
    pub fn delete(&mut self, extn_id: &ObjectIdentifier) -> crate::Result<()> {
        let len_before = self.items.len();
        self.items.retain(|item| item.oid() != *extn_id);
        if self.items.len() == len_before {
            return Err(Error::extension_not_present(extn_id.to_string()));
        }
        Ok(())
    }

    /// All extensions in insertion order.
    pub fn all(&self) -> &[DecodedExtension] {
        &self.items
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, DecodedExtension> {
        self.items.iter()
    }

    /// True once any unrecognized critical extension has been seen.
    pub fn has_unsupported_critical(&self) -> bool {
        self.unsupported_critical
    }

    /// Number of extensions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the set holds no extensions.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> DecodeValue<'a> for ExtensionSet {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        let mut raw = Vec::new();
        reader.read_nested(header.length, |seq_reader| {
            while !seq_reader.is_finished() {
                raw.push(Extension::decode(seq_reader)?);
            }
            Ok(())
        })?;
        Self::from_raw(raw).map_err(|_| Tag::Sequence.value_error())
    }
}

impl EncodeValue for ExtensionSet {
    fn value_len(&self) -> der::Result<Length> {
        let mut len = Length::ZERO;
        for item in &self.items {
            len = (len + item.extension.encoded_len()?)?;
        }
        Ok(len)
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        for item in &self.items {
            item.extension.encode(writer)?;
        }
        Ok(())
    }
}

impl der::FixedTag for ExtensionSet {
    const TAG: Tag = Tag::Sequence;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtensionError;
    use hex_literal::hex;

    fn bc_payload(ca: bool) -> ExtensionPayload {
        ExtensionPayload::BasicConstraints(if ca {
            BasicConstraints::ca(None)
        } else {
            BasicConstraints::end_entity()
        })
    }

    #[test]
    fn test_insert_and_get() {
        let mut set = ExtensionSet::new();
        set.insert(oid::BASIC_CONSTRAINTS, true, bc_payload(true))
            .unwrap();
        set.insert(oid::KEY_USAGE, true, ExtensionPayload::KeyUsage(KeyUsage::new(KeyUsage::KEY_CERT_SIGN)))
            .unwrap();

        assert_eq!(set.len(), 2);
        let bc = set.get_by_oid(&oid::BASIC_CONSTRAINTS).unwrap();
        assert!(bc.critical());
        assert_eq!(bc.name(), "BasicConstraints");

        // Name-addressed lookup is case-insensitive; OID strings work too.
        assert!(set.get_by_name("basicconstraints").is_some());
        assert!(set.get_by_name("2.5.29.15").is_some());
        assert!(set.get_by_name("NoSuchThing").is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let mut set = ExtensionSet::new();
        set.insert(oid::BASIC_CONSTRAINTS, true, bc_payload(true))
            .unwrap();
        set.insert(oid::BASIC_CONSTRAINTS, false, bc_payload(false))
            .unwrap();
        assert_eq!(set.len(), 1);
        assert!(!set.get_by_oid(&oid::BASIC_CONSTRAINTS).unwrap().critical());
    }

    #[test]
    fn test_delete() {
        let mut set = ExtensionSet::new();
        set.insert(oid::BASIC_CONSTRAINTS, true, bc_payload(true))
            .unwrap();
        set.delete(&oid::BASIC_CONSTRAINTS).unwrap();
        assert!(set.is_empty());
        assert!(set.delete(&oid::BASIC_CONSTRAINTS).is_err());
    }

    #[test]
    fn test_duplicate_rejected_on_decode() {
        let ext = Extension::new(oid::BASIC_CONSTRAINTS, false, hex!("3000").to_vec()).unwrap();
        let err = ExtensionSet::from_raw(vec![ext.clone(), ext]).unwrap_err();
        assert!(matches!(
            err,
            Error::Extension(ExtensionError::Duplicate(_))
        ));
    }

    #[test]
    fn test_unsupported_critical_is_sticky() {
        let unknown_oid = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.99999.1");

        // Non-critical unknown: flag stays clear.
        let ext = Extension::new(unknown_oid, false, hex!("0500").to_vec()).unwrap();
        let set = ExtensionSet::from_raw(vec![ext]).unwrap();
        assert!(!set.has_unsupported_critical());

        // Critical unknown: flag set, and deleting the extension keeps it.
        let ext = Extension::new(unknown_oid, true, hex!("0500").to_vec()).unwrap();
        let mut set = ExtensionSet::from_raw(vec![ext]).unwrap();
        assert!(set.has_unsupported_critical());
        set.delete(&unknown_oid).unwrap();
        assert!(set.has_unsupported_critical());
    }

    #[test]
    fn test_roundtrip_preserves_order_and_bytes() {
        let raw = vec![
            Extension::new(oid::KEY_USAGE, true, hex!("03020106").to_vec()).unwrap(),
            Extension::new(oid::BASIC_CONSTRAINTS, true, hex!("30060101FF020100").to_vec())
                .unwrap(),
        ];
        let set = ExtensionSet::from_raw(raw).unwrap();
        let der = set.to_der().unwrap();
        let decoded = ExtensionSet::from_der(&der).unwrap();
        assert_eq!(decoded.to_der().unwrap(), der);
        // Insertion order survives.
        assert_eq!(decoded.all()[0].name(), "KeyUsage");
        assert_eq!(decoded.all()[1].name(), "BasicConstraints");
    }

    #[test]
    fn test_critical_flag_elided_when_false() {
        // DEFAULT FALSE: non-critical extensions carry no BOOLEAN.
        let ext = Extension::new(oid::BASIC_CONSTRAINTS, false, hex!("3000").to_vec()).unwrap();
        let der = ext.to_der().unwrap();
        assert!(!der.windows(3).any(|w| w == hex!("010100")));

        let ext = Extension::new(oid::BASIC_CONSTRAINTS, true, hex!("3000").to_vec()).unwrap();
        let der = ext.to_der().unwrap();
        assert!(der.windows(3).any(|w| w == hex!("0101FF")));
    }

    #[test]
    fn test_promote_typed_payload() {
        let ext =
            Extension::new(oid::BASIC_CONSTRAINTS, true, hex!("30060101FF020100").to_vec())
                .unwrap();
        let (decoded, critical_unknown) = DecodedExtension::promote(ext).unwrap();
        assert!(!critical_unknown);
        match decoded.payload {
            ExtensionPayload::BasicConstraints(bc) => {
                assert!(bc.ca);
                assert_eq!(bc.path_len_constraint, Some(0));
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_resync_after_mutation() {
        let mut set = ExtensionSet::new();
        set.insert(
            oid::BASIC_CONSTRAINTS,
            true,
            ExtensionPayload::BasicConstraints(BasicConstraints::ca(Some(3))),
        )
        .unwrap();

        let item = set.get_mut_by_oid(&oid::BASIC_CONSTRAINTS).unwrap();
        if let ExtensionPayload::BasicConstraints(bc) = &mut item.payload {
            bc.path_len_constraint = Some(1);
        }
        item.resync().unwrap();
        assert_eq!(item.extension.value(), hex!("30060101FF020101"));
    }
}
