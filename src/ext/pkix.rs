// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Typed models for the standard PKIX extensions.
//!
//! Each type decodes from / encodes to the inner bytes of the
//! `extnValue OCTET STRING`; the registry in [`crate::oid`] wires them to
//! their OIDs.

use std::fmt;

use const_oid::ObjectIdentifier;
use der::{
    asn1::{BitString, OctetString, Uint},
    Choice, Decode, DecodeValue, Encode, EncodeValue, Enumerated, Header, Length, Reader,
    Sequence, Tag, Writer,
};

use crate::name::general::GeneralNames;
use crate::name::RelativeDistinguishedName;

fn default_false() -> bool {
    false
}

// ============================================================================
// BasicConstraints - RFC 5280 Section 4.2.1.9
// ============================================================================

/// BasicConstraints extension.
///
/// ```asn1
/// BasicConstraints ::= SEQUENCE {
///     cA                      BOOLEAN DEFAULT FALSE,
///     pathLenConstraint       INTEGER (0..MAX) OPTIONAL
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Sequence)]
pub struct BasicConstraints {
    /// Whether the subject may act as a CA
    #[asn1(default = "default_false")]
    pub ca: bool,

    /// Maximum number of intermediate certificates below this one.
    /// Only meaningful when `ca` is true.
    #[asn1(optional = "true")]
    pub path_len_constraint: Option<u8>,
}

impl BasicConstraints {
    /// A CA constraint with an optional path-length limit.
    pub fn ca(path_len_constraint: Option<u8>) -> Self {
        Self {
            ca: true,
            path_len_constraint,
        }
    }

    /// An end-entity constraint.
    pub fn end_entity() -> Self {
        Self::default()
    }
}

// ============================================================================
// KeyUsage - RFC 5280 Section 4.2.1.3
// ============================================================================

/// KeyUsage extension: a BIT STRING of up to nine flags, stored MSB-first
/// in a `u16` (bit 0 of the ASN.1 BIT STRING is the most significant bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyUsage {
    /// Raw flag bits
    pub bits: u16,
}

impl KeyUsage {
    /// digitalSignature (bit 0)
    pub const DIGITAL_SIGNATURE: u16 = 1 << 15;
    /// nonRepudiation / contentCommitment (bit 1)
    pub const NON_REPUDIATION: u16 = 1 << 14;
    /// keyEncipherment (bit 2)
    pub const KEY_ENCIPHERMENT: u16 = 1 << 13;
    /// dataEncipherment (bit 3)
    pub const DATA_ENCIPHERMENT: u16 = 1 << 12;
    /// keyAgreement (bit 4)
    pub const KEY_AGREEMENT: u16 = 1 << 11;
    /// keyCertSign (bit 5)
    pub const KEY_CERT_SIGN: u16 = 1 << 10;
    /// cRLSign (bit 6)
    pub const CRL_SIGN: u16 = 1 << 9;
    /// encipherOnly (bit 7)
    pub const ENCIPHER_ONLY: u16 = 1 << 8;
    /// decipherOnly (bit 8)
    pub const DECIPHER_ONLY: u16 = 1 << 7;

    /// Create a KeyUsage from raw flag bits.
    pub const fn new(bits: u16) -> Self {
        Self { bits }
    }

    /// Check whether all of the given flags are set.
    pub const fn has(&self, flags: u16) -> bool {
        self.bits & flags == flags
    }

    /// digitalSignature flag
    pub const fn digital_signature(&self) -> bool {
        self.has(Self::DIGITAL_SIGNATURE)
    }

    /// keyCertSign flag
    pub const fn key_cert_sign(&self) -> bool {
        self.has(Self::KEY_CERT_SIGN)
    }

    /// cRLSign flag
    pub const fn crl_sign(&self) -> bool {
        self.has(Self::CRL_SIGN)
    }

    /// Build the minimal-length BIT STRING for these flags.
    fn to_bit_string(&self) -> der::Result<BitString> {
        if self.bits == 0 {
            return BitString::new(0, Vec::new());
        }
        let trailing = self.bits.trailing_zeros() as u8;
        if self.bits & 0x00FF == 0 {
            BitString::new(trailing - 8, vec![(self.bits >> 8) as u8])
        } else {
            BitString::new(trailing, self.bits.to_be_bytes().to_vec())
        }
    }
}

impl<'a> DecodeValue<'a> for KeyUsage {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        let bit_string = BitString::decode_value(reader, header)?;
        let raw = bit_string.raw_bytes();
        let mut bits: u16 = 0;
        if let Some(b) = raw.first() {
            bits |= (*b as u16) << 8;
        }
        if let Some(b) = raw.get(1) {
            bits |= *b as u16;
        }
        Ok(Self { bits })
    }
}

impl EncodeValue for KeyUsage {
    fn value_len(&self) -> der::Result<Length> {
        self.to_bit_string()?.value_len()
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        self.to_bit_string()?.encode_value(writer)
    }
}

impl der::FixedTag for KeyUsage {
    const TAG: Tag = Tag::BitString;
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        let table: &[(u16, &str)] = &[
            (Self::DIGITAL_SIGNATURE, "digitalSignature"),
            (Self::NON_REPUDIATION, "nonRepudiation"),
            (Self::KEY_ENCIPHERMENT, "keyEncipherment"),
            (Self::DATA_ENCIPHERMENT, "dataEncipherment"),
            (Self::KEY_AGREEMENT, "keyAgreement"),
            (Self::KEY_CERT_SIGN, "keyCertSign"),
            (Self::CRL_SIGN, "cRLSign"),
            (Self::ENCIPHER_ONLY, "encipherOnly"),
            (Self::DECIPHER_ONLY, "decipherOnly"),
        ];
        for (flag, label) in table {
            if self.has(*flag) {
                parts.push(*label);
            }
        }
        write!(f, "{}", parts.join(", "))
    }
}

// ============================================================================
// ExtendedKeyUsage - RFC 5280 Section 4.2.1.12
// ============================================================================

/// ExtendedKeyUsage extension: SEQUENCE OF KeyPurposeId (OID).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtendedKeyUsage {
    /// Key purpose OIDs
    pub usages: Vec<ObjectIdentifier>,
}

impl ExtendedKeyUsage {
    /// Create an ExtendedKeyUsage from a list of purpose OIDs.
    pub fn new(usages: Vec<ObjectIdentifier>) -> Self {
        Self { usages }
    }

    /// Check whether the given purpose (or anyExtendedKeyUsage) is present.
    pub fn permits(&self, usage: ObjectIdentifier) -> bool {
        self.usages
            .iter()
            .any(|u| *u == usage || *u == eku_oids::ANY_EXTENDED_KEY_USAGE)
    }
}

impl<'a> DecodeValue<'a> for ExtendedKeyUsage {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        let mut usages = Vec::new();
        reader.read_nested(header.length, |seq_reader| {
            while !seq_reader.is_finished() {
                usages.push(ObjectIdentifier::decode(seq_reader)?);
            }
            Ok(())
        })?;
        Ok(Self { usages })
    }
}

impl EncodeValue for ExtendedKeyUsage {
    fn value_len(&self) -> der::Result<Length> {
        let mut len = Length::ZERO;
        for usage in &self.usages {
            len = (len + usage.encoded_len()?)?;
        }
        Ok(len)
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        for usage in &self.usages {
            usage.encode(writer)?;
        }
        Ok(())
    }
}

impl der::FixedTag for ExtendedKeyUsage {
    const TAG: Tag = Tag::Sequence;
}

/// Well-known ExtendedKeyUsage purpose OIDs.
pub mod eku_oids {
    use const_oid::ObjectIdentifier;

    /// anyExtendedKeyUsage - 2.5.29.37.0
    pub const ANY_EXTENDED_KEY_USAGE: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("2.5.29.37.0");

    /// id-kp-serverAuth - 1.3.6.1.5.5.7.3.1
    pub const SERVER_AUTH: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.1");

    /// id-kp-clientAuth - 1.3.6.1.5.5.7.3.2
    pub const CLIENT_AUTH: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.2");

    /// id-kp-codeSigning - 1.3.6.1.5.5.7.3.3
    pub const CODE_SIGNING: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.3");

    /// id-kp-emailProtection - 1.3.6.1.5.5.7.3.4
    pub const EMAIL_PROTECTION: ObjectIdentifier =
        ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.4");

    /// id-kp-timeStamping - 1.3.6.1.5.5.7.3.8
    pub const TIME_STAMPING: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.8");

    /// id-kp-OCSPSigning - 1.3.6.1.5.5.7.3.9
    pub const OCSP_SIGNING: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.9");
}

// ============================================================================
// SubjectKeyIdentifier / AuthorityKeyIdentifier - RFC 5280 4.2.1.2 / 4.2.1.1
// ============================================================================

/// SubjectKeyIdentifier extension: an OCTET STRING key identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectKeyIdentifier {
    /// Key identifier bytes
    pub key_identifier: Vec<u8>,
}

impl<'a> DecodeValue<'a> for SubjectKeyIdentifier {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        let key_identifier = reader.read_vec(header.length)?;
        Ok(Self { key_identifier })
    }
}

impl EncodeValue for SubjectKeyIdentifier {
    fn value_len(&self) -> der::Result<Length> {
        self.key_identifier.len().try_into()
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        writer.write(&self.key_identifier)
    }
}

impl der::FixedTag for SubjectKeyIdentifier {
    const TAG: Tag = Tag::OctetString;
}

/// AuthorityKeyIdentifier extension.
///
/// ```asn1
/// AuthorityKeyIdentifier ::= SEQUENCE {
///     keyIdentifier             [0] KeyIdentifier           OPTIONAL,
///     authorityCertIssuer       [1] GeneralNames            OPTIONAL,
///     authorityCertSerialNumber [2] CertificateSerialNumber OPTIONAL
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Sequence)]
pub struct AuthorityKeyIdentifier {
    /// Identifier of the issuing CA's public key
    #[asn1(context_specific = "0", optional = "true", tag_mode = "IMPLICIT")]
    pub key_identifier: Option<OctetString>,

    /// Issuer of the issuing CA's certificate
    #[asn1(
        context_specific = "1",
        optional = "true",
        tag_mode = "IMPLICIT",
        constructed = "true"
    )]
    pub authority_cert_issuer: Option<GeneralNames>,

    /// Serial number of the issuing CA's certificate
    #[asn1(context_specific = "2", optional = "true", tag_mode = "IMPLICIT")]
    pub authority_cert_serial: Option<Uint>,
}

// ============================================================================
// PolicyConstraints - RFC 5280 Section 4.2.1.11
// ============================================================================

/// PolicyConstraints extension.
///
/// ```asn1
/// PolicyConstraints ::= SEQUENCE {
///     requireExplicitPolicy [0] SkipCerts OPTIONAL,
///     inhibitPolicyMapping  [1] SkipCerts OPTIONAL
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Sequence)]
pub struct PolicyConstraints {
    /// Certificates to skip before explicit policy is required
    #[asn1(context_specific = "0", optional = "true", tag_mode = "IMPLICIT")]
    pub require_explicit_policy: Option<u8>,

    /// Certificates to skip before policy mapping is inhibited
    #[asn1(context_specific = "1", optional = "true", tag_mode = "IMPLICIT")]
    pub inhibit_policy_mapping: Option<u8>,
}

// ============================================================================
// CRLDistributionPoints - RFC 5280 Section 4.2.1.13
// ============================================================================

/// DistributionPointName CHOICE.
#[derive(Debug, Clone, PartialEq, Eq, Choice)]
pub enum DistributionPointName {
    /// fullName `[0]` - list of names for the distribution point
    #[asn1(context_specific = "0", tag_mode = "IMPLICIT", constructed = "true")]
    FullName(GeneralNames),

    /// nameRelativeToCRLIssuer `[1]` - single RDN appended to the CRL issuer
    #[asn1(context_specific = "1", tag_mode = "IMPLICIT", constructed = "true")]
    NameRelativeToCrlIssuer(RelativeDistinguishedName),
}

/// One CRL distribution point.
#[derive(Debug, Clone, PartialEq, Eq, Sequence)]
pub struct DistributionPoint {
    /// Where the CRL can be obtained
    #[asn1(
        context_specific = "0",
        optional = "true",
        tag_mode = "EXPLICIT",
        constructed = "true"
    )]
    pub distribution_point: Option<DistributionPointName>,

    /// Revocation reasons covered by this point (ReasonFlags BIT STRING)
    #[asn1(context_specific = "1", optional = "true", tag_mode = "IMPLICIT")]
    pub reasons: Option<BitString>,

    /// CRL issuer, when different from the certificate issuer
    #[asn1(
        context_specific = "2",
        optional = "true",
        tag_mode = "IMPLICIT",
        constructed = "true"
    )]
    pub crl_issuer: Option<GeneralNames>,
}

/// CRLDistributionPoints extension: SEQUENCE OF DistributionPoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CrlDistributionPoints {
    /// Distribution points
    pub points: Vec<DistributionPoint>,
}

impl<'a> DecodeValue<'a> for CrlDistributionPoints {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        let mut points = Vec::new();
        reader.read_nested(header.length, |seq_reader| {
            while !seq_reader.is_finished() {
                points.push(DistributionPoint::decode(seq_reader)?);
            }
            Ok(())
        })?;
        Ok(Self { points })
    }
}

impl EncodeValue for CrlDistributionPoints {
    fn value_len(&self) -> der::Result<Length> {
        let mut len = Length::ZERO;
        for point in &self.points {
            len = (len + point.encoded_len()?)?;
        }
        Ok(len)
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        for point in &self.points {
            point.encode(writer)?;
        }
        Ok(())
    }
}

impl der::FixedTag for CrlDistributionPoints {
    const TAG: Tag = Tag::Sequence;
}

// ============================================================================
// CRL extensions - RFC 5280 Section 5.2 / 5.3
// ============================================================================

/// CRLNumber extension: a monotonically increasing INTEGER.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrlNumber {
    /// The CRL number (unsigned, big-endian)
    pub number: Uint,
}

impl CrlNumber {
    /// Create a CrlNumber from big-endian bytes.
    pub fn new(bytes: &[u8]) -> der::Result<Self> {
        Ok(Self {
            number: Uint::new(bytes)?,
        })
    }

    /// The number as big-endian bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.number.as_bytes()
    }
}

impl<'a> DecodeValue<'a> for CrlNumber {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        Ok(Self {
            number: Uint::decode_value(reader, header)?,
        })
    }
}

impl EncodeValue for CrlNumber {
    fn value_len(&self) -> der::Result<Length> {
        self.number.value_len()
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        self.number.encode_value(writer)
    }
}

impl der::FixedTag for CrlNumber {
    const TAG: Tag = Tag::Integer;
}

/// CRLReason entry extension - RFC 5280 Section 5.3.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enumerated)]
#[asn1(type = "ENUMERATED")]
#[repr(u32)]
pub enum CrlReason {
    /// unspecified (0)
    Unspecified = 0,
    /// keyCompromise (1)
    KeyCompromise = 1,
    /// cACompromise (2)
    CaCompromise = 2,
    /// affiliationChanged (3)
    AffiliationChanged = 3,
    /// superseded (4)
    Superseded = 4,
    /// cessationOfOperation (5)
    CessationOfOperation = 5,
    /// certificateHold (6)
    CertificateHold = 6,
    /// removeFromCRL (8)
    RemoveFromCrl = 8,
    /// privilegeWithdrawn (9)
    PrivilegeWithdrawn = 9,
    /// aACompromise (10)
    AaCompromise = 10,
}

impl CrlReason {
    /// Map a raw reason code to its variant, if defined by RFC 5280.
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Unspecified),
            1 => Some(Self::KeyCompromise),
            2 => Some(Self::CaCompromise),
            3 => Some(Self::AffiliationChanged),
            4 => Some(Self::Superseded),
            5 => Some(Self::CessationOfOperation),
            6 => Some(Self::CertificateHold),
            8 => Some(Self::RemoveFromCrl),
            9 => Some(Self::PrivilegeWithdrawn),
            10 => Some(Self::AaCompromise),
            _ => None,
        }
    }
}

impl fmt::Display for CrlReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CrlReason::Unspecified => "unspecified",
            CrlReason::KeyCompromise => "keyCompromise",
            CrlReason::CaCompromise => "cACompromise",
            CrlReason::AffiliationChanged => "affiliationChanged",
            CrlReason::Superseded => "superseded",
            CrlReason::CessationOfOperation => "cessationOfOperation",
            CrlReason::CertificateHold => "certificateHold",
            CrlReason::RemoveFromCrl => "removeFromCRL",
            CrlReason::PrivilegeWithdrawn => "privilegeWithdrawn",
            CrlReason::AaCompromise => "aACompromise",
        };
        write!(f, "{}", label)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_basic_constraints_defaults() {
        // Empty SEQUENCE: cA defaults to false.
        let bc = BasicConstraints::from_der(&hex!("3000")).unwrap();
        assert!(!bc.ca);
        assert!(bc.path_len_constraint.is_none());

        // cA TRUE, no path length.
        let bc = BasicConstraints::from_der(&hex!("30030101FF")).unwrap();
        assert!(bc.ca);

        // cA TRUE with pathLenConstraint 0.
        let bc = BasicConstraints::from_der(&hex!("30060101FF020100")).unwrap();
        assert!(bc.ca);
        assert_eq!(bc.path_len_constraint, Some(0));
    }

    #[test]
    fn test_basic_constraints_critical_elision_roundtrip() {
        // DEFAULT FALSE must be elided, so end-entity encodes as empty SEQ.
        let bc = BasicConstraints::end_entity();
        assert_eq!(bc.to_der().unwrap(), hex!("3000"));

        let bc = BasicConstraints::ca(Some(3));
        let der = bc.to_der().unwrap();
        assert_eq!(BasicConstraints::from_der(&der).unwrap(), bc);
    }

    #[test]
    fn test_key_usage_decode() {
        // BIT STRING { digitalSignature, keyEncipherment }: 03 02 05 A0
        let ku = KeyUsage::from_der(&hex!("030205A0")).unwrap();
        assert!(ku.digital_signature());
        assert!(ku.has(KeyUsage::KEY_ENCIPHERMENT));
        assert!(!ku.key_cert_sign());
    }

    #[test]
    fn test_key_usage_roundtrip() {
        let ku = KeyUsage::new(KeyUsage::DIGITAL_SIGNATURE | KeyUsage::KEY_ENCIPHERMENT);
        assert_eq!(ku.to_der().unwrap(), hex!("030205A0"));

        // keyCertSign + cRLSign: 03 02 01 06
        let ku = KeyUsage::new(KeyUsage::KEY_CERT_SIGN | KeyUsage::CRL_SIGN);
        assert_eq!(ku.to_der().unwrap(), hex!("03020106"));

        // decipherOnly needs a second byte: 03 03 07 00 80
        let ku = KeyUsage::new(KeyUsage::DECIPHER_ONLY);
        assert_eq!(ku.to_der().unwrap(), hex!("0303070080"));
        assert_eq!(KeyUsage::from_der(&hex!("0303070080")).unwrap(), ku);
    }

    #[test]
    fn test_extended_key_usage() {
        let eku = ExtendedKeyUsage::new(vec![eku_oids::SERVER_AUTH, eku_oids::CLIENT_AUTH]);
        let der = eku.to_der().unwrap();
        let decoded = ExtendedKeyUsage::from_der(&der).unwrap();
        assert_eq!(decoded, eku);
        assert!(decoded.permits(eku_oids::SERVER_AUTH));
        assert!(!decoded.permits(eku_oids::CODE_SIGNING));

        let any = ExtendedKeyUsage::new(vec![eku_oids::ANY_EXTENDED_KEY_USAGE]);
        assert!(any.permits(eku_oids::CODE_SIGNING));
    }

    #[test]
    fn test_subject_key_identifier_roundtrip() {
        let ski = SubjectKeyIdentifier {
            key_identifier: hex!("0123456789ABCDEF").to_vec(),
        };
        let der = ski.to_der().unwrap();
        assert_eq!(SubjectKeyIdentifier::from_der(&der).unwrap(), ski);
    }

    #[test]
    fn test_authority_key_identifier_roundtrip() {
        let aki = AuthorityKeyIdentifier {
            key_identifier: Some(OctetString::new(hex!("DEADBEEF").to_vec()).unwrap()),
            authority_cert_issuer: None,
            authority_cert_serial: Some(Uint::new(&hex!("01F4")).unwrap()),
        };
        let der = aki.to_der().unwrap();
        assert_eq!(AuthorityKeyIdentifier::from_der(&der).unwrap(), aki);
    }

    #[test]
    fn test_policy_constraints_roundtrip() {
        let pc = PolicyConstraints {
            require_explicit_policy: Some(0),
            inhibit_policy_mapping: Some(2),
        };
        let der = pc.to_der().unwrap();
        assert_eq!(PolicyConstraints::from_der(&der).unwrap(), pc);
    }

    #[test]
    fn test_crl_distribution_points_roundtrip() {
        use crate::name::general::GeneralName;

        let cdp = CrlDistributionPoints {
            points: vec![DistributionPoint {
                distribution_point: Some(DistributionPointName::FullName(GeneralNames::new(
                    vec![GeneralName::Uri("http://crl.example.com/ca.crl".to_string())],
                ))),
                reasons: None,
                crl_issuer: None,
            }],
        };
        let der = cdp.to_der().unwrap();
        let decoded = CrlDistributionPoints::from_der(&der).unwrap();
        assert_eq!(decoded, cdp);
    }

    #[test]
    fn test_crl_number_roundtrip() {
        let n = CrlNumber::new(&hex!("01E240")).unwrap();
        let der = n.to_der().unwrap();
        assert_eq!(CrlNumber::from_der(&der).unwrap(), n);
    }

    #[test]
    fn test_crl_reason() {
        let reason = CrlReason::KeyCompromise;
        let der = reason.to_der().unwrap();
        assert_eq!(der, hex!("0A0101"));
        assert_eq!(CrlReason::from_der(&der).unwrap(), reason);
        assert_eq!(reason.to_string(), "keyCompromise");
    }
}
