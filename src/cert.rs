// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! X.509 v3 certificate: builder, signed object, lifecycle.
//!
//! A certificate exists in one of two shapes. [`CertificateBuilder`] is the
//! mutable pre-signature form: fields and extensions can be set, changed and
//! deleted freely. [`Certificate`] is the signed form: it always originates
//! from a DER parse (either of external input or of the builder's own signing
//! output), retains the exact input bytes, and refuses every mutation. This
//! makes round-trips byte-exact by construction and keeps verification
//! honest, since it always runs over the retained to-be-signed byte range
//! rather than a re-encoding.
//!
//! ```asn1
//! Certificate  ::=  SEQUENCE  {
//!     tbsCertificate       TBSCertificate,
//!     signatureAlgorithm   AlgorithmIdentifier,
//!     signatureValue       BIT STRING
//! }
//! ```

use core::fmt;
use core::ops::Range;
use std::sync::Mutex;

use der::{
    asn1::{Any, BitString, UintRef},
    Decode, DecodeValue, Encode, EncodeValue, Header, Length, Reader, Tag, TagMode, TagNumber,
    Writer,
};
use spki::AlgorithmIdentifierOwned;

use crate::attr::{split_path, AttrAccess, AttrValue};
use crate::error::{EncodingError, Error, ExtensionError, Result, SignatureError, TimeError};
use crate::ext::{ExtensionPayload, ExtensionSet};
use crate::name::Name;
use crate::sign::{Signer, Verifier};
use crate::time::Validity;

/// SubjectPublicKeyInfo with owned algorithm parameters and key bits.
pub type SubjectPublicKeyInfo = spki::SubjectPublicKeyInfo<Any, BitString>;

// ============================================================================
// Version - RFC 5280 Section 4.1.2.1
// ============================================================================

/// X.509 certificate version.
///
/// ```asn1
/// Version  ::=  INTEGER  {  v1(0), v2(1), v3(2)  }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Version {
    /// Version 1 (value 0)
    V1 = 0,
    /// Version 2 (value 1)
    V2 = 1,
    /// Version 3 (value 2), the default for new certificates
    #[default]
    V3 = 2,
}

impl Version {
    /// Integer value of the version.
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Version from its integer value.
    pub fn from_value(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Version::V1),
            1 => Ok(Version::V2),
            2 => Ok(Version::V3),
            _ => Err(Error::InvalidVersion(value)),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::V1 => write!(f, "v1"),
            Version::V2 => write!(f, "v2"),
            Version::V3 => write!(f, "v3"),
        }
    }
}

// ============================================================================
// TbsCertificate - RFC 5280 Section 4.1
// ============================================================================

/// TBSCertificate: the signed portion of a certificate.
///
/// ```asn1
/// TBSCertificate  ::=  SEQUENCE  {
///     version         [0]  EXPLICIT Version DEFAULT v1,
///     serialNumber         CertificateSerialNumber,
///     signature            AlgorithmIdentifier,
///     issuer               Name,
///     validity             Validity,
///     subject              Name,
///     subjectPublicKeyInfo SubjectPublicKeyInfo,
///     issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
///     subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
///     extensions      [3]  EXPLICIT Extensions OPTIONAL
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TbsCertificate {
    /// Certificate version
    pub version: Version,

    /// Serial number, unsigned big-endian with no leading zero
    serial_number_bytes: Vec<u8>,

    /// Signature algorithm, must match the outer signatureAlgorithm
    pub signature: AlgorithmIdentifierOwned,

    /// Issuer distinguished name
    pub issuer: Name,

    /// Validity period
    pub validity: Validity,

    /// Subject distinguished name
    pub subject: Name,

    /// Subject public key
    pub subject_public_key_info: SubjectPublicKeyInfo,

    /// Issuer unique identifier (v2/v3 only, rarely used)
    pub issuer_unique_id: Option<BitString>,

    /// Subject unique identifier (v2/v3 only, rarely used)
    pub subject_unique_id: Option<BitString>,

    /// Extensions (v3 only)
    pub extensions: Option<ExtensionSet>,
}

impl TbsCertificate {
    /// Serial number bytes.
    pub fn serial_number(&self) -> &[u8] {
        &self.serial_number_bytes
    }

    /// Replace the serial number.
    pub fn set_serial_number(&mut self, serial: Vec<u8>) {
        self.serial_number_bytes = serial;
    }

    fn serial_number_ref(&self) -> der::Result<UintRef<'_>> {
        UintRef::new(&self.serial_number_bytes)
    }
}

impl<'a> DecodeValue<'a> for TbsCertificate {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        reader.read_nested(header.length, |reader| {
            let version = match reader
                .context_specific::<UintRef<'a>>(TagNumber::N0, TagMode::Explicit)?
            {
                Some(v) => {
                    let val = v.as_bytes();
                    if val.len() != 1 {
                        return Err(Tag::Integer.value_error());
                    }
                    Version::from_value(val[0]).map_err(|_| Tag::Integer.value_error())?
                }
                None => Version::V1,
            };

            let serial_number = UintRef::decode(reader)?;
            let serial_number_bytes = serial_number.as_bytes().to_vec();
            let signature = AlgorithmIdentifierOwned::decode(reader)?;
            let issuer = Name::decode(reader)?;
            let validity = Validity::decode(reader)?;
            let subject = Name::decode(reader)?;
            let subject_public_key_info = SubjectPublicKeyInfo::decode(reader)?;

            let issuer_unique_id =
                reader.context_specific::<BitString>(TagNumber::N1, TagMode::Implicit)?;
            let subject_unique_id =
                reader.context_specific::<BitString>(TagNumber::N2, TagMode::Implicit)?;
            let extensions =
                reader.context_specific::<ExtensionSet>(TagNumber::N3, TagMode::Explicit)?;

            Ok(Self {
                version,
                serial_number_bytes,
                signature,
                issuer,
                validity,
                subject,
                subject_public_key_info,
                issuer_unique_id,
                subject_unique_id,
                extensions,
            })
        })
    }
}

impl EncodeValue for TbsCertificate {
    fn value_len(&self) -> der::Result<Length> {
        let mut len = Length::ZERO;

        if self.version != Version::V1 {
            let version_bytes = [self.version.value()];
            let version_int = UintRef::new(&version_bytes)?;
            len = (len
                + der::asn1::ContextSpecific {
                    tag_number: TagNumber::N0,
                    tag_mode: TagMode::Explicit,
                    value: version_int,
                }
                .encoded_len()?)?;
        }

        len = (len + self.serial_number_ref()?.encoded_len()?)?;
        len = (len + self.signature.encoded_len()?)?;
        len = (len + self.issuer.encoded_len()?)?;
        len = (len + self.validity.encoded_len()?)?;
        len = (len + self.subject.encoded_len()?)?;
        len = (len + self.subject_public_key_info.encoded_len()?)?;

        if let Some(ref issuer_uid) = self.issuer_unique_id {
            len = (len
                + der::asn1::ContextSpecific {
                    tag_number: TagNumber::N1,
                    tag_mode: TagMode::Implicit,
                    value: issuer_uid.clone(),
                }
                .encoded_len()?)?;
        }

        if let Some(ref subject_uid) = self.subject_unique_id {
            len = (len
                + der::asn1::ContextSpecific {
                    tag_number: TagNumber::N2,
                    tag_mode: TagMode::Implicit,
                    value: subject_uid.clone(),
                }
                .encoded_len()?)?;
        }

        if let Some(ref extensions) = self.extensions {
            len = (len + Length::from(1u8))?;
            let ext_len = extensions.encoded_len()?;
            len = (len + ext_len.encoded_len()?)?;
            len = (len + ext_len)?;
        }

        Ok(len)
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        if self.version != Version::V1 {
            let version_bytes = [self.version.value()];
            let version_int = UintRef::new(&version_bytes)?;
            der::asn1::ContextSpecific {
                tag_number: TagNumber::N0,
                tag_mode: TagMode::Explicit,
                value: version_int,
            }
            .encode(writer)?;
        }

        self.serial_number_ref()?.encode(writer)?;
        self.signature.encode(writer)?;
        self.issuer.encode(writer)?;
        self.validity.encode(writer)?;
        self.subject.encode(writer)?;
        self.subject_public_key_info.encode(writer)?;

        if let Some(ref issuer_uid) = self.issuer_unique_id {
            der::asn1::ContextSpecific {
                tag_number: TagNumber::N1,
                tag_mode: TagMode::Implicit,
                value: issuer_uid.clone(),
            }
            .encode(writer)?;
        }

        if let Some(ref subject_uid) = self.subject_unique_id {
            der::asn1::ContextSpecific {
                tag_number: TagNumber::N2,
                tag_mode: TagMode::Implicit,
                value: subject_uid.clone(),
            }
            .encode(writer)?;
        }

        // Extensions are [3] EXPLICIT constructed.
        if let Some(ref extensions) = self.extensions {
            writer.write_byte(0xA3)?;
            let ext_bytes = extensions.to_der()?;
            Length::try_from(ext_bytes.len())?.encode(writer)?;
            writer.write(&ext_bytes)?;
        }

        Ok(())
    }
}

impl der::FixedTag for TbsCertificate {
    const TAG: Tag = Tag::Sequence;
}

// ============================================================================
// Attribute paths shared by builder and signed form
// ============================================================================

/// Strip the optional `x509.` / `info.` prefixes from an attribute path.
fn info_path(path: &str) -> &str {
    let rest = path.strip_prefix("x509.").unwrap_or(path);
    rest.strip_prefix("info.").unwrap_or(rest)
}

fn tbs_get(tbs: &TbsCertificate, full_path: &str) -> Result<AttrValue> {
    let path = info_path(full_path);
    let (head, rest) = split_path(path);
    match head {
        "version" if rest.is_none() => Ok(AttrValue::Int(tbs.version.value() as u64)),
        "serial_number" if rest.is_none() => {
            Ok(AttrValue::Bytes(tbs.serial_number().to_vec()))
        }
        "signature_algorithm" if rest.is_none() => Ok(AttrValue::Oid(tbs.signature.oid)),
        "issuer" if rest.is_none() => Ok(AttrValue::Name(tbs.issuer.clone())),
        "subject" if rest.is_none() => Ok(AttrValue::Name(tbs.subject.clone())),
        "validity" => match rest {
            Some("not_before") => Ok(AttrValue::Time(tbs.validity.not_before)),
            Some("not_after") => Ok(AttrValue::Time(tbs.validity.not_after)),
            _ => Err(Error::attr_not_recognized(full_path)),
        },
        "public_key" if rest.is_none() => Ok(AttrValue::Bytes(
            tbs.subject_public_key_info.to_der().map_err(Error::Asn1)?,
        )),
        "extensions" => {
            let extensions = tbs
                .extensions
                .as_ref()
                .ok_or_else(|| Error::extension_not_present(full_path))?;
            match rest {
                Some(rest) => extensions.get(rest),
                None => Err(Error::attr_not_recognized(full_path)),
            }
        }
        _ => Err(Error::attr_not_recognized(full_path)),
    }
}

fn tbs_set(tbs: &mut TbsCertificate, full_path: &str, value: AttrValue) -> Result<()> {
    let path = info_path(full_path);
    let (head, rest) = split_path(path);
    match head {
        "version" if rest.is_none() => {
            let v = value
                .as_int()
                .ok_or_else(|| Error::attr_type_mismatch(full_path, "integer"))?;
            tbs.version = Version::from_value(
                u8::try_from(v).map_err(|_| Error::InvalidVersion(u8::MAX))?,
            )?;
            Ok(())
        }
        "serial_number" if rest.is_none() => {
            let bytes = value
                .as_bytes()
                .ok_or_else(|| Error::attr_type_mismatch(full_path, "bytes"))?;
            tbs.set_serial_number(bytes.to_vec());
            Ok(())
        }
        "issuer" | "subject" if rest.is_none() => match value {
            AttrValue::Name(name) => {
                if head == "issuer" {
                    tbs.issuer = name;
                } else {
                    tbs.subject = name;
                }
                Ok(())
            }
            _ => Err(Error::attr_type_mismatch(full_path, "distinguished name")),
        },
        "validity" => {
            let time = match value {
                AttrValue::Time(t) => t,
                _ => return Err(Error::attr_type_mismatch(full_path, "time")),
            };
            match rest {
                Some("not_before") => {
                    tbs.validity.not_before = time;
                    Ok(())
                }
                Some("not_after") => {
                    tbs.validity.not_after = time;
                    Ok(())
                }
                _ => Err(Error::attr_not_recognized(full_path)),
            }
        }
        "extensions" => {
            let extensions = tbs
                .extensions
                .get_or_insert_with(ExtensionSet::new);
            match rest {
                Some(rest) => extensions.set(rest, value),
                None => Err(Error::attr_not_recognized(full_path)),
            }
        }
        _ => Err(Error::attr_not_recognized(full_path)),
    }
}

fn tbs_delete(tbs: &mut TbsCertificate, full_path: &str) -> Result<()> {
    let path = info_path(full_path);
    let (head, rest) = split_path(path);
    match head {
        "issuer_unique_id" if rest.is_none() => {
            tbs.issuer_unique_id = None;
            Ok(())
        }
        "subject_unique_id" if rest.is_none() => {
            tbs.subject_unique_id = None;
            Ok(())
        }
        "extensions" => {
            let extensions = tbs
                .extensions
                .as_mut()
                .ok_or_else(|| Error::extension_not_present(full_path))?;
            match rest {
                Some(rest) => {
                    AttrAccess::delete(extensions, rest)?;
                    if extensions.is_empty() {
                        tbs.extensions = None;
                    }
                    Ok(())
                }
                None => {
                    tbs.extensions = None;
                    Ok(())
                }
            }
        }
        _ => Err(Error::Attribute(crate::AttributeError::NotSettable(
            full_path.to_string(),
        ))),
    }
}

fn tbs_elements(tbs: &TbsCertificate) -> Vec<String> {
    let mut out = vec![
        "version".to_string(),
        "serial_number".to_string(),
        "signature_algorithm".to_string(),
        "issuer".to_string(),
        "validity.not_before".to_string(),
        "validity.not_after".to_string(),
        "subject".to_string(),
        "public_key".to_string(),
    ];
    if let Some(extensions) = &tbs.extensions {
        for name in extensions.elements() {
            out.push(format!("extensions.{}", name));
        }
    }
    out
}

// ============================================================================
// Structural validation
// ============================================================================

fn validate_tbs(tbs: &TbsCertificate) -> Result<()> {
    if tbs.version == Version::V1 && tbs.extensions.is_some() {
        log::error!("v1 certificate carries extensions");
        return Err(Error::Extension(ExtensionError::NotAllowedInV1));
    }
    if tbs.version == Version::V1
        && (tbs.issuer_unique_id.is_some() || tbs.subject_unique_id.is_some())
    {
        log::error!("v1 certificate carries unique identifiers");
        return Err(Error::InvalidVersion(tbs.version.value()));
    }
    if !tbs.validity.is_well_formed() {
        return Err(Error::Time(TimeError::InvalidValidityPeriod {
            not_before: format!("{}", tbs.validity.not_before),
            not_after: format!("{}", tbs.validity.not_after),
        }));
    }
    Ok(())
}

// ============================================================================
// Outer assembly
// ============================================================================

/// `tbs ++ signatureAlgorithm ++ signature` wrapped in the outer SEQUENCE.
/// The TBS bytes pass through verbatim.
struct RawSigned {
    tbs: Any,
    algorithm: AlgorithmIdentifierOwned,
    signature: BitString,
}

impl EncodeValue for RawSigned {
    fn value_len(&self) -> der::Result<Length> {
        self.tbs.encoded_len()?
            + self.algorithm.encoded_len()?
            + self.signature.encoded_len()?
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        self.tbs.encode(writer)?;
        self.algorithm.encode(writer)?;
        self.signature.encode(writer)?;
        Ok(())
    }
}

impl der::FixedTag for RawSigned {
    const TAG: Tag = Tag::Sequence;
}

/// Assemble the outer signed SEQUENCE from pre-encoded TBS bytes.
pub(crate) fn assemble_signed(
    tbs_der: &[u8],
    algorithm: AlgorithmIdentifierOwned,
    signature: Vec<u8>,
) -> Result<Vec<u8>> {
    let raw = RawSigned {
        tbs: Any::from_der(tbs_der).map_err(Error::Asn1)?,
        algorithm,
        signature: BitString::new(0, signature)
            .map_err(|e| Error::Signature(SignatureError::InvalidFormat(e.to_string())))?,
    };
    raw.to_der().map_err(Error::Asn1)
}

// ============================================================================
// CertificateBuilder
// ============================================================================

/// Mutable pre-signature certificate.
///
/// Collects TBS fields and extensions; [`CertificateBuilder::sign`] produces
/// the immutable [`Certificate`].
#[derive(Debug, Clone)]
pub struct CertificateBuilder {
    tbs: TbsCertificate,
}

impl CertificateBuilder {
    /// Start a v3 certificate from the required fields.
    pub fn new(
        serial_number: Vec<u8>,
        issuer: Name,
        validity: Validity,
        subject: Name,
        subject_public_key_info: SubjectPublicKeyInfo,
    ) -> Self {
        Self {
            tbs: TbsCertificate {
                version: Version::V3,
                serial_number_bytes: serial_number,
                // Placeholder until sign() stamps the signer's algorithm.
                signature: AlgorithmIdentifierOwned {
                    oid: const_oid::ObjectIdentifier::new_unwrap("2.5.29.0"),
                    parameters: None,
                },
                issuer,
                validity,
                subject,
                subject_public_key_info,
                issuer_unique_id: None,
                subject_unique_id: None,
                extensions: None,
            },
        }
    }

    /// Re-open a signed certificate for modification.
    ///
    /// The returned builder starts from the certificate's current state; the
    /// original stays immutable.
    pub fn from_certificate(cert: &Certificate) -> Self {
        Self {
            tbs: cert.tbs.clone(),
        }
    }

    /// Set the version.
    pub fn set_version(&mut self, version: Version) -> &mut Self {
        self.tbs.version = version;
        self
    }

    /// Add or replace an extension.
    pub fn add_extension(
        &mut self,
        extn_id: const_oid::ObjectIdentifier,
        critical: bool,
        payload: ExtensionPayload,
    ) -> Result<&mut Self> {
        self.tbs
            .extensions
            .get_or_insert_with(ExtensionSet::new)
            .insert(extn_id, critical, payload)?;
        Ok(self)
    }

    /// The TBS under construction.
    pub fn tbs(&self) -> &TbsCertificate {
        &self.tbs
    }

    /// Sign and freeze.
    ///
    /// Stamps the signer's algorithm into both algorithm fields, signs the
    /// DER-encoded TBS, and reparses the assembled object so the result went
    /// through the same parse and validation path as external input.
    pub fn sign(&self, signer: &dyn Signer) -> Result<Certificate> {
        let algorithm = signer.algorithm();
        let mut tbs = self.tbs.clone();
        tbs.signature = algorithm.clone();
        validate_tbs(&tbs)?;

        let tbs_der = tbs.to_der().map_err(Error::Asn1)?;
        log::trace!("signing {} TBS bytes with {}", tbs_der.len(), algorithm.oid);
        let signature = signer.sign(&tbs_der)?;

        let der = assemble_signed(&tbs_der, algorithm, signature)?;
        Certificate::from_der(&der)
    }
}

impl AttrAccess for CertificateBuilder {
    fn get(&self, path: &str) -> Result<AttrValue> {
        tbs_get(&self.tbs, path)
    }

    fn set(&mut self, path: &str, value: AttrValue) -> Result<()> {
        tbs_set(&mut self.tbs, path, value)
    }

    fn delete(&mut self, path: &str) -> Result<()> {
        tbs_delete(&mut self.tbs, path)
    }

    fn elements(&self) -> Vec<String> {
        tbs_elements(&self.tbs)
    }
}

// ============================================================================
// Certificate
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct VerifyMemo {
    key_id: String,
    provider: String,
    ok: bool,
}

/// Signed, immutable X.509 certificate.
///
/// Holds the exact DER bytes it was parsed from; `to_der` returns them
/// verbatim and `verify` runs over the retained TBS byte range.
#[derive(Debug)]
pub struct Certificate {
    der: Vec<u8>,
    tbs_range: Range<usize>,
    tbs: TbsCertificate,
    signature_algorithm: AlgorithmIdentifierOwned,
    signature: BitString,
    memo: Mutex<Option<VerifyMemo>>,
}

impl Certificate {
    /// Parse from DER.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let mut reader = der::SliceReader::new(bytes).map_err(Error::Asn1)?;
        let header = Header::decode(&mut reader).map_err(Error::Asn1)?;
        if header.tag != Tag::Sequence {
            return Err(Error::Asn1(header.tag.unexpected_error(Some(Tag::Sequence))));
        }

        let tbs_start = u32::from(reader.position()) as usize;
        let tbs = TbsCertificate::decode(&mut reader).map_err(Error::Asn1)?;
        let tbs_end = u32::from(reader.position()) as usize;

        let signature_algorithm = AlgorithmIdentifierOwned::decode(&mut reader).map_err(Error::Asn1)?;
        let signature = BitString::decode(&mut reader).map_err(Error::Asn1)?;

        if !reader.is_finished() {
            return Err(Error::Encoding(EncodingError::TrailingBytes));
        }

        if signature_algorithm != tbs.signature {
            log::error!(
                "signature algorithm mismatch: outer={}, tbs={}",
                signature_algorithm.oid,
                tbs.signature.oid
            );
            return Err(Error::Signature(SignatureError::AlgorithmMismatch {
                outer: signature_algorithm.oid.to_string(),
                tbs: tbs.signature.oid.to_string(),
            }));
        }
        validate_tbs(&tbs)?;

        log::trace!(
            "parsed certificate: subject={}, serial={:02x?}",
            tbs.subject,
            tbs.serial_number()
        );

        Ok(Self {
            der: bytes.to_vec(),
            tbs_range: tbs_start..tbs_end,
            tbs,
            signature_algorithm,
            signature,
            memo: Mutex::new(None),
        })
    }

    /// Parse from PEM with the `CERTIFICATE` label.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let (label, der) = pem_rfc7468::decode_vec(pem.as_bytes())?;
        if label != "CERTIFICATE" {
            return Err(Error::Encoding(EncodingError::InvalidPemLabel {
                expected: "CERTIFICATE".to_string(),
                found: label.to_string(),
            }));
        }
        Self::from_der(&der)
    }

    /// The exact bytes this certificate was parsed from.
    pub fn to_der(&self) -> Vec<u8> {
        self.der.clone()
    }

    /// PEM encoding of the retained DER.
    pub fn to_pem(&self) -> Result<String> {
        pem_rfc7468::encode_string("CERTIFICATE", pem_rfc7468::LineEnding::LF, &self.der)
            .map_err(Error::from)
    }

    /// The signed TBS bytes, as parsed.
    pub fn tbs_der(&self) -> &[u8] {
        &self.der[self.tbs_range.clone()]
    }

    /// The TBS structure.
    pub fn tbs(&self) -> &TbsCertificate {
        &self.tbs
    }

    /// Subject distinguished name.
    pub fn subject(&self) -> &Name {
        &self.tbs.subject
    }

    /// Issuer distinguished name.
    pub fn issuer(&self) -> &Name {
        &self.tbs.issuer
    }

    /// Serial number bytes.
    pub fn serial_number(&self) -> &[u8] {
        self.tbs.serial_number()
    }

    /// Validity period.
    pub fn validity(&self) -> &Validity {
        &self.tbs.validity
    }

    /// Certificate version.
    pub fn version(&self) -> Version {
        self.tbs.version
    }

    /// Extensions, if present.
    pub fn extensions(&self) -> Option<&ExtensionSet> {
        self.tbs.extensions.as_ref()
    }

    /// Subject public key info.
    pub fn subject_public_key_info(&self) -> &SubjectPublicKeyInfo {
        &self.tbs.subject_public_key_info
    }

    /// Outer signature algorithm.
    pub fn signature_algorithm(&self) -> &AlgorithmIdentifierOwned {
        &self.signature_algorithm
    }

    /// Raw signature bytes.
    pub fn signature_bytes(&self) -> &[u8] {
        self.signature.raw_bytes()
    }

    /// True if BasicConstraints marks this certificate as a CA.
    pub fn is_ca(&self) -> bool {
        match self.basic_constraints() {
            Some(bc) => bc.ca,
            None => false,
        }
    }

    /// Typed BasicConstraints, if present.
    pub fn basic_constraints(&self) -> Option<&crate::ext::pkix::BasicConstraints> {
        match &self.extensions()?.get_by_oid(&crate::oid::BASIC_CONSTRAINTS)?.payload {
            ExtensionPayload::BasicConstraints(bc) => Some(bc),
            _ => None,
        }
    }

    /// True once any unrecognized critical extension has been seen.
    pub fn has_unsupported_critical(&self) -> bool {
        self.extensions()
            .map(|e| e.has_unsupported_critical())
            .unwrap_or(false)
    }

    /// Verify the signature over the retained TBS bytes.
    ///
    /// The result is memoized per `(key_id, provider)`: repeating the call
    /// with the same verifier identity returns the stored outcome without
    /// re-entering the service; a different identity recomputes and replaces
    /// the memo.
    pub fn verify(&self, verifier: &dyn Verifier) -> Result<bool> {
        {
            let memo = self.memo.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(m) = memo.as_ref() {
                if m.key_id == verifier.key_id() && m.provider == verifier.provider() {
                    log::trace!("verify memo hit for key {}", m.key_id);
                    return Ok(m.ok);
                }
            }
        }

        let ok = verifier.verify(
            &self.signature_algorithm,
            self.tbs_der(),
            self.signature.raw_bytes(),
        )?;
        if !ok {
            log::debug!("signature verification failed for key {}", verifier.key_id());
        }

        let mut memo = self.memo.lock().unwrap_or_else(|e| e.into_inner());
        *memo = Some(VerifyMemo {
            key_id: verifier.key_id().to_string(),
            provider: verifier.provider().to_string(),
            ok,
        });
        Ok(ok)
    }
}

impl Clone for Certificate {
    fn clone(&self) -> Self {
        let memo = self.memo.lock().unwrap_or_else(|e| e.into_inner()).clone();
        Self {
            der: self.der.clone(),
            tbs_range: self.tbs_range.clone(),
            tbs: self.tbs.clone(),
            signature_algorithm: self.signature_algorithm.clone(),
            signature: self.signature.clone(),
            memo: Mutex::new(memo),
        }
    }
}

impl PartialEq for Certificate {
    fn eq(&self, other: &Self) -> bool {
        self.der == other.der
    }
}

impl Eq for Certificate {}

impl AttrAccess for Certificate {
    fn get(&self, path: &str) -> Result<AttrValue> {
        tbs_get(&self.tbs, path)
    }

    fn set(&mut self, _path: &str, _value: AttrValue) -> Result<()> {
        Err(Error::Immutable)
    }

    fn delete(&mut self, _path: &str) -> Result<()> {
        Err(Error::Immutable)
    }

    fn elements(&self) -> Vec<String> {
        tbs_elements(&self.tbs)
    }
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Certificate:")?;
        writeln!(f, "  Version: {}", self.tbs.version)?;
        writeln!(f, "  Serial Number: {:02x?}", self.serial_number())?;
        writeln!(f, "  Signature Algorithm: {}", self.signature_algorithm.oid)?;
        writeln!(f, "  Issuer: {}", self.tbs.issuer)?;
        writeln!(f, "  Validity:")?;
        writeln!(f, "    Not Before: {}", self.tbs.validity.not_before)?;
        writeln!(f, "    Not After: {}", self.tbs.validity.not_after)?;
        writeln!(f, "  Subject: {}", self.tbs.subject)?;
        if let Some(extensions) = &self.tbs.extensions {
            writeln!(f, "  Extensions: {} extension(s)", extensions.len())?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ext::pkix::{BasicConstraints, KeyUsage};
    use crate::sign::testutil::{ChecksumSigner, ChecksumVerifier, RejectingVerifier};
    use crate::time::Time;
    use crate::{oid, AttributeError};

    fn test_spki() -> SubjectPublicKeyInfo {
        SubjectPublicKeyInfo {
            algorithm: AlgorithmIdentifierOwned {
                oid: const_oid::ObjectIdentifier::new_unwrap("1.2.840.10045.2.1"),
                parameters: None,
            },
            subject_public_key: BitString::from_bytes(&[0x04, 0x01, 0x02, 0x03]).unwrap(),
        }
    }

    fn test_validity() -> Validity {
        Validity::from_unix_secs(1_700_000_000, 1_800_000_000).unwrap()
    }

    fn test_builder() -> CertificateBuilder {
        CertificateBuilder::new(
            vec![0x01, 0xF4],
            Name::from_rfc2253("CN=Test CA,O=Acme").unwrap(),
            test_validity(),
            Name::from_rfc2253("CN=leaf.example.com,O=Acme").unwrap(),
            test_spki(),
        )
    }

    #[test]
    fn test_build_sign_verify() {
        let mut builder = test_builder();
        builder
            .add_extension(
                oid::BASIC_CONSTRAINTS,
                true,
                ExtensionPayload::BasicConstraints(BasicConstraints::ca(Some(0))),
            )
            .unwrap();

        let cert = builder.sign(&ChecksumSigner).unwrap();
        assert_eq!(cert.version(), Version::V3);
        assert!(cert.is_ca());
        assert_eq!(cert.serial_number(), &[0x01, 0xF4]);

        assert!(cert.verify(&ChecksumVerifier::new("key-1")).unwrap());
    }

    #[test]
    fn test_roundtrip_is_byte_exact() {
        let cert = test_builder().sign(&ChecksumSigner).unwrap();
        let der = cert.to_der();
        let reparsed = Certificate::from_der(&der).unwrap();
        assert_eq!(reparsed.to_der(), der);

        let pem = cert.to_pem().unwrap();
        let from_pem = Certificate::from_pem(&pem).unwrap();
        assert_eq!(from_pem.to_der(), der);
    }

    #[test]
    fn test_signed_certificate_is_immutable() {
        let mut cert = test_builder().sign(&ChecksumSigner).unwrap();
        assert!(matches!(
            cert.set("x509.info.serial_number", AttrValue::Bytes(vec![9])),
            Err(Error::Immutable)
        ));
        assert!(matches!(
            AttrAccess::delete(&mut cert, "x509.info.extensions.BasicConstraints"),
            Err(Error::Immutable)
        ));
    }

    #[test]
    fn test_reopen_for_modification() {
        let cert = test_builder().sign(&ChecksumSigner).unwrap();
        let mut builder = CertificateBuilder::from_certificate(&cert);
        builder
            .set("x509.info.serial_number", AttrValue::Bytes(vec![0x07]))
            .unwrap();
        let cert2 = builder.sign(&ChecksumSigner).unwrap();
        assert_eq!(cert2.serial_number(), &[0x07]);
        // Original unchanged.
        assert_eq!(cert.serial_number(), &[0x01, 0xF4]);
    }

    #[test]
    fn test_v1_with_extensions_rejected() {
        let mut builder = test_builder();
        builder.set_version(Version::V1);
        builder
            .add_extension(
                oid::KEY_USAGE,
                true,
                ExtensionPayload::KeyUsage(KeyUsage::new(KeyUsage::DIGITAL_SIGNATURE)),
            )
            .unwrap();
        assert!(matches!(
            builder.sign(&ChecksumSigner),
            Err(Error::Extension(ExtensionError::NotAllowedInV1))
        ));
    }

    #[test]
    fn test_algorithm_mismatch_rejected() {
        let cert = test_builder().sign(&ChecksumSigner).unwrap();
        // Reassemble with a different outer algorithm.
        let bogus = AlgorithmIdentifierOwned {
            oid: const_oid::ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11"),
            parameters: None,
        };
        let der =
            assemble_signed(cert.tbs_der(), bogus, cert.signature_bytes().to_vec()).unwrap();
        assert!(matches!(
            Certificate::from_der(&der),
            Err(Error::Signature(SignatureError::AlgorithmMismatch { .. }))
        ));
    }

    #[test]
    fn test_invalid_version_value_rejected() {
        let cert = test_builder().sign(&ChecksumSigner).unwrap();
        let mut der = cert.to_der();
        // The explicit version field encodes as A0 03 02 01 02 near the head
        // of the TBS; an out-of-range value must fail decoding, not coerce
        // to v1.
        let pos = der
            .windows(5)
            .position(|w| w == [0xA0, 0x03, 0x02, 0x01, 0x02])
            .unwrap();
        der[pos + 4] = 0x05;
        assert!(Certificate::from_der(&der).is_err());
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let cert = test_builder().sign(&ChecksumSigner).unwrap();
        let mut der = cert.to_der();
        der.push(0x00);
        assert!(matches!(
            Certificate::from_der(&der),
            Err(Error::Encoding(EncodingError::TrailingBytes))
        ));
    }

    #[test]
    fn test_verify_memo() {
        let cert = test_builder().sign(&ChecksumSigner).unwrap();

        // First verifier succeeds and is memoized.
        assert!(cert.verify(&ChecksumVerifier::new("key-1")).unwrap());
        assert!(cert.verify(&ChecksumVerifier::new("key-1")).unwrap());

        // A different (key_id, provider) identity recomputes: the rejecting
        // verifier returns false even though the memo held true.
        let rejecting = RejectingVerifier {
            key_id: "key-2".to_string(),
        };
        assert!(!cert.verify(&rejecting).unwrap());

        // The memo now holds the rejecting outcome for key-2; key-1
        // recomputes again and succeeds.
        assert!(cert.verify(&ChecksumVerifier::new("key-1")).unwrap());
    }

    #[test]
    fn test_attr_get_paths() {
        let mut builder = test_builder();
        builder
            .add_extension(
                oid::BASIC_CONSTRAINTS,
                true,
                ExtensionPayload::BasicConstraints(BasicConstraints::ca(None)),
            )
            .unwrap();
        let cert = builder.sign(&ChecksumSigner).unwrap();

        assert_eq!(cert.get("x509.info.version").unwrap(), AttrValue::Int(2));
        assert_eq!(
            cert.get("x509.info.serial_number").unwrap(),
            AttrValue::Bytes(vec![0x01, 0xF4])
        );
        assert_eq!(
            cert.get("x509.info.extensions.BasicConstraints.ca").unwrap(),
            AttrValue::Bool(true)
        );
        match cert.get("x509.info.validity.not_before").unwrap() {
            AttrValue::Time(t) => assert_eq!(t.to_unix_secs(), 1_700_000_000),
            other => panic!("unexpected value {:?}", other),
        }
        assert!(matches!(
            cert.get("x509.info.bogus").unwrap_err(),
            Error::Attribute(AttributeError::NotRecognized { .. })
        ));
    }

    #[test]
    fn test_builder_attr_mutation() {
        let mut builder = test_builder();
        builder
            .add_extension(
                oid::BASIC_CONSTRAINTS,
                true,
                ExtensionPayload::BasicConstraints(BasicConstraints::ca(Some(2))),
            )
            .unwrap();

        // cA flip drops pathLen through the attribute protocol.
        builder
            .set(
                "x509.info.extensions.BasicConstraints.ca",
                AttrValue::Bool(false),
            )
            .unwrap();
        assert!(builder
            .get("x509.info.extensions.BasicConstraints.path_len_constraint")
            .is_err());

        // Deleting the last extension removes the [3] block entirely.
        AttrAccess::delete(&mut builder, "x509.info.extensions.BasicConstraints").unwrap();
        assert!(builder.tbs().extensions.is_none());
    }

    #[test]
    fn test_validity_order_enforced() {
        let builder = CertificateBuilder::new(
            vec![0x01],
            Name::from_rfc2253("CN=CA").unwrap(),
            Validity {
                not_before: Time::from_unix_secs(2_000_000_000).unwrap(),
                not_after: Time::from_unix_secs(1_000_000_000).unwrap(),
            },
            Name::from_rfc2253("CN=Leaf").unwrap(),
            test_spki(),
        );
        assert!(matches!(
            builder.sign(&ChecksumSigner),
            Err(Error::Time(TimeError::InvalidValidityPeriod { .. }))
        ));
    }
}
