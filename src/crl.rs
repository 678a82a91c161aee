// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! X.509 certificate revocation lists.
//!
//! ```asn1
//! CertificateList  ::=  SEQUENCE  {
//!     tbsCertList          TBSCertList,
//!     signatureAlgorithm   AlgorithmIdentifier,
//!     signatureValue       BIT STRING
//! }
//!
//! TBSCertList  ::=  SEQUENCE  {
//!     version              Version OPTIONAL,  -- if present, MUST be v2
//!     signature            AlgorithmIdentifier,
//!     issuer               Name,
//!     thisUpdate           Time,
//!     nextUpdate           Time OPTIONAL,
//!     revokedCertificates  SEQUENCE OF SEQUENCE {
//!         userCertificate      CertificateSerialNumber,
//!         revocationDate       Time,
//!         crlEntryExtensions   Extensions OPTIONAL
//!     } OPTIONAL,
//!     crlExtensions        [0] EXPLICIT Extensions OPTIONAL
//! }
//! ```
//!
//! Same lifecycle as certificates: [`CrlBuilder`] is the mutable form,
//! [`CertificateList`] is signed, immutable, retains its exact input bytes,
//! and carries a revocation index keyed by `(issuer, serial)`. Per RFC 5280
//! Section 5.3.3 the CertificateIssuer entry extension is sticky: it switches
//! the indexing issuer for its own entry and every following entry until the
//! next override appears.

use core::fmt;
use core::ops::Range;
use std::collections::HashMap;
use std::sync::Mutex;

use der::{
    asn1::{BitString, UintRef},
    Decode, DecodeValue, Encode, EncodeValue, Header, Length, Reader, Tag, TagMode, TagNumber,
    Writer,
};
use spki::AlgorithmIdentifierOwned;

use crate::attr::{split_path, AttrAccess, AttrValue};
use crate::cert::{assemble_signed, Version};
use crate::error::{EncodingError, Error, ExtensionError, Result, SignatureError};
use crate::ext::pkix::CrlReason;
use crate::ext::{ExtensionPayload, ExtensionSet};
use crate::name::Name;
use crate::sign::{Signer, Verifier};
use crate::time::Time;
use crate::{oid, AttributeError};

// ============================================================================
// RevokedCertificate
// ============================================================================

/// One revoked-certificate entry in a CRL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokedCertificate {
    serial_number_bytes: Vec<u8>,

    /// When the certificate was revoked
    pub revocation_date: Time,

    /// Per-entry extensions (reason code, invalidity date, issuer override)
    pub extensions: Option<ExtensionSet>,
}

impl RevokedCertificate {
    /// Entry for a serial revoked at the given time.
    pub fn new(serial_number: Vec<u8>, revocation_date: Time) -> Self {
        Self {
            serial_number_bytes: serial_number,
            revocation_date,
            extensions: None,
        }
    }

    /// Serial number bytes.
    pub fn serial_number(&self) -> &[u8] {
        &self.serial_number_bytes
    }

    fn serial_number_ref(&self) -> der::Result<UintRef<'_>> {
        UintRef::new(&self.serial_number_bytes)
    }

    /// Add or replace an entry extension.
    pub fn add_extension(
        &mut self,
        extn_id: const_oid::ObjectIdentifier,
        critical: bool,
        payload: ExtensionPayload,
    ) -> Result<&mut Self> {
        self.extensions
            .get_or_insert_with(ExtensionSet::new)
            .insert(extn_id, critical, payload)?;
        Ok(self)
    }

    /// Set the revocation reason.
    pub fn with_reason(mut self, reason: CrlReason) -> Result<Self> {
        self.add_extension(oid::CRL_REASON, false, ExtensionPayload::CrlReason(reason))?;
        Ok(self)
    }

    /// Set the certificate-issuer override for indirect CRLs.
    pub fn with_certificate_issuer(mut self, issuer: Name) -> Result<Self> {
        let names = crate::name::general::GeneralNames::new(vec![
            crate::name::general::GeneralName::DirectoryName(issuer),
        ]);
        self.add_extension(
            oid::CERTIFICATE_ISSUER,
            true,
            ExtensionPayload::CertificateIssuer(names),
        )?;
        Ok(self)
    }

    /// Revocation reason, if the entry carries one.
    pub fn reason(&self) -> Option<CrlReason> {
        match &self.extensions.as_ref()?.get_by_oid(&oid::CRL_REASON)?.payload {
            ExtensionPayload::CrlReason(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Invalidity date, if the entry carries one.
    pub fn invalidity_date(&self) -> Option<Time> {
        match &self
            .extensions
            .as_ref()?
            .get_by_oid(&oid::INVALIDITY_DATE)?
            .payload
        {
            ExtensionPayload::InvalidityDate(time) => Some(*time),
            _ => None,
        }
    }

    /// Issuer override from the CertificateIssuer entry extension.
    pub fn certificate_issuer(&self) -> Option<&Name> {
        match &self
            .extensions
            .as_ref()?
            .get_by_oid(&oid::CERTIFICATE_ISSUER)?
            .payload
        {
            ExtensionPayload::CertificateIssuer(names) => names.directory_name(),
            _ => None,
        }
    }
}

impl<'a> DecodeValue<'a> for RevokedCertificate {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        reader.read_nested(header.length, |reader| {
            let serial = UintRef::decode(reader)?;
            let serial_number_bytes = serial.as_bytes().to_vec();
            let revocation_date = Time::decode(reader)?;
            // Entry extensions are a bare SEQUENCE, not context-tagged.
            let extensions = if reader.is_finished() {
                None
            } else {
                Some(ExtensionSet::decode(reader)?)
            };
            Ok(Self {
                serial_number_bytes,
                revocation_date,
                extensions,
            })
        })
    }
}

impl EncodeValue for RevokedCertificate {
    fn value_len(&self) -> der::Result<Length> {
        let mut len = (self.serial_number_ref()?.encoded_len()?
            + self.revocation_date.encoded_len()?)?;
        if let Some(extensions) = &self.extensions {
            len = (len + extensions.encoded_len()?)?;
        }
        Ok(len)
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        self.serial_number_ref()?.encode(writer)?;
        self.revocation_date.encode(writer)?;
        if let Some(extensions) = &self.extensions {
            extensions.encode(writer)?;
        }
        Ok(())
    }
}

impl der::FixedTag for RevokedCertificate {
    const TAG: Tag = Tag::Sequence;
}

// ============================================================================
// TbsCertList
// ============================================================================

/// TBSCertList: the signed portion of a CRL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TbsCertList {
    /// CRL version; V1 when the field is absent on the wire
    pub version: Version,

    /// Signature algorithm, must match the outer signatureAlgorithm
    pub signature: AlgorithmIdentifierOwned,

    /// CRL issuer distinguished name
    pub issuer: Name,

    /// Issue time of this CRL
    pub this_update: Time,

    /// Scheduled time of the next CRL
    pub next_update: Option<Time>,

    /// Revoked-certificate entries, in wire order
    pub revoked: Vec<RevokedCertificate>,

    /// CRL-level extensions
    pub extensions: Option<ExtensionSet>,
}

impl<'a> DecodeValue<'a> for TbsCertList {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        reader.read_nested(header.length, |reader| {
            let version = if reader.peek_tag()? == Tag::Integer {
                let v = UintRef::decode(reader)?;
                let bytes = v.as_bytes();
                if bytes.len() == 1 {
                    Version::from_value(bytes[0]).map_err(|_| Tag::Integer.value_error())?
                } else {
                    return Err(Tag::Integer.value_error());
                }
            } else {
                Version::V1
            };

            let signature = AlgorithmIdentifierOwned::decode(reader)?;
            let issuer = Name::decode(reader)?;
            let this_update = Time::decode(reader)?;

            let next_update = if !reader.is_finished()
                && matches!(reader.peek_tag()?, Tag::UtcTime | Tag::GeneralizedTime)
            {
                Some(Time::decode(reader)?)
            } else {
                None
            };

            let revoked = if !reader.is_finished() && reader.peek_tag()? == Tag::Sequence {
                let list_header = Header::decode(reader)?;
                let mut entries = Vec::new();
                reader.read_nested(list_header.length, |list_reader| {
                    while !list_reader.is_finished() {
                        entries.push(RevokedCertificate::decode(list_reader)?);
                    }
                    Ok(())
                })?;
                entries
            } else {
                Vec::new()
            };

            let extensions =
                reader.context_specific::<ExtensionSet>(TagNumber::N0, TagMode::Explicit)?;

            Ok(Self {
                version,
                signature,
                issuer,
                this_update,
                next_update,
                revoked,
                extensions,
            })
        })
    }
}

impl EncodeValue for TbsCertList {
    fn value_len(&self) -> der::Result<Length> {
        let mut len = Length::ZERO;

        if self.version != Version::V1 {
            let version_bytes = [self.version.value()];
            len = (len + UintRef::new(&version_bytes)?.encoded_len()?)?;
        }

        len = (len + self.signature.encoded_len()?)?;
        len = (len + self.issuer.encoded_len()?)?;
        len = (len + self.this_update.encoded_len()?)?;

        if let Some(next_update) = &self.next_update {
            len = (len + next_update.encoded_len()?)?;
        }

        if !self.revoked.is_empty() {
            let mut list_len = Length::ZERO;
            for entry in &self.revoked {
                list_len = (list_len + entry.encoded_len()?)?;
            }
            len = (len + Header::new(Tag::Sequence, list_len)?.encoded_len()?)?;
            len = (len + list_len)?;
        }

        if let Some(extensions) = &self.extensions {
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
            UintRef::new(&version_bytes)?.encode(writer)?;
        }

        self.signature.encode(writer)?;
        self.issuer.encode(writer)?;
        self.this_update.encode(writer)?;

        if let Some(next_update) = &self.next_update {
            next_update.encode(writer)?;
        }

        if !self.revoked.is_empty() {
            let mut list_len = Length::ZERO;
            for entry in &self.revoked {
                list_len = (list_len + entry.encoded_len()?)?;
            }
            Header::new(Tag::Sequence, list_len)?.encode(writer)?;
            for entry in &self.revoked {
                entry.encode(writer)?;
            }
        }

        // CRL extensions are [0] EXPLICIT constructed.
        if let Some(extensions) = &self.extensions {
            writer.write_byte(0xA0)?;
            let ext_bytes = extensions.to_der()?;
            Length::try_from(ext_bytes.len())?.encode(writer)?;
            writer.write(&ext_bytes)?;
        }

        Ok(())
    }
}

impl der::FixedTag for TbsCertList {
    const TAG: Tag = Tag::Sequence;
}

fn validate_tbs(tbs: &TbsCertList) -> Result<()> {
    if tbs.version == Version::V3 {
        return Err(Error::InvalidVersion(tbs.version.value()));
    }
    let has_extensions = tbs.extensions.is_some()
        || tbs.revoked.iter().any(|entry| entry.extensions.is_some());
    if tbs.version == Version::V1 && has_extensions {
        log::error!("v1 CRL carries extensions");
        return Err(Error::Extension(ExtensionError::NotAllowedInV1));
    }
    Ok(())
}

// ============================================================================
// CrlBuilder
// ============================================================================

/// Mutable pre-signature CRL.
#[derive(Debug, Clone)]
pub struct CrlBuilder {
    tbs: TbsCertList,
}

impl CrlBuilder {
    /// Start a v2 CRL for the given issuer.
    pub fn new(issuer: Name, this_update: Time) -> Self {
        Self {
            tbs: TbsCertList {
                version: Version::V2,
                signature: AlgorithmIdentifierOwned {
                    oid: const_oid::ObjectIdentifier::new_unwrap("2.5.29.0"),
                    parameters: None,
                },
                issuer,
                this_update,
                next_update: None,
                revoked: Vec::new(),
                extensions: None,
            },
        }
    }

    /// Re-open a signed CRL for modification.
    pub fn from_crl(crl: &CertificateList) -> Self {
        Self {
            tbs: crl.tbs.clone(),
        }
    }

    /// Set the nextUpdate time.
    pub fn set_next_update(&mut self, next_update: Time) -> &mut Self {
        self.tbs.next_update = Some(next_update);
        self
    }

    /// Append a revoked-certificate entry.
    pub fn add_revoked(&mut self, entry: RevokedCertificate) -> &mut Self {
        self.tbs.revoked.push(entry);
        self
    }

    /// Add or replace a CRL-level extension.
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
    pub fn tbs(&self) -> &TbsCertList {
        &self.tbs
    }

    /// Sign and freeze, reparsing through the canonical parse path.
    pub fn sign(&self, signer: &dyn Signer) -> Result<CertificateList> {
        let algorithm = signer.algorithm();
        let mut tbs = self.tbs.clone();
        tbs.signature = algorithm.clone();
        validate_tbs(&tbs)?;

        let tbs_der = tbs.to_der().map_err(Error::Asn1)?;
        log::trace!("signing {} TBS bytes with {}", tbs_der.len(), algorithm.oid);
        let signature = signer.sign(&tbs_der)?;

        let der = assemble_signed(&tbs_der, algorithm, signature)?;
        CertificateList::from_der(&der)
    }
}

// ============================================================================
// CertificateList
// ============================================================================

#[derive(Debug, Clone)]
struct VerifyMemo {
    key_id: String,
    provider: String,
    ok: bool,
}

/// Signed, immutable CRL with an `(issuer, serial)` revocation index.
#[derive(Debug)]
pub struct CertificateList {
    der: Vec<u8>,
    tbs_range: Range<usize>,
    tbs: TbsCertList,
    signature_algorithm: AlgorithmIdentifierOwned,
    signature: BitString,
    /// (canonical issuer, serial bytes) -> index into tbs.revoked
    index: HashMap<(String, Vec<u8>), usize>,
    memo: Mutex<Option<VerifyMemo>>,
}

impl CertificateList {
    /// Parse from DER.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let mut reader = der::SliceReader::new(bytes).map_err(Error::Asn1)?;
        let header = Header::decode(&mut reader).map_err(Error::Asn1)?;
        if header.tag != Tag::Sequence {
            return Err(Error::Asn1(header.tag.unexpected_error(Some(Tag::Sequence))));
        }

        let tbs_start = u32::from(reader.position()) as usize;
        let tbs = TbsCertList::decode(&mut reader).map_err(Error::Asn1)?;
        let tbs_end = u32::from(reader.position()) as usize;

        let signature_algorithm =
            AlgorithmIdentifierOwned::decode(&mut reader).map_err(Error::Asn1)?;
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

        let index = build_index(&tbs);
        log::trace!(
            "parsed CRL: issuer={}, {} revoked entries",
            tbs.issuer,
            tbs.revoked.len()
        );

        Ok(Self {
            der: bytes.to_vec(),
            tbs_range: tbs_start..tbs_end,
            tbs,
            signature_algorithm,
            signature,
            index,
            memo: Mutex::new(None),
        })
    }

    /// Parse from PEM with the `X509 CRL` label.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let (label, der) = pem_rfc7468::decode_vec(pem.as_bytes())?;
        if label != "X509 CRL" {
            return Err(Error::Encoding(EncodingError::InvalidPemLabel {
                expected: "X509 CRL".to_string(),
                found: label.to_string(),
            }));
        }
        Self::from_der(&der)
    }

    /// The exact bytes this CRL was parsed from.
    pub fn to_der(&self) -> Vec<u8> {
        self.der.clone()
    }

    /// PEM encoding of the retained DER.
    pub fn to_pem(&self) -> Result<String> {
        pem_rfc7468::encode_string("X509 CRL", pem_rfc7468::LineEnding::LF, &self.der)
            .map_err(Error::from)
    }

    /// The signed TBS bytes, as parsed.
    pub fn tbs_der(&self) -> &[u8] {
        &self.der[self.tbs_range.clone()]
    }

    /// The TBS structure.
    pub fn tbs(&self) -> &TbsCertList {
        &self.tbs
    }

    /// CRL issuer distinguished name.
    pub fn issuer(&self) -> &Name {
        &self.tbs.issuer
    }

    /// Issue time.
    pub fn this_update(&self) -> &Time {
        &self.tbs.this_update
    }

    /// Scheduled next issue time.
    pub fn next_update(&self) -> Option<&Time> {
        self.tbs.next_update.as_ref()
    }

    /// CRL version.
    pub fn version(&self) -> Version {
        self.tbs.version
    }

    /// CRL-level extensions, if present.
    pub fn extensions(&self) -> Option<&ExtensionSet> {
        self.tbs.extensions.as_ref()
    }

    /// Revoked entries in wire order.
    pub fn revoked(&self) -> &[RevokedCertificate] {
        &self.tbs.revoked
    }

    /// CRL number, if the extension is present.
    pub fn crl_number(&self) -> Option<&[u8]> {
        match &self.extensions()?.get_by_oid(&oid::CRL_NUMBER)?.payload {
            ExtensionPayload::CrlNumber(n) => Some(n.as_bytes()),
            _ => None,
        }
    }

    /// Look up a revocation entry for a certificate.
    ///
    /// The certificate's issuer is compared in canonical form; entries under
    /// a CertificateIssuer override are found under the override's name, not
    /// the CRL issuer's.
    pub fn find_revoked(&self, issuer: &Name, serial: &[u8]) -> Option<&RevokedCertificate> {
        let key = (issuer.canonical_str().to_string(), serial.to_vec());
        self.index.get(&key).map(|&i| &self.tbs.revoked[i])
    }

    /// True if the certificate is revoked by this CRL.
    pub fn is_revoked(&self, issuer: &Name, serial: &[u8]) -> bool {
        self.find_revoked(issuer, serial).is_some()
    }

    /// Outer signature algorithm.
    pub fn signature_algorithm(&self) -> &AlgorithmIdentifierOwned {
        &self.signature_algorithm
    }

    /// Raw signature bytes.
    pub fn signature_bytes(&self) -> &[u8] {
        self.signature.raw_bytes()
    }

    /// Verify the signature over the retained TBS bytes.
    ///
    /// Memoized per `(key_id, provider)` exactly like certificate
    /// verification.
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

        let mut memo = self.memo.lock().unwrap_or_else(|e| e.into_inner());
        *memo = Some(VerifyMemo {
            key_id: verifier.key_id().to_string(),
            provider: verifier.provider().to_string(),
            ok,
        });
        Ok(ok)
    }
}

/// Build the revocation index, applying the sticky CertificateIssuer rule.
fn build_index(tbs: &TbsCertList) -> HashMap<(String, Vec<u8>), usize> {
    let mut index = HashMap::with_capacity(tbs.revoked.len());
    let mut current_issuer = tbs.issuer.canonical_str().to_string();
    for (i, entry) in tbs.revoked.iter().enumerate() {
        if let Some(override_name) = entry.certificate_issuer() {
            current_issuer = override_name.canonical_str().to_string();
        }
        index.insert((current_issuer.clone(), entry.serial_number().to_vec()), i);
    }
    index
}

impl Clone for CertificateList {
    fn clone(&self) -> Self {
        let memo = self.memo.lock().unwrap_or_else(|e| e.into_inner()).clone();
        Self {
            der: self.der.clone(),
            tbs_range: self.tbs_range.clone(),
            tbs: self.tbs.clone(),
            signature_algorithm: self.signature_algorithm.clone(),
            signature: self.signature.clone(),
            index: self.index.clone(),
            memo: Mutex::new(memo),
        }
    }
}

impl PartialEq for CertificateList {
    fn eq(&self, other: &Self) -> bool {
        self.der == other.der
    }
}

impl Eq for CertificateList {}

// ============================================================================
// Attribute protocol
// ============================================================================

fn crl_path(path: &str) -> &str {
    path.strip_prefix("crl.").unwrap_or(path)
}

fn crl_get(tbs: &TbsCertList, full_path: &str) -> Result<AttrValue> {
    let path = crl_path(full_path);
    let (head, rest) = split_path(path);
    match head {
        "version" if rest.is_none() => Ok(AttrValue::Int(tbs.version.value() as u64)),
        "signature_algorithm" if rest.is_none() => Ok(AttrValue::Oid(tbs.signature.oid)),
        "issuer" if rest.is_none() => Ok(AttrValue::Name(tbs.issuer.clone())),
        "this_update" if rest.is_none() => Ok(AttrValue::Time(tbs.this_update)),
        "next_update" if rest.is_none() => tbs
            .next_update
            .map(AttrValue::Time)
            .ok_or_else(|| Error::extension_not_present(full_path)),
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

impl AttrAccess for CrlBuilder {
    fn get(&self, path: &str) -> Result<AttrValue> {
        crl_get(&self.tbs, path)
    }

    fn set(&mut self, full_path: &str, value: AttrValue) -> Result<()> {
        let path = crl_path(full_path);
        let (head, rest) = split_path(path);
        match head {
            "issuer" if rest.is_none() => match value {
                AttrValue::Name(name) => {
                    self.tbs.issuer = name;
                    Ok(())
                }
                _ => Err(Error::attr_type_mismatch(full_path, "distinguished name")),
            },
            "this_update" | "next_update" if rest.is_none() => {
                let time = match value {
                    AttrValue::Time(t) => t,
                    _ => return Err(Error::attr_type_mismatch(full_path, "time")),
                };
                if head == "this_update" {
                    self.tbs.this_update = time;
                } else {
                    self.tbs.next_update = Some(time);
                }
                Ok(())
            }
            "extensions" => {
                let extensions = self.tbs.extensions.get_or_insert_with(ExtensionSet::new);
                match rest {
                    Some(rest) => extensions.set(rest, value),
                    None => Err(Error::attr_not_recognized(full_path)),
                }
            }
            _ => Err(Error::Attribute(AttributeError::NotSettable(
                full_path.to_string(),
            ))),
        }
    }

    fn delete(&mut self, full_path: &str) -> Result<()> {
        let path = crl_path(full_path);
        let (head, rest) = split_path(path);
        match head {
            "next_update" if rest.is_none() => {
                self.tbs.next_update = None;
                Ok(())
            }
            "extensions" => {
                let extensions = self
                    .tbs
                    .extensions
                    .as_mut()
                    .ok_or_else(|| Error::extension_not_present(full_path))?;
                match rest {
                    Some(rest) => {
                        AttrAccess::delete(extensions, rest)?;
                        if extensions.is_empty() {
                            self.tbs.extensions = None;
                        }
                        Ok(())
                    }
                    None => {
                        self.tbs.extensions = None;
                        Ok(())
                    }
                }
            }
            _ => Err(Error::Attribute(AttributeError::NotSettable(
                full_path.to_string(),
            ))),
        }
    }

    fn elements(&self) -> Vec<String> {
        let mut out = vec![
            "version".to_string(),
            "signature_algorithm".to_string(),
            "issuer".to_string(),
            "this_update".to_string(),
        ];
        if self.tbs.next_update.is_some() {
            out.push("next_update".to_string());
        }
        if let Some(extensions) = &self.tbs.extensions {
            for name in extensions.elements() {
                out.push(format!("extensions.{}", name));
            }
        }
        out
    }
}

impl AttrAccess for CertificateList {
    fn get(&self, path: &str) -> Result<AttrValue> {
        crl_get(&self.tbs, path)
    }

    fn set(&mut self, _path: &str, _value: AttrValue) -> Result<()> {
        Err(Error::Immutable)
    }

    fn delete(&mut self, _path: &str) -> Result<()> {
        Err(Error::Immutable)
    }

    fn elements(&self) -> Vec<String> {
        let mut out = vec![
            "version".to_string(),
            "signature_algorithm".to_string(),
            "issuer".to_string(),
            "this_update".to_string(),
        ];
        if self.tbs.next_update.is_some() {
            out.push("next_update".to_string());
        }
        if let Some(extensions) = &self.tbs.extensions {
            for name in extensions.elements() {
                out.push(format!("extensions.{}", name));
            }
        }
        out
    }
}

impl fmt::Display for CertificateList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Certificate Revocation List:")?;
        writeln!(f, "  Version: {}", self.tbs.version)?;
        writeln!(f, "  Signature Algorithm: {}", self.signature_algorithm.oid)?;
        writeln!(f, "  Issuer: {}", self.tbs.issuer)?;
        writeln!(f, "  This Update: {}", self.tbs.this_update)?;
        if let Some(next_update) = &self.tbs.next_update {
            writeln!(f, "  Next Update: {}", next_update)?;
        }
        writeln!(f, "  Revoked: {} entry(ies)", self.tbs.revoked.len())?;
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
    use crate::ext::pkix::CrlNumber;
    use crate::sign::testutil::{ChecksumSigner, ChecksumVerifier};

    fn issuer() -> Name {
        Name::from_rfc2253("CN=Root CA,O=Acme").unwrap()
    }

    fn other_issuer() -> Name {
        Name::from_rfc2253("CN=Other CA,O=Elsewhere").unwrap()
    }

    fn t(secs: u64) -> Time {
        Time::from_unix_secs(secs).unwrap()
    }

    fn test_builder() -> CrlBuilder {
        let mut builder = CrlBuilder::new(issuer(), t(1_700_000_000));
        builder.set_next_update(t(1_700_600_000));
        builder
    }

    #[test]
    fn test_build_sign_verify() {
        let mut builder = test_builder();
        builder.add_revoked(
            RevokedCertificate::new(vec![0x10], t(1_699_000_000))
                .with_reason(CrlReason::KeyCompromise)
                .unwrap(),
        );
        builder
            .add_extension(
                oid::CRL_NUMBER,
                false,
                ExtensionPayload::CrlNumber(CrlNumber::new(&[0x05]).unwrap()),
            )
            .unwrap();

        let crl = builder.sign(&ChecksumSigner).unwrap();
        assert_eq!(crl.version(), Version::V2);
        assert_eq!(crl.crl_number(), Some(&[0x05][..]));
        assert!(crl.verify(&ChecksumVerifier::new("crl-key")).unwrap());

        let entry = crl.find_revoked(&issuer(), &[0x10]).unwrap();
        assert_eq!(entry.reason(), Some(CrlReason::KeyCompromise));
    }

    #[test]
    fn test_roundtrip_is_byte_exact() {
        let mut builder = test_builder();
        builder.add_revoked(RevokedCertificate::new(vec![0x22], t(1_699_500_000)));
        let crl = builder.sign(&ChecksumSigner).unwrap();

        let der = crl.to_der();
        let reparsed = CertificateList::from_der(&der).unwrap();
        assert_eq!(reparsed.to_der(), der);

        let pem = crl.to_pem().unwrap();
        assert!(pem.starts_with("-----BEGIN X509 CRL-----"));
        assert_eq!(CertificateList::from_pem(&pem).unwrap().to_der(), der);
    }

    #[test]
    fn test_default_entries_indexed_under_crl_issuer() {
        let mut builder = test_builder();
        builder.add_revoked(RevokedCertificate::new(vec![0x01], t(1_699_000_000)));
        let crl = builder.sign(&ChecksumSigner).unwrap();

        assert!(crl.is_revoked(&issuer(), &[0x01]));
        assert!(!crl.is_revoked(&other_issuer(), &[0x01]));
        assert!(!crl.is_revoked(&issuer(), &[0x02]));
    }

    #[test]
    fn test_certificate_issuer_override_is_sticky() {
        // Entry 1: no override, indexed under the CRL issuer.
        // Entry 2: override to Other CA.
        // Entry 3: no extension of its own, still under Other CA (sticky).
        let mut builder = test_builder();
        builder.add_revoked(RevokedCertificate::new(vec![0x01], t(1_699_000_000)));
        builder.add_revoked(
            RevokedCertificate::new(vec![0x02], t(1_699_100_000))
                .with_certificate_issuer(other_issuer())
                .unwrap(),
        );
        builder.add_revoked(RevokedCertificate::new(vec![0x03], t(1_699_200_000)));
        let crl = builder.sign(&ChecksumSigner).unwrap();

        assert!(crl.is_revoked(&issuer(), &[0x01]));
        assert!(crl.is_revoked(&other_issuer(), &[0x02]));
        assert!(crl.is_revoked(&other_issuer(), &[0x03]));
        // The sticky override means entries 2 and 3 are NOT under the CRL
        // issuer.
        assert!(!crl.is_revoked(&issuer(), &[0x02]));
        assert!(!crl.is_revoked(&issuer(), &[0x03]));
    }

    #[test]
    fn test_issuer_lookup_is_canonical() {
        let mut builder = test_builder();
        builder.add_revoked(RevokedCertificate::new(vec![0x01], t(1_699_000_000)));
        let crl = builder.sign(&ChecksumSigner).unwrap();

        // Differently-cased issuer string still matches.
        let issuer_lc = Name::from_rfc2253("cn=root ca,o=ACME").unwrap();
        assert!(crl.is_revoked(&issuer_lc, &[0x01]));
    }

    #[test]
    fn test_signed_crl_is_immutable() {
        let mut crl = test_builder().sign(&ChecksumSigner).unwrap();
        assert!(matches!(
            crl.set("crl.this_update", AttrValue::Time(t(1))),
            Err(Error::Immutable)
        ));
        assert!(matches!(
            AttrAccess::delete(&mut crl, "crl.next_update"),
            Err(Error::Immutable)
        ));
    }

    #[test]
    fn test_crl_extensions_tag() {
        // CRL extensions ride in [0] EXPLICIT, not [3].
        let mut builder = test_builder();
        builder
            .add_extension(
                oid::CRL_NUMBER,
                false,
                ExtensionPayload::CrlNumber(CrlNumber::new(&[0x01]).unwrap()),
            )
            .unwrap();
        let crl = builder.sign(&ChecksumSigner).unwrap();
        let tbs_der = crl.tbs_der();
        assert!(tbs_der.iter().any(|&b| b == 0xA0));
        assert!(!tbs_der.contains(&0xA3));
    }

    #[test]
    fn test_attr_paths() {
        let crl = test_builder().sign(&ChecksumSigner).unwrap();
        assert_eq!(crl.get("crl.version").unwrap(), AttrValue::Int(1));
        match crl.get("crl.issuer").unwrap() {
            AttrValue::Name(name) => assert_eq!(name, issuer()),
            other => panic!("unexpected value {:?}", other),
        }
        match crl.get("crl.next_update").unwrap() {
            AttrValue::Time(time) => assert_eq!(time.to_unix_secs(), 1_700_600_000),
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn test_reopen_for_modification() {
        let crl = test_builder().sign(&ChecksumSigner).unwrap();
        let mut builder = CrlBuilder::from_crl(&crl);
        builder.add_revoked(RevokedCertificate::new(vec![0x44], t(1_699_900_000)));
        let crl2 = builder.sign(&ChecksumSigner).unwrap();
        assert!(crl2.is_revoked(&issuer(), &[0x44]));
        assert!(!crl.is_revoked(&issuer(), &[0x44]));
    }
}
