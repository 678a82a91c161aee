// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Attribute-access protocol: uniform, name-addressed get/set/delete over
//! certificate fields and extensions.
//!
//! Paths are dot-separated, resolved one segment at a time: a container
//! consumes its head segment and delegates the remainder. Leaf segments
//! match case-insensitively, with underscores ignored, so `path_len`,
//! `pathLen` and `PathLenConstraint` all address the BasicConstraints path
//! length. The protocol is implemented once per container and dispatches on
//! the payload variant rather than per-extension types.

use const_oid::ObjectIdentifier;

use crate::constraints::GeneralSubtrees;
use crate::ext::pkix::{CrlNumber, CrlReason, KeyUsage};
use crate::ext::{ExtensionPayload, ExtensionSet};
use crate::name::general::GeneralNames;
use crate::name::Name;
use crate::time::Time;
use crate::{Error, Result};

use der::{Decode, Encode};

// ============================================================================
// AttrValue
// ============================================================================

/// Value carried across the attribute protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Boolean flag
    Bool(bool),
    /// Small unsigned integer (version, path length, reason code)
    Int(u64),
    /// Opaque byte string (serial number, key identifier, raw values)
    Bytes(Vec<u8>),
    /// Text (string-form values)
    Text(String),
    /// Object identifier
    Oid(ObjectIdentifier),
    /// List of object identifiers (extended key usage)
    OidList(Vec<ObjectIdentifier>),
    /// GeneralNames list (alt names, certificate issuer)
    Names(GeneralNames),
    /// Distinguished name
    Name(Name),
    /// Point in time
    Time(Time),
}

impl AttrValue {
    /// Extract a boolean, if that is what this value holds.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract an integer.
    pub fn as_int(&self) -> Option<u64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    /// Extract text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Extract a GeneralNames list.
    pub fn as_names(&self) -> Option<&GeneralNames> {
        match self {
            Self::Names(v) => Some(v),
            _ => None,
        }
    }

    /// Extract a time.
    pub fn as_time(&self) -> Option<&Time> {
        match self {
            Self::Time(v) => Some(v),
            _ => None,
        }
    }
}

// ============================================================================
// AttrAccess
// ============================================================================

/// The attribute protocol contract.
pub trait AttrAccess {
    /// Read the value at a dotted path.
    fn get(&self, path: &str) -> Result<AttrValue>;

    /// Write the value at a dotted path.
    fn set(&mut self, path: &str, value: AttrValue) -> Result<()>;

    /// Remove the value at a dotted path (optional fields and extensions).
    fn delete(&mut self, path: &str) -> Result<()>;

    /// Names of the addressable child elements of this container.
    fn elements(&self) -> Vec<String>;
}

/// Split a path into its head segment and the remainder.
pub(crate) fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}

/// Leaf-segment comparison: case-insensitive, underscores ignored.
pub(crate) fn leaf_eq(segment: &str, canonical: &str) -> bool {
    let mut a = segment.chars().filter(|c| *c != '_');
    let mut b = canonical.chars().filter(|c| *c != '_');
    loop {
        match (a.next(), b.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) if x.eq_ignore_ascii_case(&y) => {}
            _ => return false,
        }
    }
}

fn absent(path: &str) -> Error {
    Error::extension_not_present(path.to_string())
}

// ============================================================================
// ExtensionPayload
// ============================================================================

impl AttrAccess for ExtensionPayload {
    fn get(&self, path: &str) -> Result<AttrValue> {
        let (leaf, rest) = split_path(path);
        if rest.is_some() {
            return Err(Error::attr_not_recognized(path));
        }
        match self {
            Self::BasicConstraints(bc) => {
                if leaf_eq(leaf, "ca") {
                    Ok(AttrValue::Bool(bc.ca))
                } else if leaf_eq(leaf, "path_len_constraint") || leaf_eq(leaf, "path_len") {
                    bc.path_len_constraint
                        .map(|v| AttrValue::Int(v as u64))
                        .ok_or_else(|| absent(path))
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::KeyUsage(ku) => {
                if leaf_eq(leaf, "bits") {
                    Ok(AttrValue::Int(ku.bits as u64))
                } else if let Some(flag) = key_usage_flag(leaf) {
                    Ok(AttrValue::Bool(ku.has(flag)))
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::ExtendedKeyUsage(eku) => {
                if leaf_eq(leaf, "usages") {
                    Ok(AttrValue::OidList(eku.usages.clone()))
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::SubjectKeyIdentifier(ski) => {
                if leaf_eq(leaf, "key_identifier") {
                    Ok(AttrValue::Bytes(ski.key_identifier.clone()))
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::AuthorityKeyIdentifier(aki) => {
                if leaf_eq(leaf, "key_identifier") {
                    aki.key_identifier
                        .as_ref()
                        .map(|v| AttrValue::Bytes(v.as_bytes().to_vec()))
                        .ok_or_else(|| absent(path))
                } else if leaf_eq(leaf, "authority_cert_issuer") {
                    aki.authority_cert_issuer
                        .clone()
                        .map(AttrValue::Names)
                        .ok_or_else(|| absent(path))
                } else if leaf_eq(leaf, "authority_cert_serial") {
                    aki.authority_cert_serial
                        .as_ref()
                        .map(|v| AttrValue::Bytes(v.as_bytes().to_vec()))
                        .ok_or_else(|| absent(path))
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::SubjectAltName(names)
            | Self::IssuerAltName(names)
            | Self::CertificateIssuer(names) => {
                if leaf_eq(leaf, "names") {
                    Ok(AttrValue::Names(names.clone()))
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::NameConstraints(nc) => {
                let subtrees = if leaf_eq(leaf, "permitted") {
                    &nc.permitted
                } else if leaf_eq(leaf, "excluded") {
                    &nc.excluded
                } else {
                    return Err(Error::attr_not_recognized(path));
                };
                match subtrees {
                    Some(s) => Ok(AttrValue::Bytes(s.to_der()?)),
                    None => Err(absent(path)),
                }
            }
            Self::PolicyConstraints(pc) => {
                let field = if leaf_eq(leaf, "require_explicit_policy") {
                    pc.require_explicit_policy
                } else if leaf_eq(leaf, "inhibit_policy_mapping") {
                    pc.inhibit_policy_mapping
                } else {
                    return Err(Error::attr_not_recognized(path));
                };
                field
                    .map(|v| AttrValue::Int(v as u64))
                    .ok_or_else(|| absent(path))
            }
            Self::CrlDistributionPoints(cdp) => {
                if leaf_eq(leaf, "points") {
                    Ok(AttrValue::Bytes(cdp.to_der()?))
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::CrlNumber(n) => {
                if leaf_eq(leaf, "number") {
                    Ok(AttrValue::Bytes(n.as_bytes().to_vec()))
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::CrlReason(r) => {
                if leaf_eq(leaf, "reason") {
                    Ok(AttrValue::Int(*r as u64))
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::InvalidityDate(t) => {
                if leaf_eq(leaf, "date") {
                    Ok(AttrValue::Time(*t))
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::Unknown(bytes) => {
                if leaf_eq(leaf, "value") {
                    Ok(AttrValue::Bytes(bytes.clone()))
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
        }
    }

    fn set(&mut self, path: &str, value: AttrValue) -> Result<()> {
        let (leaf, rest) = split_path(path);
        if rest.is_some() {
            return Err(Error::attr_not_recognized(path));
        }
        match self {
            Self::BasicConstraints(bc) => {
                if leaf_eq(leaf, "ca") {
                    let ca = value
                        .as_bool()
                        .ok_or_else(|| Error::attr_type_mismatch(path, "bool"))?;
                    bc.ca = ca;
                    // pathLenConstraint is only meaningful on a CA.
                    if !ca {
                        bc.path_len_constraint = None;
                    }
                    Ok(())
                } else if leaf_eq(leaf, "path_len_constraint") || leaf_eq(leaf, "path_len") {
                    let v = value
                        .as_int()
                        .ok_or_else(|| Error::attr_type_mismatch(path, "integer"))?;
                    bc.path_len_constraint =
                        Some(u8::try_from(v).map_err(|_| Error::attr_type_mismatch(path, "u8"))?);
                    Ok(())
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::KeyUsage(ku) => {
                if leaf_eq(leaf, "bits") {
                    let v = value
                        .as_int()
                        .ok_or_else(|| Error::attr_type_mismatch(path, "integer"))?;
                    ku.bits =
                        u16::try_from(v).map_err(|_| Error::attr_type_mismatch(path, "u16"))?;
                    Ok(())
                } else if let Some(flag) = key_usage_flag(leaf) {
                    let on = value
                        .as_bool()
                        .ok_or_else(|| Error::attr_type_mismatch(path, "bool"))?;
                    if on {
                        ku.bits |= flag;
                    } else {
                        ku.bits &= !flag;
                    }
                    Ok(())
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::ExtendedKeyUsage(eku) => {
                if leaf_eq(leaf, "usages") {
                    match value {
                        AttrValue::OidList(usages) => {
                            eku.usages = usages;
                            Ok(())
                        }
                        _ => Err(Error::attr_type_mismatch(path, "OID list")),
                    }
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::SubjectKeyIdentifier(ski) => {
                if leaf_eq(leaf, "key_identifier") {
                    ski.key_identifier = value
                        .as_bytes()
                        .ok_or_else(|| Error::attr_type_mismatch(path, "bytes"))?
                        .to_vec();
                    Ok(())
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::AuthorityKeyIdentifier(aki) => {
                if leaf_eq(leaf, "key_identifier") {
                    let bytes = value
                        .as_bytes()
                        .ok_or_else(|| Error::attr_type_mismatch(path, "bytes"))?;
                    aki.key_identifier =
                        Some(der::asn1::OctetString::new(bytes.to_vec()).map_err(Error::Asn1)?);
                    Ok(())
                } else if leaf_eq(leaf, "authority_cert_issuer") {
                    match value {
                        AttrValue::Names(names) => {
                            aki.authority_cert_issuer = Some(names);
                            Ok(())
                        }
                        _ => Err(Error::attr_type_mismatch(path, "GeneralNames")),
                    }
                } else if leaf_eq(leaf, "authority_cert_serial") {
                    let bytes = value
                        .as_bytes()
                        .ok_or_else(|| Error::attr_type_mismatch(path, "bytes"))?;
                    aki.authority_cert_serial =
                        Some(der::asn1::Uint::new(bytes).map_err(Error::Asn1)?);
                    Ok(())
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::SubjectAltName(names)
            | Self::IssuerAltName(names)
            | Self::CertificateIssuer(names) => {
                if leaf_eq(leaf, "names") {
                    match value {
                        AttrValue::Names(new_names) => {
                            *names = new_names;
                            Ok(())
                        }
                        _ => Err(Error::attr_type_mismatch(path, "GeneralNames")),
                    }
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::NameConstraints(nc) => {
                let bytes = value
                    .as_bytes()
                    .ok_or_else(|| Error::attr_type_mismatch(path, "DER GeneralSubtrees"))?;
                let subtrees = GeneralSubtrees::from_der(bytes).map_err(Error::Asn1)?;
                if leaf_eq(leaf, "permitted") {
                    nc.permitted = Some(subtrees);
                    Ok(())
                } else if leaf_eq(leaf, "excluded") {
                    nc.excluded = Some(subtrees);
                    Ok(())
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::PolicyConstraints(pc) => {
                let v = value
                    .as_int()
                    .ok_or_else(|| Error::attr_type_mismatch(path, "integer"))?;
                let v = u8::try_from(v).map_err(|_| Error::attr_type_mismatch(path, "u8"))?;
                if leaf_eq(leaf, "require_explicit_policy") {
                    pc.require_explicit_policy = Some(v);
                    Ok(())
                } else if leaf_eq(leaf, "inhibit_policy_mapping") {
                    pc.inhibit_policy_mapping = Some(v);
                    Ok(())
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::CrlDistributionPoints(cdp) => {
                if leaf_eq(leaf, "points") {
                    let bytes = value
                        .as_bytes()
                        .ok_or_else(|| Error::attr_type_mismatch(path, "DER SEQUENCE"))?;
                    *cdp = crate::ext::pkix::CrlDistributionPoints::from_der(bytes)
                        .map_err(Error::Asn1)?;
                    Ok(())
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::CrlNumber(n) => {
                if leaf_eq(leaf, "number") {
                    let bytes = value
                        .as_bytes()
                        .ok_or_else(|| Error::attr_type_mismatch(path, "bytes"))?;
                    *n = CrlNumber::new(bytes).map_err(Error::Asn1)?;
                    Ok(())
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::CrlReason(r) => {
                if leaf_eq(leaf, "reason") {
                    let v = value
                        .as_int()
                        .ok_or_else(|| Error::attr_type_mismatch(path, "integer"))?;
                    *r = CrlReason::from_code(u32::try_from(v).unwrap_or(u32::MAX))
                        .ok_or_else(|| Error::attr_type_mismatch(path, "CRL reason code"))?;
                    Ok(())
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::InvalidityDate(t) => {
                if leaf_eq(leaf, "date") {
                    match value {
                        AttrValue::Time(new_time) => {
                            *t = new_time;
                            Ok(())
                        }
                        _ => Err(Error::attr_type_mismatch(path, "time")),
                    }
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::Unknown(bytes) => {
                if leaf_eq(leaf, "value") {
                    *bytes = value
                        .as_bytes()
                        .ok_or_else(|| Error::attr_type_mismatch(path, "bytes"))?
                        .to_vec();
                    Ok(())
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
        }
    }

    fn delete(&mut self, path: &str) -> Result<()> {
        let (leaf, rest) = split_path(path);
        if rest.is_some() {
            return Err(Error::attr_not_recognized(path));
        }
        match self {
            Self::BasicConstraints(bc)
                if leaf_eq(leaf, "path_len_constraint") || leaf_eq(leaf, "path_len") =>
            {
                bc.path_len_constraint = None;
                Ok(())
            }
            Self::AuthorityKeyIdentifier(aki) => {
                if leaf_eq(leaf, "key_identifier") {
                    aki.key_identifier = None;
                    Ok(())
                } else if leaf_eq(leaf, "authority_cert_issuer") {
                    aki.authority_cert_issuer = None;
                    Ok(())
                } else if leaf_eq(leaf, "authority_cert_serial") {
                    aki.authority_cert_serial = None;
                    Ok(())
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::NameConstraints(nc) => {
                if leaf_eq(leaf, "permitted") {
                    nc.permitted = None;
                    Ok(())
                } else if leaf_eq(leaf, "excluded") {
                    nc.excluded = None;
                    Ok(())
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            Self::PolicyConstraints(pc) => {
                if leaf_eq(leaf, "require_explicit_policy") {
                    pc.require_explicit_policy = None;
                    Ok(())
                } else if leaf_eq(leaf, "inhibit_policy_mapping") {
                    pc.inhibit_policy_mapping = None;
                    Ok(())
                } else {
                    Err(Error::attr_not_recognized(path))
                }
            }
            _ => Err(Error::Attribute(crate::AttributeError::NotSettable(
                path.to_string(),
            ))),
        }
    }

    fn elements(&self) -> Vec<String> {
        let names: &[&str] = match self {
            Self::BasicConstraints(bc) => {
                if bc.path_len_constraint.is_some() {
                    &["ca", "path_len_constraint"]
                } else {
                    &["ca"]
                }
            }
            Self::KeyUsage(_) => &[
                "bits",
                "digital_signature",
                "non_repudiation",
                "key_encipherment",
                "data_encipherment",
                "key_agreement",
                "key_cert_sign",
                "crl_sign",
                "encipher_only",
                "decipher_only",
            ],
            Self::ExtendedKeyUsage(_) => &["usages"],
            Self::SubjectKeyIdentifier(_) => &["key_identifier"],
            Self::AuthorityKeyIdentifier(_) => &[
                "key_identifier",
                "authority_cert_issuer",
                "authority_cert_serial",
            ],
            Self::SubjectAltName(_) | Self::IssuerAltName(_) | Self::CertificateIssuer(_) => {
                &["names"]
            }
            Self::NameConstraints(_) => &["permitted", "excluded"],
            Self::PolicyConstraints(_) => {
                &["require_explicit_policy", "inhibit_policy_mapping"]
            }
            Self::CrlDistributionPoints(_) => &["points"],
            Self::CrlNumber(_) => &["number"],
            Self::CrlReason(_) => &["reason"],
            Self::InvalidityDate(_) => &["date"],
            Self::Unknown(_) => &["value"],
        };
        names.iter().map(|s| s.to_string()).collect()
    }
}

fn key_usage_flag(leaf: &str) -> Option<u16> {
    let table: &[(&str, u16)] = &[
        ("digital_signature", KeyUsage::DIGITAL_SIGNATURE),
        ("non_repudiation", KeyUsage::NON_REPUDIATION),
        ("key_encipherment", KeyUsage::KEY_ENCIPHERMENT),
        ("data_encipherment", KeyUsage::DATA_ENCIPHERMENT),
        ("key_agreement", KeyUsage::KEY_AGREEMENT),
        ("key_cert_sign", KeyUsage::KEY_CERT_SIGN),
        ("crl_sign", KeyUsage::CRL_SIGN),
        ("encipher_only", KeyUsage::ENCIPHER_ONLY),
        ("decipher_only", KeyUsage::DECIPHER_ONLY),
    ];
    table
        .iter()
        .find(|(name, _)| leaf_eq(leaf, name))
        .map(|(_, flag)| *flag)
}

// ============================================================================
// ExtensionSet
// ============================================================================

impl AttrAccess for ExtensionSet {
    fn get(&self, path: &str) -> Result<AttrValue> {
        let (head, rest) = split_path(path);
        let item = self
            .get_by_name(head)
            .ok_or_else(|| Error::attr_not_recognized(path))?;
        match rest {
            None => Ok(AttrValue::Bytes(item.extension.value().to_vec())),
            Some("critical") => Ok(AttrValue::Bool(item.critical())),
            Some(rest) => item.payload.get(rest),
        }
    }

    fn set(&mut self, path: &str, value: AttrValue) -> Result<()> {
        let (head, rest) = split_path(path);
        let item = self
            .get_by_name_mut(head)
            .ok_or_else(|| Error::attr_not_recognized(path))?;
        match rest {
            None => Err(Error::Attribute(crate::AttributeError::NotSettable(
                path.to_string(),
            ))),
            Some("critical") => {
                item.extension.critical = value
                    .as_bool()
                    .ok_or_else(|| Error::attr_type_mismatch(path, "bool"))?;
                Ok(())
            }
            Some(rest) => {
                item.payload.set(rest, value)?;
                item.resync().map_err(Error::Asn1)
            }
        }
    }

    fn delete(&mut self, path: &str) -> Result<()> {
        let (head, rest) = split_path(path);
        match rest {
            None => {
                let oid = crate::oid::oid_for(head)
                    .or_else(|| head.parse::<ObjectIdentifier>().ok())
                    .ok_or_else(|| Error::attr_not_recognized(path))?;
                self.delete(&oid)
            }
            Some(rest) => {
                let item = self
                    .get_by_name_mut(head)
                    .ok_or_else(|| Error::attr_not_recognized(path))?;
                item.payload.delete(rest)?;
                item.resync().map_err(Error::Asn1)
            }
        }
    }

    fn elements(&self) -> Vec<String> {
        self.iter().map(|item| item.name()).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
