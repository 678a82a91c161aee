// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Distinguished Name (DN) support.
//!
//! This module provides the DER-level model for X.501 names:
//! - Name (RDNSequence)
//! - RelativeDistinguishedName (RDN)
//! - AttributeTypeAndValue
//! - Common DN attribute types (CN, O, OU, C, ST, L, etc.)
//!
//! Attribute values keep their raw DER bytes so tags the `der` crate cannot
//! represent (e.g. UniversalString, 0x1C) still round-trip exactly.
//!
//! Two names are equal when their canonical string forms are equal: attribute
//! values lowercased with whitespace collapsed, multi-valued RDNs in a fixed
//! order. The canonical form is computed once per name and cached.

pub mod general;
pub mod parse;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use const_oid::ObjectIdentifier;
use der::{
    asn1::{Ia5String, PrintableString, SetOfVec, Utf8StringRef},
    Decode, DecodeValue, Encode, EncodeValue, Error, ErrorKind, Header, Length, Reader, Sequence,
    Tag, ValueOrd, Writer,
};

// ============================================================================
// Common Attribute Type OIDs (RFC 5280, Appendix A.1)
// ============================================================================

/// Common Name (CN) - 2.5.4.3
pub const CN: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");

/// Surname (SN) - 2.5.4.4
pub const SURNAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.4");

/// Serial Number - 2.5.4.5
pub const SERIAL_NUMBER: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.5");

/// Country (C) - 2.5.4.6
pub const COUNTRY_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");

/// Locality (L) - 2.5.4.7
pub const LOCALITY_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.7");

/// State or Province (ST) - 2.5.4.8
pub const STATE_OR_PROVINCE_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.8");

/// Street Address - 2.5.4.9
pub const STREET_ADDRESS: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.9");

/// Organization (O) - 2.5.4.10
pub const ORGANIZATION_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");

/// Organizational Unit (OU) - 2.5.4.11
pub const ORGANIZATIONAL_UNIT_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");

/// Title - 2.5.4.12
pub const TITLE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.12");

/// Given Name - 2.5.4.42
pub const GIVEN_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.42");

/// User ID (UID) - 0.9.2342.19200300.100.1.1
pub const USER_ID: ObjectIdentifier = ObjectIdentifier::new_unwrap("0.9.2342.19200300.100.1.1");

/// Domain Component (DC) - 0.9.2342.19200300.100.1.25
pub const DOMAIN_COMPONENT: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("0.9.2342.19200300.100.1.25");

/// Email Address - 1.2.840.113549.1.9.1
pub const EMAIL_ADDRESS: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.1");

/// Keyword table mapping attribute-type OIDs to their RFC 2253 / RFC 4514
/// short names. Used for Display output, string parsing and canonical
/// ordering of multi-valued RDNs.
pub const KEYWORDS: &[(ObjectIdentifier, &str)] = &[
    (CN, "CN"),
    (SURNAME, "SN"),
    (SERIAL_NUMBER, "SERIALNUMBER"),
    (COUNTRY_NAME, "C"),
    (LOCALITY_NAME, "L"),
    (STATE_OR_PROVINCE_NAME, "ST"),
    (STREET_ADDRESS, "STREET"),
    (ORGANIZATION_NAME, "O"),
    (ORGANIZATIONAL_UNIT_NAME, "OU"),
    (TITLE, "TITLE"),
    (GIVEN_NAME, "GIVENNAME"),
    (USER_ID, "UID"),
    (DOMAIN_COMPONENT, "DC"),
    (EMAIL_ADDRESS, "emailAddress"),
];

/// Look up the short keyword for an attribute-type OID.
pub fn keyword_for(oid: ObjectIdentifier) -> Option<&'static str> {
    KEYWORDS.iter().find(|(o, _)| *o == oid).map(|(_, kw)| *kw)
}

/// Look up the attribute-type OID for a keyword (case-insensitive).
pub fn oid_for_keyword(keyword: &str) -> Option<ObjectIdentifier> {
    KEYWORDS
        .iter()
        .find(|(_, kw)| kw.eq_ignore_ascii_case(keyword))
        .map(|(oid, _)| *oid)
}

// ============================================================================
// DirectoryString - RFC 5280 Section 4.1.2.4
// ============================================================================

/// DirectoryString represents the ASN.1 string types used in X.509 names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryString {
    /// TeletexString (T61String) - Tag 20
    TeletexString(Vec<u8>),
    /// PrintableString - Tag 19
    PrintableString(PrintableString),
    /// UniversalString - Tag 28
    UniversalString(Vec<u8>),
    /// UTF8String - Tag 12
    Utf8String(String),
    /// BMPString - Tag 30
    BmpString(Vec<u8>),
    /// IA5String - Tag 22 (used for email addresses and DC)
    Ia5String(Ia5String),
}

impl DirectoryString {
    /// Get the string value as UTF-8, converting if necessary.
    pub fn as_str(&self) -> Result<String, Error> {
        match self {
            DirectoryString::Utf8String(s) => Ok(s.clone()),
            DirectoryString::PrintableString(s) => Ok(s.to_string()),
            DirectoryString::Ia5String(s) => Ok(s.as_str().to_string()),
            DirectoryString::TeletexString(bytes) => String::from_utf8(bytes.clone())
                .or_else(|_| Ok(String::from_utf8_lossy(bytes).to_string())),
            DirectoryString::BmpString(bytes) => {
                if bytes.len() % 2 != 0 {
                    return Err(ErrorKind::Length {
                        tag: Tag::BmpString,
                    }
                    .into());
                }
                let utf16_chars: Vec<u16> = bytes
                    .chunks(2)
                    .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
                    .collect();
                String::from_utf16(&utf16_chars).map_err(|_| {
                    ErrorKind::Value {
                        tag: Tag::BmpString,
                    }
                    .into()
                })
            }
            DirectoryString::UniversalString(bytes) => {
                if bytes.len() % 4 != 0 {
                    return Err(ErrorKind::Length {
                        tag: Tag::TeletexString,
                    }
                    .into());
                }
                let mut result = String::new();
                for chunk in bytes.chunks(4) {
                    let code_point = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                    let ch = char::from_u32(code_point).ok_or(ErrorKind::Value {
                        tag: Tag::TeletexString,
                    })?;
                    result.push(ch);
                }
                Ok(result)
            }
        }
    }

    /// Get the raw ASN.1 tag byte for encoding.
    ///
    /// The `der` crate (0.7) does not include `Tag::UniversalString` (0x1C),
    /// so encoding is handled manually to keep round-trip fidelity.
    fn encoding_tag_byte(&self) -> u8 {
        match self {
            DirectoryString::Utf8String(_) => 0x0C,
            DirectoryString::PrintableString(_) => 0x13,
            DirectoryString::Ia5String(_) => 0x16,
            DirectoryString::TeletexString(_) => 0x14,
            DirectoryString::BmpString(_) => 0x1E,
            DirectoryString::UniversalString(_) => 0x1C,
        }
    }
}

impl<'a> DecodeValue<'a> for DirectoryString {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        match header.tag {
            Tag::Utf8String => {
                let s = Utf8StringRef::decode_value(reader, header)?;
                Ok(DirectoryString::Utf8String(s.as_str().to_string()))
            }
            Tag::PrintableString => {
                let s = PrintableString::decode_value(reader, header)?;
                Ok(DirectoryString::PrintableString(s))
            }
            Tag::Ia5String => {
                let s = Ia5String::decode_value(reader, header)?;
                Ok(DirectoryString::Ia5String(s))
            }
            Tag::TeletexString => {
                let bytes = reader.read_vec(header.length)?;
                Ok(DirectoryString::TeletexString(bytes))
            }
            Tag::BmpString => {
                let bytes = reader.read_vec(header.length)?;
                Ok(DirectoryString::BmpString(bytes))
            }
            _ => Err(ErrorKind::TagUnexpected {
                expected: Some(Tag::Utf8String),
                actual: header.tag,
            }
            .into()),
        }
    }
}

impl EncodeValue for DirectoryString {
    fn value_len(&self) -> der::Result<Length> {
        match self {
            DirectoryString::Utf8String(s) => s.len().try_into(),
            DirectoryString::PrintableString(s) => s.value_len(),
            DirectoryString::Ia5String(s) => s.value_len(),
            DirectoryString::TeletexString(bytes) => bytes.len().try_into(),
            DirectoryString::BmpString(bytes) => bytes.len().try_into(),
            DirectoryString::UniversalString(bytes) => bytes.len().try_into(),
        }
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        match self {
            DirectoryString::Utf8String(s) => writer.write(s.as_bytes()),
            DirectoryString::PrintableString(s) => s.encode_value(writer),
            DirectoryString::Ia5String(s) => s.encode_value(writer),
            DirectoryString::TeletexString(bytes) => writer.write(bytes),
            DirectoryString::BmpString(bytes) => writer.write(bytes),
            DirectoryString::UniversalString(bytes) => writer.write(bytes),
        }
    }
}

// Manual `Encode` implementation to handle UniversalString (tag 0x1C)
// which is not representable via the `der` crate's `Tag` enum.
impl Encode for DirectoryString {
    fn encoded_len(&self) -> der::Result<Length> {
        let value_len = self.value_len()?;
        (Length::ONE + value_len.encoded_len()?)? + value_len
    }

    fn encode(&self, writer: &mut impl Writer) -> der::Result<()> {
        writer.write_byte(self.encoding_tag_byte())?;
        self.value_len()?.encode(writer)?;
        self.encode_value(writer)
    }
}

impl fmt::Display for DirectoryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Ok(s) => write!(f, "{}", s),
            Err(_) => write!(f, "<invalid encoding>"),
        }
    }
}

// ============================================================================
// AttributeTypeAndValue - RFC 5280 Section 4.1.2.4
// ============================================================================

/// AttributeTypeAndValue represents a single attribute in an RDN.
///
/// Uses raw DER bytes for the value field to support ASN.1 tags not
/// representable in [`der::Tag`] (e.g., UniversalString tag 0x1C).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTypeAndValue {
    /// Attribute type (OID)
    pub oid: ObjectIdentifier,
    /// Raw DER-encoded value (tag + length + content).
    raw_value: Vec<u8>,
}

// Manual Sequence / DecodeValue / EncodeValue impls so unknown tag bytes
// (like UniversalString 0x1C) pass through without loss.

impl<'a> DecodeValue<'a> for AttributeTypeAndValue {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        reader.read_nested(header.length, |nested| {
            let oid = ObjectIdentifier::decode(nested)?;

            // Read all remaining bytes as the raw DER TLV of the value field.
            let remaining = nested.remaining_len();
            let raw_value = nested.read_vec(remaining)?;

            if raw_value.is_empty() {
                return Err(ErrorKind::Length { tag: Tag::Sequence }.into());
            }

            Ok(Self { oid, raw_value })
        })
    }
}

impl EncodeValue for AttributeTypeAndValue {
    fn value_len(&self) -> der::Result<Length> {
        let oid_len = self.oid.encoded_len()?;
        let raw_len = Length::try_from(self.raw_value.len())?;
        oid_len + raw_len
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        self.oid.encode(writer)?;
        writer.write(&self.raw_value)
    }
}

impl Sequence<'_> for AttributeTypeAndValue {}

impl AttributeTypeAndValue {
    /// Create a new AttributeTypeAndValue with a DirectoryString value.
    pub fn new(oid: ObjectIdentifier, value: DirectoryString) -> Result<Self, Error> {
        let raw_value = value.to_der()?;
        Ok(Self { oid, raw_value })
    }

    /// Create a new AttributeTypeAndValue with a UTF-8 string value.
    pub fn new_utf8(oid: ObjectIdentifier, value: &str) -> Result<Self, Error> {
        Self::new(oid, DirectoryString::Utf8String(value.to_string()))
    }

    /// Create a new AttributeTypeAndValue with a PrintableString value.
    pub fn new_printable(oid: ObjectIdentifier, value: &str) -> Result<Self, Error> {
        let printable = PrintableString::new(value).map_err(|_| ErrorKind::Value {
            tag: Tag::PrintableString,
        })?;
        Self::new(oid, DirectoryString::PrintableString(printable))
    }

    /// Create an AttributeTypeAndValue from a raw DER TLV value.
    ///
    /// Used for `#`-prefixed hex values in RFC 2253 strings, where the value
    /// bytes are given verbatim.
    pub fn from_raw_der(oid: ObjectIdentifier, raw_value: Vec<u8>) -> Result<Self, Error> {
        if raw_value.len() < 2 {
            return Err(ErrorKind::Length { tag: Tag::Sequence }.into());
        }
        Ok(Self { oid, raw_value })
    }

    /// The raw DER TLV of the attribute value.
    pub fn raw_value(&self) -> &[u8] {
        &self.raw_value
    }

    /// The raw tag byte of the attribute value.
    pub fn value_tag_byte(&self) -> u8 {
        self.raw_value.first().copied().unwrap_or(0)
    }

    /// The content bytes of the attribute value (after tag + length).
    pub fn value_content(&self) -> &[u8] {
        if self.raw_value.len() < 2 {
            return &[];
        }
        let len_byte = self.raw_value[1];
        if len_byte & 0x80 == 0 {
            // short form
            self.raw_value.get(2..).unwrap_or(&[])
        } else {
            let n = (len_byte & 0x7F) as usize;
            self.raw_value.get(2 + n..).unwrap_or(&[])
        }
    }

    /// Get the attribute value as a [`DirectoryString`].
    ///
    /// Handles all standard string types including UniversalString (tag 0x1C)
    /// which is not representable in [`der::Tag`].
    pub fn directory_string(&self) -> Result<DirectoryString, Error> {
        let tag_byte = self.value_tag_byte();
        let content = self.value_content();

        match tag_byte {
            // UTF8String (0x0C)
            0x0C => String::from_utf8(content.to_vec())
                .map(DirectoryString::Utf8String)
                .map_err(|_| {
                    ErrorKind::Value {
                        tag: Tag::Utf8String,
                    }
                    .into()
                }),
            // PrintableString (0x13)
            0x13 => {
                let ps = PrintableString::new(std::str::from_utf8(content).map_err(|_| {
                    ErrorKind::Value {
                        tag: Tag::PrintableString,
                    }
                })?)
                .map_err(|_| ErrorKind::Value {
                    tag: Tag::PrintableString,
                })?;
                Ok(DirectoryString::PrintableString(ps))
            }
            // IA5String (0x16)
            0x16 => {
                let ia5 = Ia5String::new(std::str::from_utf8(content).map_err(|_| {
                    ErrorKind::Value {
                        tag: Tag::Ia5String,
                    }
                })?)
                .map_err(|_| ErrorKind::Value {
                    tag: Tag::Ia5String,
                })?;
                Ok(DirectoryString::Ia5String(ia5))
            }
            // TeletexString / T61String (0x14)
            0x14 => Ok(DirectoryString::TeletexString(content.to_vec())),
            // BMPString (0x1E)
            0x1E => Ok(DirectoryString::BmpString(content.to_vec())),
            // UniversalString (0x1C)
            0x1C => Ok(DirectoryString::UniversalString(content.to_vec())),
            _ => Err(ErrorKind::TagUnexpected {
                expected: Some(Tag::Utf8String),
                actual: Tag::try_from(tag_byte).unwrap_or(Tag::Utf8String),
            }
            .into()),
        }
    }

    /// Get the attribute value as a UTF-8 string.
    pub fn value_as_str(&self) -> Result<String, Error> {
        self.directory_string()?.as_str()
    }

    /// Get a short name for the attribute type if known.
    pub fn attr_name(&self) -> &str {
        keyword_for(self.oid).unwrap_or("OID")
    }

    /// Canonical `key=value` form for this attribute.
    ///
    /// Key is the lowercased keyword (or dotted-decimal OID), value is
    /// lowercased with whitespace trimmed and collapsed. Values that do not
    /// decode as a string are hex-dumped with a `#` prefix.
    pub fn canonical(&self) -> String {
        let key = match keyword_for(self.oid) {
            Some(kw) => kw.to_ascii_lowercase(),
            None => self.oid.to_string(),
        };
        let value = match self.value_as_str() {
            Ok(s) => canonicalize_value(&s),
            Err(_) => {
                let mut hex = String::with_capacity(1 + self.raw_value.len() * 2);
                hex.push('#');
                for b in &self.raw_value {
                    hex.push_str(&format!("{:02x}", b));
                }
                hex
            }
        };
        format!("{}={}", key, value)
    }
}

/// Lowercase a value and collapse internal whitespace runs to single spaces.
fn canonicalize_value(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_space = false;
    for ch in s.trim().chars() {
        if ch.is_whitespace() {
            in_space = true;
            continue;
        }
        if in_space && !out.is_empty() {
            out.push(' ');
        }
        in_space = false;
        for lower in ch.to_lowercase() {
            out.push(lower);
        }
    }
    out
}

impl fmt::Display for AttributeTypeAndValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.attr_name();
        match self.value_as_str() {
            Ok(value) => {
                if name == "OID" {
                    write!(f, "{}={}", self.oid, value)
                } else {
                    write!(f, "{}={}", name, value)
                }
            }
            Err(_) => write!(f, "{}=<error>", name),
        }
    }
}

impl ValueOrd for AttributeTypeAndValue {
    fn value_cmp(&self, other: &Self) -> der::Result<std::cmp::Ordering> {
        match self.oid.cmp(&other.oid) {
            std::cmp::Ordering::Equal => Ok(self.raw_value.cmp(&other.raw_value)),
            other_order => Ok(other_order),
        }
    }
}

// ============================================================================
// RelativeDistinguishedName - RFC 5280 Section 4.1.2.4
// ============================================================================

/// RelativeDistinguishedName (RDN) is a SET OF AttributeTypeAndValue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeDistinguishedName {
    /// Set of attributes
    pub attributes: SetOfVec<AttributeTypeAndValue>,
}

impl RelativeDistinguishedName {
    /// Create a new RDN with a single attribute.
    pub fn new(attr: AttributeTypeAndValue) -> Result<Self, Error> {
        let mut attributes = SetOfVec::new();
        attributes
            .insert(attr)
            .map_err(|_| ErrorKind::Value { tag: Tag::Set })?;
        Ok(Self { attributes })
    }

    /// Create a new RDN from multiple attributes.
    pub fn from_attributes(attrs: Vec<AttributeTypeAndValue>) -> Result<Self, Error> {
        let mut attributes = SetOfVec::new();
        for attr in attrs {
            attributes
                .insert(attr)
                .map_err(|_| ErrorKind::Value { tag: Tag::Set })?;
        }
        Ok(Self { attributes })
    }

    /// Get the first (or only) attribute in this RDN.
    pub fn first(&self) -> Option<&AttributeTypeAndValue> {
        self.attributes.iter().next()
    }

    /// Check if this is a multi-valued RDN.
    pub fn is_multi_valued(&self) -> bool {
        self.attributes.len() > 1
    }

    /// Canonical string form of this RDN.
    ///
    /// Multi-valued RDNs are ordered for comparison purposes: attributes with
    /// known keywords sort alphabetically by keyword and come before
    /// keyword-less attributes, which sort by numeric OID comparison.
    pub fn canonical(&self) -> String {
        let mut attrs: Vec<&AttributeTypeAndValue> = self.attributes.iter().collect();
        attrs.sort_by(|a, b| canonical_attr_order(a, b));
        let parts: Vec<String> = attrs.iter().map(|a| a.canonical()).collect();
        parts.join("+")
    }
}

/// Ordering for attributes within a multi-valued RDN's canonical form.
fn canonical_attr_order(
    a: &AttributeTypeAndValue,
    b: &AttributeTypeAndValue,
) -> std::cmp::Ordering {
    match (keyword_for(a.oid), keyword_for(b.oid)) {
        (Some(ka), Some(kb)) => ka
            .to_ascii_lowercase()
            .cmp(&kb.to_ascii_lowercase())
            .then_with(|| a.oid.cmp(&b.oid)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => numeric_oid_order(&a.oid, &b.oid),
    }
}

/// Compare two OIDs component-wise numerically.
fn numeric_oid_order(a: &ObjectIdentifier, b: &ObjectIdentifier) -> std::cmp::Ordering {
    let parse = |oid: &ObjectIdentifier| -> Vec<u64> {
        oid.to_string()
            .split('.')
            .filter_map(|c| c.parse().ok())
            .collect()
    };
    parse(a).cmp(&parse(b))
}

impl<'a> DecodeValue<'a> for RelativeDistinguishedName {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        let attributes = SetOfVec::decode_value(reader, header)?;
        Ok(Self { attributes })
    }
}

impl EncodeValue for RelativeDistinguishedName {
    fn value_len(&self) -> der::Result<Length> {
        self.attributes.value_len()
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        self.attributes.encode_value(writer)
    }
}

impl der::FixedTag for RelativeDistinguishedName {
    const TAG: Tag = Tag::Set;
}

impl fmt::Display for RelativeDistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attrs: Vec<String> = self.attributes.iter().map(|a| a.to_string()).collect();
        write!(f, "{}", attrs.join("+"))
    }
}

// ============================================================================
// Name (RDNSequence) - RFC 5280 Section 4.1.2.4
// ============================================================================

/// A Distinguished Name: a SEQUENCE OF RelativeDistinguishedName.
///
/// RDNs are stored in DER order (least-specific first, as on the wire).
/// [`fmt::Display`] and [`Name::to_rfc2253`] render most-specific first,
/// matching how name strings are conventionally written.
///
/// Equality and hashing are defined over the canonical string form, which is
/// computed lazily and cached.
#[derive(Debug, Clone)]
pub struct Name {
    rdns: Vec<RelativeDistinguishedName>,
    canonical: OnceLock<String>,
}

impl Name {
    /// Create a new empty Name.
    pub fn new() -> Self {
        Self {
            rdns: Vec::new(),
            canonical: OnceLock::new(),
        }
    }

    /// Create a Name from a vector of RDNs (DER order: root first).
    pub fn from_rdns(rdns: Vec<RelativeDistinguishedName>) -> Self {
        Self {
            rdns,
            canonical: OnceLock::new(),
        }
    }

    /// Parse a Name from an RFC 2253 string (strict).
    pub fn from_rfc2253(s: &str) -> crate::error::Result<Self> {
        parse::parse_rfc2253(s)
    }

    /// Parse a Name from a legacy string form (permissive: `,` or `;`
    /// separators, loose whitespace around `=` and separators).
    pub fn from_legacy_str(s: &str) -> crate::error::Result<Self> {
        parse::parse_legacy(s)
    }

    /// Add an RDN (appended at the most-specific end).
    pub fn push(&mut self, rdn: RelativeDistinguishedName) {
        self.rdns.push(rdn);
        self.canonical = OnceLock::new();
    }

    /// The RDNs in DER order.
    pub fn rdns(&self) -> &[RelativeDistinguishedName] {
        &self.rdns
    }

    /// Get an iterator over the RDNs in DER order.
    pub fn iter(&self) -> std::slice::Iter<'_, RelativeDistinguishedName> {
        self.rdns.iter()
    }

    /// True if this name contains no RDNs.
    pub fn is_empty(&self) -> bool {
        self.rdns.is_empty()
    }

    /// Number of RDNs.
    pub fn len(&self) -> usize {
        self.rdns.len()
    }

    /// Find the first attribute with the given OID.
    pub fn find_attr(&self, oid: ObjectIdentifier) -> Option<&AttributeTypeAndValue> {
        for rdn in &self.rdns {
            for attr in rdn.attributes.iter() {
                if attr.oid == oid {
                    return Some(attr);
                }
            }
        }
        None
    }

    /// Get the Common Name (CN) if present.
    pub fn common_name(&self) -> Option<String> {
        self.find_attr(CN).and_then(|a| a.value_as_str().ok())
    }

    /// Get the Organization (O) if present.
    pub fn organization(&self) -> Option<String> {
        self.find_attr(ORGANIZATION_NAME)
            .and_then(|a| a.value_as_str().ok())
    }

    /// Get the Country (C) if present.
    pub fn country(&self) -> Option<String> {
        self.find_attr(COUNTRY_NAME)
            .and_then(|a| a.value_as_str().ok())
    }

    /// The canonical string form, computed once and cached.
    ///
    /// RDNs appear in DER order joined by `,`; see
    /// [`RelativeDistinguishedName::canonical`] for the per-RDN form.
    pub fn canonical_str(&self) -> &str {
        self.canonical
            .get_or_init(|| self.canonical_rdn_strings().join(","))
    }

    /// Canonical string form of each RDN, in DER order.
    ///
    /// Useful for structural prefix comparison (directoryName constraints).
    pub fn canonical_rdn_strings(&self) -> Vec<String> {
        self.rdns.iter().map(|r| r.canonical()).collect()
    }

    /// Render in strict RFC 2253 form: most-specific RDN first, `,`
    /// separators, special characters escaped.
    pub fn to_rfc2253(&self) -> String {
        let parts: Vec<String> = self
            .rdns
            .iter()
            .rev()
            .map(parse::rdn_to_rfc2253)
            .collect();
        parts.join(",")
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_str() == other.canonical_str()
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_str().hash(state);
    }
}

impl<'a> DecodeValue<'a> for Name {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        reader.read_nested(header.length, |reader| {
            let mut rdns = Vec::new();
            while !reader.is_finished() {
                rdns.push(RelativeDistinguishedName::decode(reader)?);
            }
            Ok(Self::from_rdns(rdns))
        })
    }
}

impl EncodeValue for Name {
    fn value_len(&self) -> der::Result<Length> {
        let mut len = Length::ZERO;
        for rdn in &self.rdns {
            len = (len + rdn.encoded_len()?)?;
        }
        Ok(len)
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        for rdn in &self.rdns {
            rdn.encode(writer)?;
        }
        Ok(())
    }
}

impl der::FixedTag for Name {
    const TAG: Tag = Tag::Sequence;
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rdns.is_empty() {
            return write!(f, "");
        }
        let rdns: Vec<String> = self.rdns.iter().rev().map(|r| r.to_string()).collect();
        write!(f, "{}", rdns.join(", "))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_name() -> Name {
        let mut name = Name::new();
        let c = AttributeTypeAndValue::new_printable(COUNTRY_NAME, "US").unwrap();
        name.push(RelativeDistinguishedName::new(c).unwrap());
        let o = AttributeTypeAndValue::new_utf8(ORGANIZATION_NAME, "Example Inc").unwrap();
        name.push(RelativeDistinguishedName::new(o).unwrap());
        let cn = AttributeTypeAndValue::new_utf8(CN, "John Doe").unwrap();
        name.push(RelativeDistinguishedName::new(cn).unwrap());
        name
    }

    #[test]
    fn test_directory_string_utf8() {
        let ds = DirectoryString::Utf8String("Hello World".to_string());
        assert_eq!(ds.as_str().unwrap(), "Hello World");
        assert_eq!(ds.to_string(), "Hello World");
    }

    #[test]
    fn test_attribute_type_and_value() {
        let attr = AttributeTypeAndValue::new_utf8(CN, "Example Corp").unwrap();
        assert_eq!(attr.oid, CN);
        assert_eq!(attr.value_as_str().unwrap(), "Example Corp");
        assert_eq!(attr.attr_name(), "CN");
        assert_eq!(attr.to_string(), "CN=Example Corp");
    }

    #[test]
    fn test_attr_canonical() {
        let attr = AttributeTypeAndValue::new_utf8(CN, "  Example   Corp ").unwrap();
        assert_eq!(attr.canonical(), "cn=example corp");
    }

    #[test]
    fn test_rdn() {
        let attr = AttributeTypeAndValue::new_utf8(CN, "Test").unwrap();
        let rdn = RelativeDistinguishedName::new(attr).unwrap();
        assert!(!rdn.is_multi_valued());
        assert_eq!(rdn.to_string(), "CN=Test");
    }

    #[test]
    fn test_multi_valued_rdn_canonical_order() {
        // OU sorts before CN? No: alphabetical by keyword, cn < ou.
        let cn = AttributeTypeAndValue::new_utf8(CN, "a").unwrap();
        let ou = AttributeTypeAndValue::new_utf8(ORGANIZATIONAL_UNIT_NAME, "b").unwrap();
        let rdn = RelativeDistinguishedName::from_attributes(vec![ou, cn]).unwrap();
        assert_eq!(rdn.canonical(), "cn=a+ou=b");
    }

    #[test]
    fn test_name_display_and_lookup() {
        let name = simple_name();
        assert_eq!(name.common_name().unwrap(), "John Doe");
        assert_eq!(name.organization().unwrap(), "Example Inc");
        assert_eq!(name.country().unwrap(), "US");

        // Display is most-specific first
        assert_eq!(name.to_string(), "CN=John Doe, O=Example Inc, C=US");
    }

    #[test]
    fn test_canonical_equality() {
        let a = simple_name();

        let mut b = Name::new();
        let c = AttributeTypeAndValue::new_utf8(COUNTRY_NAME, "us").unwrap();
        b.push(RelativeDistinguishedName::new(c).unwrap());
        let o = AttributeTypeAndValue::new_printable(ORGANIZATION_NAME, "EXAMPLE   INC").unwrap();
        b.push(RelativeDistinguishedName::new(o).unwrap());
        let cn = AttributeTypeAndValue::new_utf8(CN, " john doe ").unwrap();
        b.push(RelativeDistinguishedName::new(cn).unwrap());

        // Differ in case, whitespace and string tags, but canonically equal.
        assert_eq!(a, b);
        assert_eq!(a.canonical_str(), b.canonical_str());
    }

    #[test]
    fn test_canonical_inequality() {
        let a = simple_name();
        let mut b = Name::new();
        let cn = AttributeTypeAndValue::new_utf8(CN, "Jane Doe").unwrap();
        b.push(RelativeDistinguishedName::new(cn).unwrap());
        assert_ne!(a, b);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let name = simple_name();
        let der = name.to_der().unwrap();
        let decoded = Name::from_der(&der).unwrap();

        assert_eq!(name, decoded);
        assert_eq!(decoded.common_name().unwrap(), "John Doe");
        // Re-encoding is byte-identical.
        assert_eq!(decoded.to_der().unwrap(), der);
    }

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(keyword_for(CN), Some("CN"));
        assert_eq!(oid_for_keyword("cn"), Some(CN));
        assert_eq!(oid_for_keyword("Ou"), Some(ORGANIZATIONAL_UNIT_NAME));
        assert_eq!(oid_for_keyword("nope"), None);
    }
}
