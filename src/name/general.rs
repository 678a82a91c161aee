// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! GeneralName and GeneralNames - RFC 5280 Section 4.2.1.6.
//!
//! ```asn1
//! GeneralName ::= CHOICE {
//!     otherName                 [0] OtherName,
//!     rfc822Name                [1] IA5String,
//!     dNSName                   [2] IA5String,
//!     x400Address               [3] ORAddress,
//!     directoryName             [4] Name,
//!     ediPartyName              [5] EDIPartyName,
//!     uniformResourceIdentifier [6] IA5String,
//!     iPAddress                 [7] OCTET STRING,
//!     registeredID              [8] OBJECT IDENTIFIER
//! }
//! ```
//!
//! otherName, x400Address and ediPartyName are kept as opaque bytes.

use std::fmt;

use const_oid::ObjectIdentifier;
use der::{
    Decode, DecodeValue, Encode, EncodeValue, ErrorKind, Header, Length, Reader, Tag, TagNumber,
    Tagged, Writer,
};

use crate::name::Name;

/// The kind of a [`GeneralName`], used when matching name-constraint
/// subtrees against candidate names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// otherName `[0]`
    Other,
    /// rfc822Name `[1]`
    Rfc822,
    /// dNSName `[2]`
    Dns,
    /// x400Address `[3]`
    X400,
    /// directoryName `[4]`
    Directory,
    /// ediPartyName `[5]`
    EdiParty,
    /// uniformResourceIdentifier `[6]`
    Uri,
    /// iPAddress `[7]`
    Ip,
    /// registeredID `[8]`
    RegisteredId,
}

/// GeneralName represents one alternative-name form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneralName {
    /// otherName `[0]`
    OtherName(Vec<u8>),
    /// rfc822Name `[1]` - Email address
    Rfc822Name(String),
    /// dNSName `[2]` - DNS hostname
    DnsName(String),
    /// x400Address `[3]`
    X400Address(Vec<u8>),
    /// directoryName `[4]` - Distinguished Name
    DirectoryName(Name),
    /// ediPartyName `[5]`
    EdiPartyName(Vec<u8>),
    /// uniformResourceIdentifier `[6]` - URI
    Uri(String),
    /// iPAddress `[7]` - IPv4 or IPv6 address (bare, or address+mask in
    /// name-constraint subtrees)
    IpAddress(Vec<u8>),
    /// registeredID `[8]` - OID
    RegisteredId(ObjectIdentifier),
}

impl GeneralName {
    fn tag_number(&self) -> TagNumber {
        match self {
            GeneralName::OtherName(_) => TagNumber::N0,
            GeneralName::Rfc822Name(_) => TagNumber::N1,
            GeneralName::DnsName(_) => TagNumber::N2,
            GeneralName::X400Address(_) => TagNumber::N3,
            GeneralName::DirectoryName(_) => TagNumber::N4,
            GeneralName::EdiPartyName(_) => TagNumber::N5,
            GeneralName::Uri(_) => TagNumber::N6,
            GeneralName::IpAddress(_) => TagNumber::N7,
            GeneralName::RegisteredId(_) => TagNumber::N8,
        }
    }

    /// The kind of this name (its CHOICE arm).
    pub fn kind(&self) -> NameKind {
        match self {
            GeneralName::OtherName(_) => NameKind::Other,
            GeneralName::Rfc822Name(_) => NameKind::Rfc822,
            GeneralName::DnsName(_) => NameKind::Dns,
            GeneralName::X400Address(_) => NameKind::X400,
            GeneralName::DirectoryName(_) => NameKind::Directory,
            GeneralName::EdiPartyName(_) => NameKind::EdiParty,
            GeneralName::Uri(_) => NameKind::Uri,
            GeneralName::IpAddress(_) => NameKind::Ip,
            GeneralName::RegisteredId(_) => NameKind::RegisteredId,
        }
    }

    /// Parse an IP address (4 bytes for IPv4, 16 bytes for IPv6).
    pub fn ip_address_string(&self) -> Option<String> {
        if let GeneralName::IpAddress(bytes) = self {
            match bytes.len() {
                4 => Some(format!(
                    "{}.{}.{}.{}",
                    bytes[0], bytes[1], bytes[2], bytes[3]
                )),
                16 => {
                    let parts: Vec<String> = bytes
                        .chunks(2)
                        .map(|c| format!("{:x}{:x}", c[0], c[1]))
                        .collect();
                    Some(parts.join(":"))
                }
                _ => None,
            }
        } else {
            None
        }
    }
}

impl<'a> DecodeValue<'a> for GeneralName {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        let tag = header.tag;

        if !tag.is_context_specific() {
            return Err(ErrorKind::TagUnexpected {
                expected: None,
                actual: tag,
            }
            .into());
        }

        match tag.number() {
            TagNumber::N0 => {
                let bytes = reader.read_vec(header.length)?;
                Ok(GeneralName::OtherName(bytes))
            }
            TagNumber::N1 => {
                let bytes = reader.read_vec(header.length)?;
                let s = std::str::from_utf8(&bytes)
                    .map_err(|_| ErrorKind::Value { tag })?
                    .to_string();
                Ok(GeneralName::Rfc822Name(s))
            }
            TagNumber::N2 => {
                let bytes = reader.read_vec(header.length)?;
                let s = std::str::from_utf8(&bytes)
                    .map_err(|_| ErrorKind::Value { tag })?
                    .to_string();
                Ok(GeneralName::DnsName(s))
            }
            TagNumber::N3 => {
                let bytes = reader.read_vec(header.length)?;
                Ok(GeneralName::X400Address(bytes))
            }
            TagNumber::N4 => {
                // DirectoryName is EXPLICIT [4] Name: the inner bytes start
                // with a SEQUENCE tag. `read_nested` scopes reading to
                // exactly `header.length` bytes.
                let name = reader.read_nested(header.length, Name::decode)?;
                Ok(GeneralName::DirectoryName(name))
            }
            TagNumber::N5 => {
                let bytes = reader.read_vec(header.length)?;
                Ok(GeneralName::EdiPartyName(bytes))
            }
            TagNumber::N6 => {
                let bytes = reader.read_vec(header.length)?;
                let s = std::str::from_utf8(&bytes)
                    .map_err(|_| ErrorKind::Value { tag })?
                    .to_string();
                Ok(GeneralName::Uri(s))
            }
            TagNumber::N7 => {
                let bytes = reader.read_vec(header.length)?;
                Ok(GeneralName::IpAddress(bytes))
            }
            TagNumber::N8 => {
                let oid = ObjectIdentifier::decode(reader)?;
                Ok(GeneralName::RegisteredId(oid))
            }
            _ => Err(ErrorKind::TagUnexpected {
                expected: None,
                actual: tag,
            }
            .into()),
        }
    }
}

impl EncodeValue for GeneralName {
    fn value_len(&self) -> der::Result<Length> {
        match self {
            GeneralName::OtherName(bytes) => bytes.len().try_into(),
            GeneralName::Rfc822Name(s) => s.len().try_into(),
            GeneralName::DnsName(s) => s.len().try_into(),
            GeneralName::X400Address(bytes) => bytes.len().try_into(),
            GeneralName::DirectoryName(name) => name.encoded_len(),
            GeneralName::EdiPartyName(bytes) => bytes.len().try_into(),
            GeneralName::Uri(s) => s.len().try_into(),
            GeneralName::IpAddress(bytes) => bytes.len().try_into(),
            GeneralName::RegisteredId(oid) => oid.encoded_len(),
        }
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        match self {
            GeneralName::OtherName(bytes) => writer.write(bytes),
            GeneralName::Rfc822Name(s) => writer.write(s.as_bytes()),
            GeneralName::DnsName(s) => writer.write(s.as_bytes()),
            GeneralName::X400Address(bytes) => writer.write(bytes),
            GeneralName::DirectoryName(name) => name.encode(writer),
            GeneralName::EdiPartyName(bytes) => writer.write(bytes),
            GeneralName::Uri(s) => writer.write(s.as_bytes()),
            GeneralName::IpAddress(bytes) => writer.write(bytes),
            GeneralName::RegisteredId(oid) => oid.encode(writer),
        }
    }
}

impl Tagged for GeneralName {
    fn tag(&self) -> Tag {
        Tag::ContextSpecific {
            constructed: matches!(
                self,
                GeneralName::OtherName(_)
                    | GeneralName::DirectoryName(_)
                    | GeneralName::EdiPartyName(_)
            ),
            number: self.tag_number(),
        }
    }
}

impl<'a> Decode<'a> for GeneralName {
    fn decode<R: Reader<'a>>(reader: &mut R) -> der::Result<Self> {
        let header = Header::decode(reader)?;
        Self::decode_value(reader, header)
    }
}

impl fmt::Display for GeneralName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneralName::OtherName(_) => write!(f, "otherName:<unsupported>"),
            GeneralName::Rfc822Name(email) => write!(f, "email:{}", email),
            GeneralName::DnsName(dns) => write!(f, "DNS:{}", dns),
            GeneralName::X400Address(_) => write!(f, "X400:<unsupported>"),
            GeneralName::DirectoryName(name) => write!(f, "DirName:{}", name),
            GeneralName::EdiPartyName(_) => write!(f, "EDI:<unsupported>"),
            GeneralName::Uri(uri) => write!(f, "URI:{}", uri),
            GeneralName::IpAddress(_) => {
                if let Some(ip) = self.ip_address_string() {
                    write!(f, "IP:{}", ip)
                } else {
                    write!(f, "IP:<invalid>")
                }
            }
            GeneralName::RegisteredId(oid) => write!(f, "RegID:{}", oid),
        }
    }
}

// ============================================================================
// GeneralNames - SEQUENCE OF GeneralName
// ============================================================================

/// GeneralNames is a SEQUENCE OF GeneralName, used by SubjectAltName,
/// IssuerAltName, CertificateIssuer and AuthorityKeyIdentifier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GeneralNames {
    /// List of names
    pub names: Vec<GeneralName>,
}

impl GeneralNames {
    /// Create a new GeneralNames.
    pub fn new(names: Vec<GeneralName>) -> Self {
        Self { names }
    }

    /// Get an iterator over the names.
    pub fn iter(&self) -> std::slice::Iter<'_, GeneralName> {
        self.names.iter()
    }

    /// True if there are no names.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Get all DNS names.
    pub fn dns_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().filter_map(|n| match n {
            GeneralName::DnsName(dns) => Some(dns.as_str()),
            _ => None,
        })
    }

    /// Get all email addresses.
    pub fn email_addresses(&self) -> impl Iterator<Item = &str> {
        self.names.iter().filter_map(|n| match n {
            GeneralName::Rfc822Name(email) => Some(email.as_str()),
            _ => None,
        })
    }

    /// Get all IP addresses.
    pub fn ip_addresses(&self) -> impl Iterator<Item = &[u8]> {
        self.names.iter().filter_map(|n| match n {
            GeneralName::IpAddress(ip) => Some(ip.as_slice()),
            _ => None,
        })
    }

    /// Get all URIs.
    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.names.iter().filter_map(|n| match n {
            GeneralName::Uri(uri) => Some(uri.as_str()),
            _ => None,
        })
    }

    /// Get the first directoryName, if any.
    pub fn directory_name(&self) -> Option<&Name> {
        self.names.iter().find_map(|n| match n {
            GeneralName::DirectoryName(name) => Some(name),
            _ => None,
        })
    }
}

impl<'a> DecodeValue<'a> for GeneralNames {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        let mut names = Vec::new();
        reader.read_nested(header.length, |reader| {
            while !reader.is_finished() {
                names.push(GeneralName::decode(reader)?);
            }
            Ok(())
        })?;
        Ok(Self { names })
    }
}

impl EncodeValue for GeneralNames {
    fn value_len(&self) -> der::Result<Length> {
        let mut len = Length::ZERO;
        for name in &self.names {
            len = (len + name.encoded_len()?)?;
        }
        Ok(len)
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        for name in &self.names {
            name.encode(writer)?;
        }
        Ok(())
    }
}

impl der::FixedTag for GeneralNames {
    const TAG: Tag = Tag::Sequence;
}

impl fmt::Display for GeneralNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.names.iter().map(|n| n.to_string()).collect();
        write!(f, "{}", names.join(", "))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_name_dns() {
        let gn = GeneralName::DnsName("example.com".to_string());
        assert_eq!(gn.to_string(), "DNS:example.com");
        assert_eq!(gn.kind(), NameKind::Dns);
    }

    #[test]
    fn test_general_name_email() {
        let gn = GeneralName::Rfc822Name("user@example.com".to_string());
        assert_eq!(gn.to_string(), "email:user@example.com");
        assert_eq!(gn.kind(), NameKind::Rfc822);
    }

    #[test]
    fn test_general_name_ip() {
        let gn = GeneralName::IpAddress(vec![192, 168, 1, 1]);
        assert_eq!(gn.ip_address_string().unwrap(), "192.168.1.1");
        assert_eq!(gn.to_string(), "IP:192.168.1.1");
    }

    #[test]
    fn test_general_names_accessors() {
        let names = GeneralNames::new(vec![
            GeneralName::DnsName("example.com".to_string()),
            GeneralName::DnsName("www.example.com".to_string()),
            GeneralName::Rfc822Name("admin@example.com".to_string()),
            GeneralName::IpAddress(vec![192, 168, 1, 1]),
        ]);

        let dns_names: Vec<&str> = names.dns_names().collect();
        assert_eq!(dns_names.len(), 2);
        assert!(dns_names.contains(&"example.com"));

        let emails: Vec<&str> = names.email_addresses().collect();
        assert_eq!(emails, vec!["admin@example.com"]);
    }

    #[test]
    fn test_roundtrip() {
        let names = GeneralNames::new(vec![
            GeneralName::DnsName("example.com".to_string()),
            GeneralName::Uri("https://example.com/a".to_string()),
            GeneralName::IpAddress(vec![10, 0, 0, 1]),
            GeneralName::RegisteredId(const_oid::ObjectIdentifier::new_unwrap("1.2.3.4")),
        ]);

        let der = names.to_der().unwrap();
        let decoded = GeneralNames::from_der(&der).unwrap();
        assert_eq!(names, decoded);
        assert_eq!(decoded.to_der().unwrap(), der);
    }

    #[test]
    fn test_directory_name_roundtrip() {
        let dn = crate::name::Name::from_rfc2253("CN=Issuer,O=Acme").unwrap();
        let names = GeneralNames::new(vec![GeneralName::DirectoryName(dn.clone())]);

        let der = names.to_der().unwrap();
        let decoded = GeneralNames::from_der(&der).unwrap();
        assert_eq!(decoded.directory_name().unwrap(), &dn);
    }
}
