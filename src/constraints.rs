// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! NameConstraints extension and the subtree comparison engine.
//!
//! ```asn1
//! NameConstraints ::= SEQUENCE {
//!     permittedSubtrees [0] GeneralSubtrees OPTIONAL,
//!     excludedSubtrees  [1] GeneralSubtrees OPTIONAL
//! }
//!
//! GeneralSubtrees ::= SEQUENCE SIZE (1..MAX) OF GeneralSubtree
//!
//! GeneralSubtree ::= SEQUENCE {
//!     base    GeneralName,
//!     minimum [0] BaseDistance DEFAULT 0,
//!     maximum [1] BaseDistance OPTIONAL
//! }
//! ```
//!
//! Subtree comparison follows RFC 5280 Section 4.2.1.10 semantics per name
//! form: DNS names match on label boundaries, rfc822 constraints may name a
//! mailbox, a host or a `.domain`, URIs are constrained by their host,
//! IP constraints carry address+mask, and directoryName constraints are
//! RDN-prefix matches over canonical forms.

use std::fmt;

use der::{
    Decode, DecodeValue, Encode, EncodeValue, Header, Length, Reader, Sequence, Tag, TagMode,
    TagNumber, Writer,
};

use crate::name::general::GeneralName;
use crate::name::Name;

// ============================================================================
// GeneralSubtree
// ============================================================================

/// One constraint subtree: a base name plus the (deprecated) distance bounds.
///
/// RFC 5280 requires minimum to be 0 and maximum to be absent; both are
/// preserved for round-trip fidelity but ignored by [`NameConstraints::verify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralSubtree {
    /// Base name of the subtree
    pub base: GeneralName,
    /// Minimum base distance (always 0 in practice)
    pub minimum: u8,
    /// Maximum base distance (absent in practice)
    pub maximum: Option<u8>,
}

impl GeneralSubtree {
    /// Create a subtree rooted at the given base name.
    pub fn new(base: GeneralName) -> Self {
        Self {
            base,
            minimum: 0,
            maximum: None,
        }
    }
}

impl<'a> DecodeValue<'a> for GeneralSubtree {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        reader.read_nested(header.length, |reader| {
            let base = GeneralName::decode(reader)?;
            let minimum = reader
                .context_specific::<u8>(TagNumber::N0, TagMode::Implicit)?
                .unwrap_or(0);
            let maximum = reader.context_specific::<u8>(TagNumber::N1, TagMode::Implicit)?;
            Ok(Self {
                base,
                minimum,
                maximum,
            })
        })
    }
}

impl EncodeValue for GeneralSubtree {
    fn value_len(&self) -> der::Result<Length> {
        let mut len = self.base.encoded_len()?;
        if self.minimum != 0 {
            len = (len
                + der::asn1::ContextSpecific {
                    tag_number: TagNumber::N0,
                    tag_mode: TagMode::Implicit,
                    value: self.minimum,
                }
                .encoded_len()?)?;
        }
        if let Some(maximum) = self.maximum {
            len = (len
                + der::asn1::ContextSpecific {
                    tag_number: TagNumber::N1,
                    tag_mode: TagMode::Implicit,
                    value: maximum,
                }
                .encoded_len()?)?;
        }
        Ok(len)
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        self.base.encode(writer)?;
        if self.minimum != 0 {
            der::asn1::ContextSpecific {
                tag_number: TagNumber::N0,
                tag_mode: TagMode::Implicit,
                value: self.minimum,
            }
            .encode(writer)?;
        }
        if let Some(maximum) = self.maximum {
            der::asn1::ContextSpecific {
                tag_number: TagNumber::N1,
                tag_mode: TagMode::Implicit,
                value: maximum,
            }
            .encode(writer)?;
        }
        Ok(())
    }
}

impl der::FixedTag for GeneralSubtree {
    const TAG: Tag = Tag::Sequence;
}

impl fmt::Display for GeneralSubtree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)
    }
}

/// GeneralSubtrees: SEQUENCE OF GeneralSubtree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GeneralSubtrees {
    /// The subtrees
    pub subtrees: Vec<GeneralSubtree>,
}

impl GeneralSubtrees {
    /// Wrap a list of subtrees.
    pub fn new(subtrees: Vec<GeneralSubtree>) -> Self {
        Self { subtrees }
    }

    /// Iterate over the subtrees.
    pub fn iter(&self) -> std::slice::Iter<'_, GeneralSubtree> {
        self.subtrees.iter()
    }

    /// True if there are no subtrees.
    pub fn is_empty(&self) -> bool {
        self.subtrees.is_empty()
    }

    /// Number of subtrees.
    pub fn len(&self) -> usize {
        self.subtrees.len()
    }
}

impl<'a> DecodeValue<'a> for GeneralSubtrees {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        let mut subtrees = Vec::new();
        reader.read_nested(header.length, |seq_reader| {
            while !seq_reader.is_finished() {
                subtrees.push(GeneralSubtree::decode(seq_reader)?);
            }
            Ok(())
        })?;
        Ok(Self { subtrees })
    }
}

impl EncodeValue for GeneralSubtrees {
    fn value_len(&self) -> der::Result<Length> {
        let mut len = Length::ZERO;
        for subtree in &self.subtrees {
            len = (len + subtree.encoded_len()?)?;
        }
        Ok(len)
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        for subtree in &self.subtrees {
            subtree.encode(writer)?;
        }
        Ok(())
    }
}

impl der::FixedTag for GeneralSubtrees {
    const TAG: Tag = Tag::Sequence;
}

// ============================================================================
// NameConstraints
// ============================================================================

/// NameConstraints extension.
#[derive(Debug, Clone, PartialEq, Eq, Default, Sequence)]
pub struct NameConstraints {
    /// Subtrees within which subject names must fall
    #[asn1(
        context_specific = "0",
        optional = "true",
        tag_mode = "IMPLICIT",
        constructed = "true"
    )]
    pub permitted: Option<GeneralSubtrees>,

    /// Subtrees within which subject names must not fall
    #[asn1(
        context_specific = "1",
        optional = "true",
        tag_mode = "IMPLICIT",
        constructed = "true"
    )]
    pub excluded: Option<GeneralSubtrees>,
}

impl NameConstraints {
    /// Create constraints from permitted and excluded subtree lists.
    pub fn new(permitted: Vec<GeneralSubtree>, excluded: Vec<GeneralSubtree>) -> Self {
        Self {
            permitted: if permitted.is_empty() {
                None
            } else {
                Some(GeneralSubtrees::new(permitted))
            },
            excluded: if excluded.is_empty() {
                None
            } else {
                Some(GeneralSubtrees::new(excluded))
            },
        }
    }

    /// Check a candidate name against these constraints.
    ///
    /// Excluded subtrees are scanned first: a candidate falling within any of
    /// them is rejected regardless of the permitted list. The permitted scan
    /// then requires the candidate to fall within some subtree of its own
    /// name form; if no permitted subtree has that form, the candidate is
    /// accepted vacuously (the permitted list says nothing about that form).
    pub fn verify(&self, candidate: &GeneralName) -> bool {
        if let Some(excluded) = &self.excluded {
            for subtree in excluded.iter() {
                if constrains(&subtree.base, candidate).is_within() {
                    log::debug!("name {} excluded by {}", candidate, subtree.base);
                    return false;
                }
            }
        }

        let permitted = match &self.permitted {
            Some(p) if !p.is_empty() => p,
            _ => return true,
        };

        let mut same_form_present = false;
        for subtree in permitted.iter() {
            match constrains(&subtree.base, candidate) {
                ConstraintResult::Match | ConstraintResult::Narrows => return true,
                ConstraintResult::SameType | ConstraintResult::Widens => {
                    same_form_present = true;
                }
                ConstraintResult::DiffType => {}
            }
        }

        if same_form_present {
            log::debug!("name {} not within any permitted subtree", candidate);
            false
        } else {
            // Vacuous acceptance: no permitted subtree constrains this form.
            true
        }
    }
}

// ============================================================================
// Subtree comparison
// ============================================================================

/// Outcome of comparing a subtree base against another name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintResult {
    /// The names have different forms; neither constrains the other
    DiffType,
    /// The names denote the same subtree
    Match,
    /// The candidate falls strictly within the base subtree
    Narrows,
    /// The candidate strictly contains the base subtree
    Widens,
    /// Same form, but disjoint subtrees
    SameType,
}

impl ConstraintResult {
    /// True when the candidate is inside the base subtree (equal or below).
    pub fn is_within(&self) -> bool {
        matches!(self, ConstraintResult::Match | ConstraintResult::Narrows)
    }
}

/// Compare a subtree base against a candidate name.
pub fn constrains(base: &GeneralName, candidate: &GeneralName) -> ConstraintResult {
    if base.kind() != candidate.kind() {
        return ConstraintResult::DiffType;
    }

    match (base, candidate) {
        (GeneralName::DnsName(b), GeneralName::DnsName(c)) => {
            lattice(dns_within(b, c), dns_within(c, b))
        }
        (GeneralName::Rfc822Name(b), GeneralName::Rfc822Name(c)) => {
            lattice(email_within(b, c), email_within(c, b))
        }
        (GeneralName::Uri(b), GeneralName::Uri(c)) => {
            let bh = uri_host(b);
            let ch = uri_host(c);
            lattice(host_within(&bh, &ch), host_within(&ch, &bh))
        }
        (GeneralName::IpAddress(b), GeneralName::IpAddress(c)) => {
            lattice(ip_within(b, c), ip_within(c, b))
        }
        (GeneralName::DirectoryName(b), GeneralName::DirectoryName(c)) => {
            lattice(dir_within(b, c), dir_within(c, b))
        }
        // Remaining forms have no subtree structure: equal or disjoint.
        (b, c) => {
            if b == c {
                ConstraintResult::Match
            } else {
                ConstraintResult::SameType
            }
        }
    }
}

/// Map the two containment directions onto the five-way result.
fn lattice(candidate_in_base: bool, base_in_candidate: bool) -> ConstraintResult {
    match (candidate_in_base, base_in_candidate) {
        (true, true) => ConstraintResult::Match,
        (true, false) => ConstraintResult::Narrows,
        (false, true) => ConstraintResult::Widens,
        (false, false) => ConstraintResult::SameType,
    }
}

/// DNS containment: equal, or a subdomain on a label boundary.
fn dns_within(outer: &str, inner: &str) -> bool {
    let outer = outer.to_ascii_lowercase();
    let inner = inner.to_ascii_lowercase();
    // An empty constraint matches every DNS name.
    if outer.is_empty() {
        return true;
    }
    inner == outer || inner.ends_with(&format!(".{}", outer))
}

/// Containment for host-or-domain constraint strings: a leading dot means
/// "any host in this domain", otherwise DNS rules apply.
fn host_within(outer: &str, inner: &str) -> bool {
    let outer = outer.to_ascii_lowercase();
    let inner = inner.to_ascii_lowercase();
    if let Some(domain) = outer.strip_prefix('.') {
        return inner.ends_with(&outer) || inner.strip_prefix('.') == Some(domain);
    }
    if inner.starts_with('.') {
        return false;
    }
    inner == outer || inner.ends_with(&format!(".{}", outer))
}

/// rfc822 containment. Constraint strings come in three forms: a full
/// mailbox (`user@host`), a host (`example.com`, every mailbox on exactly
/// that host) or a domain (`.example.com`, every host in the domain).
fn email_within(outer: &str, inner: &str) -> bool {
    let outer = outer.to_ascii_lowercase();
    let inner = inner.to_ascii_lowercase();

    match (outer.split_once('@'), inner.split_once('@')) {
        // mailbox ⊆ mailbox: exact match only
        (Some(_), Some(_)) => inner == outer,
        // mailbox can never contain a host or domain
        (Some(_), None) => false,
        // host/domain constraint against a mailbox: judge by its host part
        (None, Some((_, inner_host))) => mail_host_within(&outer, inner_host),
        // host/domain against host/domain
        (None, None) => mail_host_within(&outer, &inner),
    }
}

/// Host-part containment for rfc822 constraints. Unlike DNS constraints, a
/// bare host covers that host only; subdomain coverage requires the
/// leading-dot domain form (RFC 5280 Section 4.2.1.10).
fn mail_host_within(outer: &str, inner: &str) -> bool {
    if outer.starts_with('.') {
        host_within(outer, inner)
    } else {
        inner == outer
    }
}

/// Extract the host component of a URI (or return the input unchanged when
/// it already looks like a bare host).
fn uri_host(uri: &str) -> String {
    let rest = match uri.find("://") {
        Some(idx) => &uri[idx + 3..],
        None => uri,
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    let host_port = match authority.rsplit_once('@') {
        Some((_, hp)) => hp,
        None => authority,
    };
    // Keep a leading-dot domain constraint intact; strip a port otherwise.
    match host_port.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host.to_string(),
        _ => host_port.to_string(),
    }
}

/// IP containment over address(+mask) byte strings.
///
/// A 4- or 16-byte value is a bare address (full mask); an 8- or 32-byte
/// value is address+mask as used in constraint subtrees.
fn ip_within(outer: &[u8], inner: &[u8]) -> bool {
    let (outer_addr, outer_mask) = match split_ip(outer) {
        Some(parts) => parts,
        None => return false,
    };
    let (inner_addr, inner_mask) = match split_ip(inner) {
        Some(parts) => parts,
        None => return false,
    };
    if outer_addr.len() != inner_addr.len() {
        return false;
    }

    // The inner prefix must be at least as specific: every bit fixed by the
    // outer mask must also be fixed by the inner mask, and the addresses must
    // agree under the outer mask.
    for i in 0..outer_addr.len() {
        let om = outer_mask.map(|m| m[i]).unwrap_or(0xFF);
        let im = inner_mask.map(|m| m[i]).unwrap_or(0xFF);
        if om & im != om {
            return false;
        }
        if (outer_addr[i] ^ inner_addr[i]) & om != 0 {
            return false;
        }
    }
    true
}

fn split_ip(bytes: &[u8]) -> Option<(&[u8], Option<&[u8]>)> {
    match bytes.len() {
        4 | 16 => Some((bytes, None)),
        8 => Some((&bytes[..4], Some(&bytes[4..]))),
        32 => Some((&bytes[..16], Some(&bytes[16..]))),
        _ => None,
    }
}

/// directoryName containment: the outer name's RDNs must be a prefix of the
/// inner name's RDNs, compared by canonical form.
fn dir_within(outer: &Name, inner: &Name) -> bool {
    let outer_rdns = outer.canonical_rdn_strings();
    let inner_rdns = inner.canonical_rdn_strings();
    if outer_rdns.len() > inner_rdns.len() {
        return false;
    }
    outer_rdns
        .iter()
        .zip(inner_rdns.iter())
        .all(|(a, b)| a == b)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use der::{Decode, Encode};

    fn dns(s: &str) -> GeneralName {
        GeneralName::DnsName(s.to_string())
    }

    fn subtree(name: GeneralName) -> GeneralSubtree {
        GeneralSubtree::new(name)
    }

    #[test]
    fn test_dns_lattice() {
        assert_eq!(
            constrains(&dns("example.com"), &dns("example.com")),
            ConstraintResult::Match
        );
        assert_eq!(
            constrains(&dns("example.com"), &dns("www.example.com")),
            ConstraintResult::Narrows
        );
        assert_eq!(
            constrains(&dns("www.example.com"), &dns("example.com")),
            ConstraintResult::Widens
        );
        assert_eq!(
            constrains(&dns("example.com"), &dns("example.org")),
            ConstraintResult::SameType
        );
        assert_eq!(
            constrains(&dns("example.com"), &GeneralName::Uri("x".into())),
            ConstraintResult::DiffType
        );
    }

    #[test]
    fn test_dns_label_boundary() {
        // "badexample.com" is not a subdomain of "example.com".
        assert_eq!(
            constrains(&dns("example.com"), &dns("badexample.com")),
            ConstraintResult::SameType
        );
        // Case-insensitive.
        assert_eq!(
            constrains(&dns("Example.COM"), &dns("www.example.com")),
            ConstraintResult::Narrows
        );
    }

    #[test]
    fn test_email_forms() {
        let mailbox = |s: &str| GeneralName::Rfc822Name(s.to_string());

        // host constraint admits every mailbox on the host
        assert_eq!(
            constrains(&mailbox("example.com"), &mailbox("user@example.com")),
            ConstraintResult::Narrows
        );
        // but not on a subdomain; that needs the leading-dot domain form
        assert_eq!(
            constrains(&mailbox("example.com"), &mailbox("user@mail.example.com")),
            ConstraintResult::SameType,
        );
        // domain constraint admits hosts within the domain
        assert_eq!(
            constrains(&mailbox(".example.com"), &mailbox("user@mail.example.com")),
            ConstraintResult::Narrows
        );
        // exact mailbox constraint
        assert_eq!(
            constrains(&mailbox("a@example.com"), &mailbox("a@example.com")),
            ConstraintResult::Match
        );
        assert_eq!(
            constrains(&mailbox("a@example.com"), &mailbox("b@example.com")),
            ConstraintResult::SameType
        );
    }

    #[test]
    fn test_uri_host_rules() {
        let uri = |s: &str| GeneralName::Uri(s.to_string());

        assert_eq!(
            constrains(&uri("example.com"), &uri("https://example.com/path")),
            ConstraintResult::Match
        );
        assert_eq!(
            constrains(&uri("example.com"), &uri("https://user@www.example.com:8443/p")),
            ConstraintResult::Narrows
        );
        assert_eq!(
            constrains(&uri(".example.com"), &uri("http://www.example.com/")),
            ConstraintResult::Narrows
        );
        assert_eq!(
            constrains(&uri("example.com"), &uri("https://example.org/")),
            ConstraintResult::SameType
        );
    }

    #[test]
    fn test_ip_prefix() {
        // 192.168.0.0/16 constraint
        let base = GeneralName::IpAddress(vec![192, 168, 0, 0, 255, 255, 0, 0]);
        let inside = GeneralName::IpAddress(vec![192, 168, 5, 7]);
        let outside = GeneralName::IpAddress(vec![10, 0, 0, 1]);
        let narrower = GeneralName::IpAddress(vec![192, 168, 5, 0, 255, 255, 255, 0]);

        assert_eq!(constrains(&base, &inside), ConstraintResult::Narrows);
        assert_eq!(constrains(&base, &outside), ConstraintResult::SameType);
        assert_eq!(constrains(&base, &narrower), ConstraintResult::Narrows);
        assert_eq!(constrains(&narrower, &base), ConstraintResult::Widens);
        assert_eq!(constrains(&base, &base), ConstraintResult::Match);
    }

    #[test]
    fn test_directory_prefix() {
        let base =
            GeneralName::DirectoryName(Name::from_rfc2253("O=Acme,C=US").unwrap());
        let inside =
            GeneralName::DirectoryName(Name::from_rfc2253("CN=Alice,O=Acme,C=US").unwrap());
        let other =
            GeneralName::DirectoryName(Name::from_rfc2253("CN=Bob,O=Evil,C=US").unwrap());

        assert_eq!(constrains(&base, &inside), ConstraintResult::Narrows);
        assert_eq!(constrains(&base, &other), ConstraintResult::SameType);
        assert_eq!(constrains(&inside, &base), ConstraintResult::Widens);

        // Canonical comparison: case differences do not matter.
        let base_lc =
            GeneralName::DirectoryName(Name::from_rfc2253("o=acme,c=us").unwrap());
        assert_eq!(constrains(&base_lc, &inside), ConstraintResult::Narrows);
    }

    #[test]
    fn test_registered_id() {
        let a = GeneralName::RegisteredId(const_oid::ObjectIdentifier::new_unwrap("1.2.3"));
        let b = GeneralName::RegisteredId(const_oid::ObjectIdentifier::new_unwrap("1.2.4"));
        assert_eq!(constrains(&a, &a), ConstraintResult::Match);
        assert_eq!(constrains(&a, &b), ConstraintResult::SameType);
    }

    #[test]
    fn test_verify_excluded_first() {
        // Permitted example.com but excluded www.example.com: exclusion wins.
        let nc = NameConstraints::new(
            vec![subtree(dns("example.com"))],
            vec![subtree(dns("www.example.com"))],
        );
        assert!(nc.verify(&dns("mail.example.com")));
        assert!(!nc.verify(&dns("www.example.com")));
        assert!(!nc.verify(&dns("deep.www.example.com")));
    }

    #[test]
    fn test_verify_permitted() {
        let nc = NameConstraints::new(vec![subtree(dns("example.com"))], vec![]);
        assert!(nc.verify(&dns("example.com")));
        assert!(nc.verify(&dns("a.example.com")));
        assert!(!nc.verify(&dns("example.org")));
    }

    #[test]
    fn test_verify_email_host_form_is_exact() {
        // A host-form rfc822 subtree covers mailboxes on that host only;
        // subdomain mailboxes need the leading-dot domain form.
        let mailbox = |s: &str| GeneralName::Rfc822Name(s.to_string());
        let nc = NameConstraints::new(vec![subtree(mailbox("example.com"))], vec![]);
        assert!(nc.verify(&mailbox("user@example.com")));
        assert!(!nc.verify(&mailbox("user@mail.example.com")));

        let nc = NameConstraints::new(vec![subtree(mailbox(".example.com"))], vec![]);
        assert!(nc.verify(&mailbox("user@mail.example.com")));
    }

    #[test]
    fn test_vacuous_acceptance() {
        // Permitted list names only DNS subtrees: an email candidate is
        // accepted vacuously, a DNS candidate outside is rejected.
        let nc = NameConstraints::new(vec![subtree(dns("example.com"))], vec![]);
        assert!(nc.verify(&GeneralName::Rfc822Name("user@anywhere.org".to_string())));
        assert!(!nc.verify(&dns("example.org")));
    }

    #[test]
    fn test_vacuous_boundary_mixed_types() {
        // Candidate's form is present among permitted subtrees but matches
        // none of them: not vacuous, rejected.
        let nc = NameConstraints::new(
            vec![
                subtree(dns("example.com")),
                subtree(GeneralName::Rfc822Name("example.com".to_string())),
            ],
            vec![],
        );
        assert!(!nc.verify(&GeneralName::Rfc822Name("user@other.org".to_string())));
        assert!(nc.verify(&GeneralName::Rfc822Name("user@example.com".to_string())));
        // A URI candidate is still vacuously accepted.
        assert!(nc.verify(&GeneralName::Uri("https://anything.net/".to_string())));
    }

    #[test]
    fn test_empty_constraints_accept_everything() {
        let nc = NameConstraints::default();
        assert!(nc.verify(&dns("anything.at.all")));
    }

    #[test]
    fn test_der_roundtrip() {
        let nc = NameConstraints::new(
            vec![
                subtree(dns("example.com")),
                subtree(GeneralName::IpAddress(vec![10, 0, 0, 0, 255, 0, 0, 0])),
            ],
            vec![subtree(dns("internal.example.com"))],
        );
        let der = nc.to_der().unwrap();
        let decoded = NameConstraints::from_der(&der).unwrap();
        assert_eq!(decoded, nc);
        assert_eq!(decoded.to_der().unwrap(), der);

        // Context tags: permitted [0], excluded [1], both constructed.
        assert_eq!(der[2], 0xA0);
    }

    #[test]
    fn test_clone_is_independent() {
        let nc = NameConstraints::new(vec![subtree(dns("example.com"))], vec![]);
        let mut copy = nc.clone();
        copy.permitted = None;
        assert!(nc.permitted.is_some());
    }
}
