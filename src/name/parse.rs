// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! String forms of distinguished names.
//!
//! Two dialects are supported:
//! - strict RFC 2253: `,` separators, `+` multi-value, backslash escapes
//!   (single character or two hex digits), `#`-prefixed hex values, attribute
//!   types as keywords or dotted-decimal OIDs (optionally `OID.`-prefixed);
//! - legacy: `,` or `;` separators with loose whitespace around tokens, as
//!   produced by older tooling.
//!
//! Both dialects are written most-specific-first; the parsed [`Name`] stores
//! RDNs in DER order (root first).

use const_oid::ObjectIdentifier;

use crate::error::{Error, Result};
use crate::name::{
    keyword_for, oid_for_keyword, AttributeTypeAndValue, Name, RelativeDistinguishedName,
    COUNTRY_NAME, DOMAIN_COMPONENT, EMAIL_ADDRESS,
};

/// Characters that must be escaped in RFC 2253 attribute values.
const SPECIAL: &[char] = &[',', '+', '"', '\\', '<', '>', ';'];

/// Parse a strict RFC 2253 distinguished-name string.
pub fn parse_rfc2253(input: &str) -> Result<Name> {
    parse_name(input, false)
}

/// Parse a legacy distinguished-name string (permissive).
pub fn parse_legacy(input: &str) -> Result<Name> {
    parse_name(input, true)
}

fn parse_name(input: &str, legacy: bool) -> Result<Name> {
    let input = trim_unescaped_end(input.trim_start());
    if input.is_empty() {
        return Ok(Name::new());
    }

    let mut rdns = Vec::new();
    for (offset, rdn_str) in split_unescaped(input, legacy) {
        let rdn = parse_rdn(rdn_str, offset, legacy)?;
        rdns.push(rdn);
    }

    // String form is most-specific-first; DER order is root-first.
    rdns.reverse();
    Ok(Name::from_rdns(rdns))
}

/// Trim trailing whitespace, but keep whitespace escaped with a backslash
/// (`CN=\ padded\ ` ends in significant content, not padding).
fn trim_unescaped_end(input: &str) -> &str {
    let mut end = input.len();
    for (i, ch) in input.char_indices().rev() {
        if !ch.is_whitespace() {
            break;
        }
        let backslashes = input[..i].chars().rev().take_while(|c| *c == '\\').count();
        if backslashes % 2 == 1 {
            break;
        }
        end = i;
    }
    &input[..end]
}

/// Split on unescaped separators, yielding (byte offset, substring) pairs.
///
/// Strict mode splits on `,` only; legacy mode also splits on `;`.
fn split_unescaped(input: &str, legacy: bool) -> Vec<(usize, &str)> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, ch) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            ',' => {
                parts.push((start, &input[start..i]));
                start = i + 1;
            }
            ';' if legacy => {
                parts.push((start, &input[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push((start, &input[start..]));
    parts
}

fn parse_rdn(rdn_str: &str, offset: usize, legacy: bool) -> Result<RelativeDistinguishedName> {
    let mut attrs = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    let mut pieces = Vec::new();
    for (i, ch) in rdn_str.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '+' => {
                pieces.push((start, &rdn_str[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push((start, &rdn_str[start..]));

    for (piece_off, piece) in pieces {
        attrs.push(parse_ava(piece, offset + piece_off, legacy)?);
    }
    RelativeDistinguishedName::from_attributes(attrs)
        .map_err(|e| Error::name_parse(offset, e.to_string()))
}

fn parse_ava(ava_str: &str, offset: usize, legacy: bool) -> Result<AttributeTypeAndValue> {
    let eq = ava_str
        .find('=')
        .ok_or_else(|| Error::name_parse(offset, "missing '='"))?;
    let (type_str, value_str) = (&ava_str[..eq], &ava_str[eq + 1..]);

    let type_str = type_str.trim();
    let value_str = if legacy {
        value_str.trim()
    } else {
        // RFC 2253: spaces around '=' are not significant on the type side
        // only; a leading space in the value must be escaped.
        value_str
    };

    let oid = parse_attr_type(type_str, offset)?;

    if let Some(hex) = value_str.strip_prefix('#') {
        let raw = decode_hex(hex).ok_or_else(|| Error::name_parse(offset, "invalid hex value"))?;
        return AttributeTypeAndValue::from_raw_der(oid, raw)
            .map_err(|e| Error::name_parse(offset, e.to_string()));
    }

    let value = unescape_value(value_str, offset)?;
    build_string_attr(oid, &value).map_err(|e| Error::name_parse(offset, e.to_string()))
}

/// Resolve an attribute-type token: keyword, `OID.`-prefixed or bare
/// dotted-decimal.
fn parse_attr_type(type_str: &str, offset: usize) -> Result<ObjectIdentifier> {
    if type_str.is_empty() {
        return Err(Error::name_parse(offset, "empty attribute type"));
    }
    if let Some(oid) = oid_for_keyword(type_str) {
        return Ok(oid);
    }
    let dotted = type_str
        .strip_prefix("OID.")
        .or_else(|| type_str.strip_prefix("oid."))
        .unwrap_or(type_str);
    if dotted.chars().all(|c| c.is_ascii_digit() || c == '.') {
        ObjectIdentifier::new(dotted)
            .map_err(|_| Error::name_parse(offset, format!("invalid OID '{}'", dotted)))
    } else {
        Err(Error::Name(crate::error::NameError::UnknownKeyword(
            type_str.to_string(),
        )))
    }
}

/// Choose the customary string encoding for an attribute type.
fn build_string_attr(oid: ObjectIdentifier, value: &str) -> der::Result<AttributeTypeAndValue> {
    if oid == COUNTRY_NAME {
        // Country codes are PrintableString by convention; fall back to
        // UTF8String for values PrintableString cannot hold.
        if let Ok(attr) = AttributeTypeAndValue::new_printable(oid, value) {
            return Ok(attr);
        }
    }
    if oid == EMAIL_ADDRESS || oid == DOMAIN_COMPONENT {
        if let Ok(ia5) = der::asn1::Ia5String::new(value) {
            return AttributeTypeAndValue::new(oid, crate::name::DirectoryString::Ia5String(ia5));
        }
    }
    AttributeTypeAndValue::new_utf8(oid, value)
}

/// Undo RFC 2253 escaping: `\X` for specials, `\xx` hex pairs.
fn unescape_value(value: &str, offset: usize) -> Result<String> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    let mut pos = offset;
    while let Some(ch) = chars.next() {
        pos += ch.len_utf8();
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let esc = chars
            .next()
            .ok_or_else(|| Error::name_parse(pos, "unterminated escape"))?;
        pos += esc.len_utf8();
        if esc.is_ascii_hexdigit() {
            let second = chars
                .next()
                .filter(|c| c.is_ascii_hexdigit())
                .ok_or_else(|| Error::name_parse(pos, "invalid hex escape"))?;
            pos += 1;
            let byte = (hex_digit(esc) << 4) | hex_digit(second);
            out.push(byte as char);
        } else {
            out.push(esc);
        }
    }
    Ok(out)
}

fn hex_digit(c: char) -> u8 {
    match c {
        '0'..='9' => c as u8 - b'0',
        'a'..='f' => c as u8 - b'a' + 10,
        'A'..='F' => c as u8 - b'A' + 10,
        _ => 0,
    }
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.is_empty() || hex.len() % 2 != 0 {
        return None;
    }
    let mut out = Vec::with_capacity(hex.len() / 2);
    let bytes = hex.as_bytes();
    for pair in bytes.chunks(2) {
        let hi = (pair[0] as char).to_digit(16)?;
        let lo = (pair[1] as char).to_digit(16)?;
        out.push(((hi << 4) | lo) as u8);
    }
    Some(out)
}

// ============================================================================
// RFC 2253 output
// ============================================================================

/// Render one RDN in strict RFC 2253 form.
pub(crate) fn rdn_to_rfc2253(rdn: &RelativeDistinguishedName) -> String {
    let parts: Vec<String> = rdn.attributes.iter().map(ava_to_rfc2253).collect();
    parts.join("+")
}

fn ava_to_rfc2253(attr: &AttributeTypeAndValue) -> String {
    let key = match keyword_for(attr.oid) {
        Some(kw) => kw.to_string(),
        None => attr.oid.to_string(),
    };
    match attr.value_as_str() {
        Ok(value) => format!("{}={}", key, escape_value(&value)),
        Err(_) => {
            // Non-string value: hex-dump the raw DER TLV with a '#' prefix.
            let mut hex = String::with_capacity(1 + attr.raw_value().len() * 2);
            hex.push('#');
            for b in attr.raw_value() {
                hex.push_str(&format!("{:02X}", b));
            }
            format!("{}={}", key, hex)
        }
    }
}

/// Apply RFC 2253 escaping to an attribute value.
pub fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let len = value.chars().count();
    for (i, ch) in value.chars().enumerate() {
        let needs_escape = SPECIAL.contains(&ch)
            || (i == 0 && (ch == '#' || ch == ' '))
            || (i == len - 1 && ch == ' ');
        if needs_escape {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::{CN, ORGANIZATIONAL_UNIT_NAME, ORGANIZATION_NAME};

    #[test]
    fn test_parse_simple() {
        let name = parse_rfc2253("CN=John Doe,O=Example Inc,C=US").unwrap();
        assert_eq!(name.common_name().unwrap(), "John Doe");
        assert_eq!(name.organization().unwrap(), "Example Inc");
        assert_eq!(name.country().unwrap(), "US");

        // Internal order is root-first.
        assert_eq!(name.rdns()[0].first().unwrap().oid, crate::name::COUNTRY_NAME);
        assert_eq!(name.rdns()[2].first().unwrap().oid, CN);
    }

    #[test]
    fn test_parse_escapes() {
        let name = parse_rfc2253(r"CN=Doe\, John,O=Acme \+ Co").unwrap();
        assert_eq!(name.common_name().unwrap(), "Doe, John");
        assert_eq!(name.organization().unwrap(), "Acme + Co");
    }

    #[test]
    fn test_parse_hex_escape() {
        let name = parse_rfc2253(r"CN=a\2cb").unwrap();
        assert_eq!(name.common_name().unwrap(), "a,b");
    }

    #[test]
    fn test_parse_multi_valued() {
        let name = parse_rfc2253("CN=x+OU=y,C=US").unwrap();
        assert_eq!(name.len(), 2);
        let leaf = &name.rdns()[1];
        assert!(leaf.is_multi_valued());
        assert!(leaf
            .attributes
            .iter()
            .any(|a| a.oid == ORGANIZATIONAL_UNIT_NAME));
    }

    #[test]
    fn test_parse_oid_type() {
        let name = parse_rfc2253("OID.2.5.4.3=x").unwrap();
        assert_eq!(name.common_name().unwrap(), "x");

        let name = parse_rfc2253("2.5.4.10=y").unwrap();
        assert_eq!(name.organization().unwrap(), "y");
    }

    #[test]
    fn test_parse_hash_value() {
        // '#' introduces the raw DER TLV in hex: UTF8String "hi".
        let name = parse_rfc2253("CN=#0C026869").unwrap();
        assert_eq!(name.common_name().unwrap(), "hi");
    }

    #[test]
    fn test_parse_unknown_keyword() {
        let err = parse_rfc2253("WAT=x").unwrap_err();
        assert!(matches!(
            err,
            Error::Name(crate::error::NameError::UnknownKeyword(_))
        ));
    }

    #[test]
    fn test_parse_missing_equals() {
        assert!(parse_rfc2253("CN").is_err());
    }

    #[test]
    fn test_parse_legacy_forms() {
        let a = parse_legacy("CN = John ; O = Acme ; C = US").unwrap();
        let b = parse_rfc2253("CN=John,O=Acme,C=US").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_escape_roundtrip() {
        let original = r"CN=Doe\, John,O=Acme \+ Co,C=US";
        let name = parse_rfc2253(original).unwrap();
        let rendered = name.to_rfc2253();
        let reparsed = parse_rfc2253(&rendered).unwrap();
        assert_eq!(name, reparsed);
        assert!(rendered.contains(r"Doe\, John"));
    }

    #[test]
    fn test_escape_leading_trailing() {
        let name = parse_rfc2253(r"CN=\ padded\ ").unwrap();
        assert_eq!(name.common_name().unwrap(), " padded ");
        let rendered = name.to_rfc2253();
        assert_eq!(rendered, r"CN=\ padded\ ");
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        // Unescaped padding around the DN is ignored; an escaped trailing
        // space after it is still part of the value.
        let a = parse_rfc2253("  CN=x  ").unwrap();
        let b = parse_rfc2253("CN=x").unwrap();
        assert_eq!(a, b);

        let name = parse_rfc2253(r"CN=\ padded\   ").unwrap();
        assert_eq!(name.common_name().unwrap(), " padded ");
    }

    #[test]
    fn test_escape_leading_hash() {
        let name = parse_rfc2253(r"CN=\#tag").unwrap();
        assert_eq!(name.common_name().unwrap(), "#tag");
        assert_eq!(name.to_rfc2253(), r"CN=\#tag");
    }

    #[test]
    fn test_to_rfc2253_order() {
        let mut name = Name::new();
        let c = AttributeTypeAndValue::new_printable(crate::name::COUNTRY_NAME, "US").unwrap();
        name.push(RelativeDistinguishedName::new(c).unwrap());
        let o = AttributeTypeAndValue::new_utf8(ORGANIZATION_NAME, "Acme").unwrap();
        name.push(RelativeDistinguishedName::new(o).unwrap());
        assert_eq!(name.to_rfc2253(), "O=Acme,C=US");
    }
}
