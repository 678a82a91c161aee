// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Time handling for certificates and CRLs.
//!
//! Supports both UTCTime and GeneralizedTime formats as defined in RFC 5280.
//!
//! # UTCTime Y2K Conversion
//!
//! UTCTime values are interpreted according to RFC 5280:
//! - Years 50-99 are interpreted as 1950-1999
//! - Years 00-49 are interpreted as 2000-2049
//!
//! When building timestamps (rather than parsing them), RFC 5280 mandates
//! UTCTime for dates through 2049 and GeneralizedTime from 2050 on;
//! [`Time::from_unix_secs`] applies that rule.

use core::cmp::Ordering;
use core::fmt;
use core::time::Duration;
use der::{
    asn1::{GeneralizedTime, UtcTime},
    Decode, DecodeValue, Encode, EncodeValue, Header, Length, Reader, Result, Tag, Writer,
};

/// A timestamp that can be either UTCTime or GeneralizedTime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Time {
    /// UTCTime format (YYMMDDHHMMSSZ)
    UtcTime(UtcTime),
    /// GeneralizedTime format (YYYYMMDDHHMMSSZ)
    GeneralizedTime(GeneralizedTime),
}

impl Time {
    /// Creates a new Time from a UtcTime.
    pub const fn new_utc(utc_time: UtcTime) -> Self {
        Time::UtcTime(utc_time)
    }

    /// Creates a new Time from a GeneralizedTime.
    pub const fn new_generalized(generalized_time: GeneralizedTime) -> Self {
        Time::GeneralizedTime(generalized_time)
    }

    /// Creates a Time from a Unix timestamp, selecting the wire format per
    /// RFC 5280: UTCTime for dates before 2050-01-01, GeneralizedTime after.
    pub fn from_unix_secs(secs: u64) -> Result<Self> {
        let dt = der::DateTime::from_unix_duration(Duration::from_secs(secs))?;
        if dt.year() < 2050 {
            Ok(Time::UtcTime(UtcTime::from_date_time(dt)?))
        } else {
            Ok(Time::GeneralizedTime(GeneralizedTime::from_date_time(dt)))
        }
    }

    /// Returns the DateTime representation.
    pub fn to_date_time(&self) -> der::DateTime {
        match self {
            Time::UtcTime(utc) => utc.to_date_time(),
            Time::GeneralizedTime(gen) => gen.to_date_time(),
        }
    }

    /// Returns the Unix timestamp in seconds.
    pub fn to_unix_secs(&self) -> u64 {
        self.to_date_time().unix_duration().as_secs()
    }

    /// Checks if this time is before another time.
    pub fn is_before(&self, other: &Time) -> bool {
        self.to_date_time().unix_duration() < other.to_date_time().unix_duration()
    }

    /// Checks if this time is after another time.
    pub fn is_after(&self, other: &Time) -> bool {
        self.to_date_time().unix_duration() > other.to_date_time().unix_duration()
    }

    /// Checks if this time is before or equal to another time.
    pub fn is_before_or_equal(&self, other: &Time) -> bool {
        self.to_date_time().unix_duration() <= other.to_date_time().unix_duration()
    }

    /// Checks if this time is after or equal to another time.
    pub fn is_after_or_equal(&self, other: &Time) -> bool {
        self.to_date_time().unix_duration() >= other.to_date_time().unix_duration()
    }
}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Time {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_date_time()
            .unix_duration()
            .cmp(&other.to_date_time().unix_duration())
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_date_time())
    }
}

impl<'a> DecodeValue<'a> for Time {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> Result<Self> {
        match header.tag {
            Tag::UtcTime => Ok(Time::UtcTime(UtcTime::decode_value(reader, header)?)),
            Tag::GeneralizedTime => Ok(Time::GeneralizedTime(GeneralizedTime::decode_value(
                reader, header,
            )?)),
            tag => Err(der::Error::from(der::ErrorKind::TagUnexpected {
                expected: Some(Tag::UtcTime),
                actual: tag,
            })),
        }
    }
}

impl EncodeValue for Time {
    fn value_len(&self) -> Result<Length> {
        match self {
            Time::UtcTime(utc) => utc.value_len(),
            Time::GeneralizedTime(gen) => gen.value_len(),
        }
    }

    fn encode_value(&self, writer: &mut impl Writer) -> Result<()> {
        match self {
            Time::UtcTime(utc) => utc.encode_value(writer),
            Time::GeneralizedTime(gen) => gen.encode_value(writer),
        }
    }
}

impl Encode for Time {
    fn encoded_len(&self) -> Result<Length> {
        match self {
            Time::UtcTime(utc) => utc.encoded_len(),
            Time::GeneralizedTime(gen) => gen.encoded_len(),
        }
    }

    fn encode(&self, writer: &mut impl Writer) -> Result<()> {
        match self {
            Time::UtcTime(utc) => utc.encode(writer),
            Time::GeneralizedTime(gen) => gen.encode(writer),
        }
    }
}

impl<'a> Decode<'a> for Time {
    fn decode<R: Reader<'a>>(reader: &mut R) -> Result<Self> {
        let header = Header::decode(reader)?;
        Self::decode_value(reader, header)
    }
}

/// Certificate validity period.
///
/// As defined in RFC 5280 Section 4.1.2.5:
/// ```text
/// Validity ::= SEQUENCE {
///     notBefore      Time,
///     notAfter       Time
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validity {
    /// The time before which the certificate is not valid.
    pub not_before: Time,
    /// The time after which the certificate is not valid.
    pub not_after: Time,
}

impl Validity {
    /// Creates a new Validity period.
    pub const fn new(not_before: Time, not_after: Time) -> Self {
        Validity {
            not_before,
            not_after,
        }
    }

    /// Creates a Validity period from Unix timestamps, applying the RFC 5280
    /// UTCTime/GeneralizedTime format rule to each endpoint.
    pub fn from_unix_secs(not_before: u64, not_after: u64) -> Result<Self> {
        Ok(Validity {
            not_before: Time::from_unix_secs(not_before)?,
            not_after: Time::from_unix_secs(not_after)?,
        })
    }

    /// Checks if the certificate is valid at the given time.
    pub fn is_valid_at(&self, check_time: &Time) -> bool {
        self.not_before.is_before_or_equal(check_time)
            && self.not_after.is_after_or_equal(check_time)
    }

    /// Checks if the validity period is well-formed.
    pub fn is_well_formed(&self) -> bool {
        self.not_before.is_before_or_equal(&self.not_after)
    }
}

impl<'a> DecodeValue<'a> for Validity {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> Result<Self> {
        header.tag.assert_eq(Tag::Sequence)?;
        reader.read_nested(header.length, |reader| {
            let not_before = Time::decode(reader)?;
            let not_after = Time::decode(reader)?;
            Ok(Validity {
                not_before,
                not_after,
            })
        })
    }
}

impl EncodeValue for Validity {
    fn value_len(&self) -> Result<Length> {
        self.not_before.encoded_len()? + self.not_after.encoded_len()?
    }

    fn encode_value(&self, writer: &mut impl Writer) -> Result<()> {
        self.not_before.encode(writer)?;
        self.not_after.encode(writer)?;
        Ok(())
    }
}

impl der::Sequence<'_> for Validity {}

/// Gets current time as X.509 Time.
pub fn current_time() -> Result<Time> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_err(|_| der::Error::from(der::ErrorKind::DateTime))?;
    let now_dt = der::DateTime::from_unix_duration(now)?;
    Ok(Time::GeneralizedTime(GeneralizedTime::from_date_time(
        now_dt,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_comparison() {
        let earlier =
            Time::UtcTime(UtcTime::from_unix_duration(Duration::from_secs(0)).unwrap());
        let later =
            Time::UtcTime(UtcTime::from_unix_duration(Duration::from_secs(86400)).unwrap());

        assert!(earlier.is_before(&later));
        assert!(later.is_after(&earlier));
        assert!(earlier.is_before_or_equal(&later));
        assert!(later.is_after_or_equal(&earlier));
    }

    #[test]
    fn test_format_threshold() {
        // 2049-12-31T23:59:59Z
        let last_utc = Time::from_unix_secs(2524607999).unwrap();
        assert!(matches!(last_utc, Time::UtcTime(_)));

        // 2050-01-01T00:00:00Z
        let first_gen = Time::from_unix_secs(2524608000).unwrap();
        assert!(matches!(first_gen, Time::GeneralizedTime(_)));
    }

    #[test]
    fn test_validity_well_formed() {
        let earlier =
            Time::UtcTime(UtcTime::from_unix_duration(Duration::from_secs(0)).unwrap());
        let later =
            Time::UtcTime(UtcTime::from_unix_duration(Duration::from_secs(86400)).unwrap());

        let validity = Validity::new(earlier, later);
        assert!(validity.is_well_formed());

        let invalid_validity = Validity::new(later, earlier);
        assert!(!invalid_validity.is_well_formed());
    }

    #[test]
    fn test_validity_checking() {
        let validity = Validity::from_unix_secs(1000, 2000).unwrap();

        let before =
            Time::UtcTime(UtcTime::from_unix_duration(Duration::from_secs(500)).unwrap());
        assert!(!validity.is_valid_at(&before));

        let within =
            Time::UtcTime(UtcTime::from_unix_duration(Duration::from_secs(1500)).unwrap());
        assert!(validity.is_valid_at(&within));

        let after =
            Time::UtcTime(UtcTime::from_unix_duration(Duration::from_secs(2500)).unwrap());
        assert!(!validity.is_valid_at(&after));
    }

    #[test]
    fn test_time_roundtrip() {
        let time = Time::from_unix_secs(1700000000).unwrap();
        let der = time.to_der().unwrap();
        let decoded = Time::from_der(&der).unwrap();
        assert_eq!(time, decoded);
        assert_eq!(decoded.to_unix_secs(), 1700000000);
    }
}
