// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! X.509 certificate and CRL object model.
//!
//! An object model over DER-encoded certificates and revocation lists built
//! on the `der` crate. Signed objects retain their exact input bytes, so
//! re-encoding is byte-identical; mutation happens on builder types that
//! freeze into immutable signed values through an external signing service.
//!
//! # Features
//! - Parse X.509 v3 certificates and v2 CRLs from DER/PEM, byte-exact
//!   round-trip
//! - Typed extension payloads behind a fixed OID registry, with a sticky
//!   flag for unrecognized critical extensions
//! - Uniform dotted-path attribute protocol over fields and extensions
//! - PKIX name-constraints subtree engine
//! - RFC 2253 distinguished-name parsing, printing, and canonical equality
//!
//! # Example
//! ```no_run
//! use pkix_x509::Certificate;
//!
//! # fn example(cert_der: &[u8]) -> pkix_x509::Result<()> {
//! let cert = Certificate::from_der(cert_der)?;
//! println!("subject: {}", cert.subject());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod attr;
pub mod cert;
pub mod constraints;
pub mod crl;
pub mod error;
pub mod ext;
pub mod name;
pub mod oid;
pub mod sign;
pub mod time;

pub use attr::{AttrAccess, AttrValue};
pub use cert::{Certificate, CertificateBuilder, SubjectPublicKeyInfo, TbsCertificate, Version};
pub use constraints::{ConstraintResult, GeneralSubtree, NameConstraints};
pub use crl::{CertificateList, CrlBuilder, RevokedCertificate, TbsCertList};
pub use error::{
    AttributeError, EncodingError, Error, ExtensionError, NameError, Result, SignatureError,
    TimeError,
};
pub use ext::{DecodedExtension, Extension, ExtensionPayload, ExtensionSet};
pub use name::general::{GeneralName, GeneralNames};
pub use name::{Name, RelativeDistinguishedName};
pub use sign::{Signer, Verifier};
pub use time::{Time, Validity};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::attr::{AttrAccess, AttrValue};
    pub use crate::{
        Certificate, CertificateBuilder, CertificateList, CrlBuilder, Error, Name, Result,
    };
}
