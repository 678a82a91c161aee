// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Signature service boundary.
//!
//! No cryptography is implemented in this crate. Signing and verification
//! are delegated to caller-supplied services over raw byte buffers; this
//! module only fixes the trait seam. A [`Verifier`] additionally exposes a
//! stable `(key_id, provider)` identity so verification results can be
//! memoized against the exact key and implementation that produced them.

use spki::AlgorithmIdentifierOwned;

use crate::Result;

/// Produces signatures over to-be-signed byte buffers.
pub trait Signer {
    /// AlgorithmIdentifier to place in both the TBS body and the outer
    /// signatureAlgorithm field.
    fn algorithm(&self) -> AlgorithmIdentifierOwned;

    /// Sign the DER-encoded TBS bytes, returning the raw signature.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>>;
}

/// Checks signatures over raw byte buffers.
pub trait Verifier {
    /// Stable identifier for the verification key.
    fn key_id(&self) -> &str;

    /// Name of the backing implementation ("provider").
    fn provider(&self) -> &str;

    /// Verify the signature over the message.
    ///
    /// `Ok(false)` means the signature does not match; `Err` means the
    /// service itself failed (unsupported algorithm, malformed key).
    fn verify(
        &self,
        algorithm: &AlgorithmIdentifierOwned,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool>;
}

#[cfg(test)]
pub(crate) mod testutil {
    //! XOR-checksum test doubles standing in for a real signature service.

    use super::*;
    use const_oid::ObjectIdentifier;

    pub const TEST_SIG_ALG: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.99999.64");

    fn checksum(message: &[u8]) -> Vec<u8> {
        let mut acc = [0u8; 4];
        for (i, byte) in message.iter().enumerate() {
            acc[i % 4] ^= *byte;
        }
        acc.to_vec()
    }

    pub struct ChecksumSigner;

    impl Signer for ChecksumSigner {
        fn algorithm(&self) -> AlgorithmIdentifierOwned {
            AlgorithmIdentifierOwned {
                oid: TEST_SIG_ALG,
                parameters: None,
            }
        }

        fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
            Ok(checksum(message))
        }
    }

    pub struct ChecksumVerifier {
        pub key_id: String,
        pub provider: String,
    }

    impl ChecksumVerifier {
        pub fn new(key_id: &str) -> Self {
            Self {
                key_id: key_id.to_string(),
                provider: "checksum".to_string(),
            }
        }
    }

    impl Verifier for ChecksumVerifier {
        fn key_id(&self) -> &str {
            &self.key_id
        }

        fn provider(&self) -> &str {
            &self.provider
        }

        fn verify(
            &self,
            _algorithm: &AlgorithmIdentifierOwned,
            message: &[u8],
            signature: &[u8],
        ) -> Result<bool> {
            Ok(checksum(message) == signature)
        }
    }

    /// Verifier that rejects everything, for memo tests.
    pub struct RejectingVerifier {
        pub key_id: String,
    }

    impl Verifier for RejectingVerifier {
        fn key_id(&self) -> &str {
            &self.key_id
        }

        fn provider(&self) -> &str {
            "rejecting"
        }

        fn verify(
            &self,
            _algorithm: &AlgorithmIdentifierOwned,
            _message: &[u8],
            _signature: &[u8],
        ) -> Result<bool> {
            Ok(false)
        }
    }
}
