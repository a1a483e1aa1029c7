// Copyright 2021 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
////////////////////////////////////////////////////////////////////////////////

//! ECDSA signing and verification keys for the supported COSE algorithms.

use crate::{iana, Algorithm, CoseError, SignError};
use p256::ecdsa::signature::{Signer as _, Verifier as _};
use rand_core::OsRng;


/// Error type for key construction and signature verification.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// Private key bytes are not a valid scalar for the curve.
    #[error("invalid private key for {0:?}")]
    InvalidPrivateKey(SigningAlgorithm),
    /// Signature bytes are not a fixed-width `r || s` pair for the curve.
    #[error("malformed signature")]
    MalformedSignature,
    /// Signature does not match the data.
    #[error("signature verification failed")]
    BadSignature,
    /// Failure building the data to verify.
    #[error(transparent)]
    Cose(#[from] CoseError),
}

/// ECDSA algorithms that can produce COSE_Sign1 signatures.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SigningAlgorithm {
    /// ECDSA w/ SHA-256 on P-256.
    ES256,
    /// ECDSA w/ SHA-384 on P-384.
    ES384,
    /// ECDSA w/ SHA-512 on P-521.
    ES512,
}

impl SigningAlgorithm {
    /// Map a COSE algorithm label onto a supported ECDSA algorithm.
    pub fn from_algorithm(alg: &Algorithm) -> Option<Self> {
        match alg {
            Algorithm::Assigned(iana::Algorithm::ES256) => Some(Self::ES256),
            Algorithm::Assigned(iana::Algorithm::ES384) => Some(Self::ES384),
            Algorithm::Assigned(iana::Algorithm::ES512) => Some(Self::ES512),
            _ => None,
        }
    }

    /// IANA value for the algorithm.
    pub fn iana(&self) -> iana::Algorithm {
        match self {
            Self::ES256 => iana::Algorithm::ES256,
            Self::ES384 => iana::Algorithm::ES384,
            Self::ES512 => iana::Algorithm::ES512,
        }
    }

    /// Curve that keys for this algorithm live on.
    pub fn curve(&self) -> iana::EllipticCurve {
        match self {
            Self::ES256 => iana::EllipticCurve::P_256,
            Self::ES384 => iana::EllipticCurve::P_384,
            Self::ES512 => iana::EllipticCurve::P_521,
        }
    }

    /// Length in bytes of an `r || s` signature.
    pub fn signature_len(&self) -> usize {
        match self {
            Self::ES256 => 64,
            Self::ES384 => 96,
            Self::ES512 => 132,
        }
    }
}

/// ECDSA private key.
pub enum SigningKey {
    P256(p256::ecdsa::SigningKey),
    P384(p384::ecdsa::SigningKey),
    P521(p521::ecdsa::SigningKey),
}

impl core::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}

impl SigningKey {
    /// Generate a fresh key for `alg` from the operating system's RNG.
    pub fn generate(alg: SigningAlgorithm) -> Self {
        match alg {
            SigningAlgorithm::ES256 => Self::P256(p256::ecdsa::SigningKey::random(&mut OsRng)),
            SigningAlgorithm::ES384 => Self::P384(p384::ecdsa::SigningKey::random(&mut OsRng)),
            SigningAlgorithm::ES512 => Self::P521(p521::ecdsa::SigningKey::random(&mut OsRng)),
        }
    }

    /// Build a key from a big-endian private scalar.
    pub fn from_slice(alg: SigningAlgorithm, data: &[u8]) -> Result<Self, KeyError> {
        Ok(match alg {
            SigningAlgorithm::ES256 => Self::P256(
                p256::ecdsa::SigningKey::from_slice(data)
                    .map_err(|_| KeyError::InvalidPrivateKey(alg))?,
            ),
            SigningAlgorithm::ES384 => Self::P384(
                p384::ecdsa::SigningKey::from_slice(data)
                    .map_err(|_| KeyError::InvalidPrivateKey(alg))?,
            ),
            SigningAlgorithm::ES512 => Self::P521(
                p521::ecdsa::SigningKey::from_slice(data)
                    .map_err(|_| KeyError::InvalidPrivateKey(alg))?,
            ),
        })
    }

    /// The only algorithm this key signs with.
    pub fn algorithm(&self) -> SigningAlgorithm {
        match self {
            Self::P256(_) => SigningAlgorithm::ES256,
            Self::P384(_) => SigningAlgorithm::ES384,
            Self::P521(_) => SigningAlgorithm::ES512,
        }
    }

    /// Sign `data`, hashing it with the algorithm's digest, and return the fixed-width `r || s`
    /// encoding of the signature.  ES256 and ES384 nonces are derived deterministically
    /// (RFC 6979); ES512 nonces come from the operating system's RNG.
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>, SignError> {
        let failed = |e: p256::ecdsa::Error| SignError::SigningFailure(e.to_string());
        Ok(match self {
            Self::P256(sk) => {
                let sig: p256::ecdsa::Signature = sk.try_sign(data).map_err(failed)?;
                sig.to_bytes().to_vec()
            }
            Self::P384(sk) => {
                let sig: p384::ecdsa::Signature = sk.try_sign(data).map_err(failed)?;
                sig.to_bytes().to_vec()
            }
            Self::P521(sk) => {
                let sig: p521::ecdsa::Signature = sk.try_sign(data).map_err(failed)?;
                sig.to_bytes().to_vec()
            }
        })
    }

    /// Public half of the key.
    pub fn verifying_key(&self) -> VerifyingKey {
        match self {
            Self::P256(sk) => VerifyingKey::P256(p256::ecdsa::VerifyingKey::from(sk)),
            Self::P384(sk) => VerifyingKey::P384(p384::ecdsa::VerifyingKey::from(sk)),
            Self::P521(sk) => VerifyingKey::P521(p521::ecdsa::VerifyingKey::from(sk)),
        }
    }
}

/// ECDSA public key.
#[derive(Clone)]
pub enum VerifyingKey {
    P256(p256::ecdsa::VerifyingKey),
    P384(p384::ecdsa::VerifyingKey),
    P521(p521::ecdsa::VerifyingKey),
}

impl core::fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VerifyingKey")
            .field("algorithm", &self.algorithm())
            .field("x", &hex::encode(self.coordinates().x))
            .finish_non_exhaustive()
    }
}

impl VerifyingKey {
    /// Algorithm the key verifies.
    pub fn algorithm(&self) -> SigningAlgorithm {
        match self {
            Self::P256(_) => SigningAlgorithm::ES256,
            Self::P384(_) => SigningAlgorithm::ES384,
            Self::P521(_) => SigningAlgorithm::ES512,
        }
    }

    /// Check an `r || s` signature over `data`.
    pub fn verify(&self, data: &[u8], sig: &[u8]) -> Result<(), KeyError> {
        match self {
            Self::P256(vk) => {
                let sig = p256::ecdsa::Signature::from_slice(sig)
                    .map_err(|_| KeyError::MalformedSignature)?;
                vk.verify(data, &sig).map_err(|_| KeyError::BadSignature)
            }
            Self::P384(vk) => {
                let sig = p384::ecdsa::Signature::from_slice(sig)
                    .map_err(|_| KeyError::MalformedSignature)?;
                vk.verify(data, &sig).map_err(|_| KeyError::BadSignature)
            }
            Self::P521(vk) => {
                let sig = p521::ecdsa::Signature::from_slice(sig)
                    .map_err(|_| KeyError::MalformedSignature)?;
                vk.verify(data, &sig).map_err(|_| KeyError::BadSignature)
            }
        }
    }

    /// Affine coordinates of the public point.
    pub fn coordinates(&self) -> PublicKeyCoordinates {
        let (curve, point) = match self {
            Self::P256(vk) => (
                iana::EllipticCurve::P_256,
                vk.to_encoded_point(false).as_bytes().to_vec(),
            ),
            Self::P384(vk) => (
                iana::EllipticCurve::P_384,
                vk.to_encoded_point(false).as_bytes().to_vec(),
            ),
            Self::P521(vk) => (
                iana::EllipticCurve::P_521,
                vk.to_encoded_point(false).as_bytes().to_vec(),
            ),
        };
        // Uncompressed SEC1 form: 0x04 || x || y.
        let coord_len = (point.len() - 1) / 2;
        PublicKeyCoordinates {
            curve,
            x: point[1..1 + coord_len].to_vec(),
            y: point[1 + coord_len..].to_vec(),
        }
    }
}

/// Uncompressed public key point, as big-endian coordinates.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PublicKeyCoordinates {
    pub curve: iana::EllipticCurve,
    pub x: Vec<u8>,
    pub y: Vec<u8>,
}

impl core::fmt::Display for PublicKeyCoordinates {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "x={}\ny={}", hex::encode(&self.x), hex::encode(&self.y))
    }
}
