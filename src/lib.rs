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

//! Signing service producing [COSE_Sign1][COSE] messages from caller-supplied headers.
//!
//! A request carries a payload plus protected and unprotected [CBOR][CBOR] header maps, each
//! Base64URL-encoded.  The signer picks the key named by the `kid` header parameter (protected
//! header first), signs with the ECDSA algorithm named by the protected `alg`, and returns the
//! Base64URL-encoded COSE_Sign1 together with a generation timestamp.
//!
//! Builds on the [`ciborium`](https://docs.rs/ciborium) crate for underlying CBOR support.
//!
//! ## Usage
//!
//! ```
//! use cose_signer::{
//!     iana, CborSerializable, CoseSign1, HeaderBuilder, KeyId, MemoryKeyStore, SignRequest,
//!     Signer, SigningAlgorithm,
//! };
//! use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
//!
//! // Key store, built once and then shared read-only.
//! let store = MemoryKeyStore::builder()
//!     .generate("123", SigningAlgorithm::ES256)
//!     .build();
//! let signer = Signer::new(&store);
//!
//! // Caller-side request construction.
//! let protected = HeaderBuilder::new()
//!     .algorithm(iana::Algorithm::ES256)
//!     .key_id(b"123".to_vec())
//!     .build();
//! let request = SignRequest {
//!     payload: URL_SAFE_NO_PAD.encode(b"hello"),
//!     protected_header: URL_SAFE_NO_PAD.encode(protected.to_vec().unwrap()),
//!     unprotected_header: URL_SAFE_NO_PAD.encode([0xa0u8]), // empty map
//! };
//!
//! let signed = signer.sign(&request).unwrap();
//! println!("{} at {}", signed.cose_signed_data, signed.timestamp);
//!
//! // At the receiving end, decode and check the signature with the public key.
//! let data = URL_SAFE_NO_PAD.decode(&signed.cose_signed_data).unwrap();
//! let sign1 = CoseSign1::from_slice(&data).unwrap();
//! let vk = store.public_key(&KeyId::from("123")).unwrap();
//! let result = sign1.verify_signature(b"", |sig, data| vk.verify(data, sig));
//! assert!(result.is_ok());
//! ```
//!
//! [COSE]: https://tools.ietf.org/html/rfc8152
//! [CBOR]: https://tools.ietf.org/html/rfc7049

#![deny(rustdoc::broken_intra_doc_links)]

/// Re-export of the `ciborium` crate used for underlying CBOR encoding.
pub use ciborium as cbor;

#[macro_use]
pub(crate) mod util;

pub mod iana;

mod algorithm;
pub use algorithm::*;
mod common;
pub use common::*;
mod config;
pub use config::*;
pub mod decode;
pub use decode::{DecodedInput, decode_b64url, encode_b64url};
mod header;
pub use header::*;
mod keystore;
pub use keystore::*;
mod resolve;
pub use resolve::*;
pub mod service;
mod sign;
pub use sign::*;
mod signer;
pub use signer::*;
