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

//! COSE_Sign1 signing of transported requests.

use crate::{
    decode::encode_b64url, resolve_key, CborSerializable, CoseSign1, CoseSign1Builder,
    DecodedInput, HeaderMap, KeyStore, ResolvedKey, SignError, SignerConfig, SigningAlgorithm,
    SigningKey, TaggedCborSerializable,
};
use log::{debug, info};


/// A signing request: payload and headers, each Base64URL-encoded.  The headers are
/// CBOR-encoded header maps.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SignRequest {
    pub payload: String,
    pub protected_header: String,
    pub unprotected_header: String,
}

/// Result of a successful signing request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignedMessage {
    /// Base64URL (unpadded) encoding of the CBOR-encoded COSE_Sign1.
    pub cose_signed_data: String,
    /// Generation time, ISO-8601 with numeric offset.
    pub timestamp: String,
}

/// Signs requests with keys drawn from a [`KeyStore`].
///
/// A `Signer` holds no per-request state and can be shared between threads.
#[derive(Debug)]
pub struct Signer<K> {
    store: K,
    config: SignerConfig,
}

impl<K: KeyStore> Signer<K> {
    /// Create a signer with the default configuration.
    pub fn new(store: K) -> Self {
        Self::with_config(store, SignerConfig::default())
    }

    pub fn with_config(store: K, config: SignerConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    /// Decode, sign and encode a request.
    pub fn sign(&self, request: &SignRequest) -> Result<SignedMessage, SignError> {
        let input = DecodedInput::decode(
            &request.payload,
            &request.protected_header,
            &request.unprotected_header,
        )?;
        let (sign1, resolved, alg) = self.build_message(input)?;

        let data = if self.config.tagged {
            sign1.to_tagged_vec()?
        } else {
            sign1.to_vec()?
        };
        info!(
            "signed COSE_Sign1 with key {} ({:?}), {} bytes",
            resolved.kid,
            alg,
            data.len()
        );
        Ok(SignedMessage {
            cose_signed_data: encode_b64url(&data),
            timestamp: self.config.timestamp_now(),
        })
    }

    /// Sign already-decoded inputs, returning the message before encoding.
    pub fn sign_decoded(&self, input: DecodedInput) -> Result<CoseSign1, SignError> {
        self.build_message(input).map(|(sign1, _, _)| sign1)
    }

    fn build_message(
        &self,
        input: DecodedInput,
    ) -> Result<(CoseSign1, ResolvedKey, SigningAlgorithm), SignError> {
        let resolved = resolve_key(&self.store, input.protected.header(), &input.unprotected)?;
        let alg = signing_algorithm(input.protected.header(), &resolved.key)?;
        debug!("signing with {:?}", alg);

        let key = &resolved.key;
        let builder = CoseSign1Builder::new()
            .protected(input.protected)
            .unprotected(input.unprotected);
        let builder = if self.config.detached_payload {
            builder.try_create_detached_signature(&input.payload, b"", |tbs| key.sign(tbs))?
        } else {
            builder
                .payload(input.payload)
                .try_create_signature(b"", |tbs| key.sign(tbs))?
        };
        Ok((builder.build(), resolved, alg))
    }
}

/// Algorithm named by the protected header, which must be an ECDSA algorithm matching `key`.
/// An algorithm in the unprotected header is not considered.
pub fn signing_algorithm(
    protected: &HeaderMap,
    key: &SigningKey,
) -> Result<SigningAlgorithm, SignError> {
    let alg = match protected.algorithm() {
        Ok(Some(alg)) => alg,
        Ok(None) => {
            return Err(SignError::UnsupportedAlgorithm(
                "no algorithm in protected header".to_owned(),
            ))
        }
        Err(e) => return Err(SignError::UnsupportedAlgorithm(e.to_string())),
    };
    let signing_alg = SigningAlgorithm::from_algorithm(&alg).ok_or_else(|| {
        SignError::UnsupportedAlgorithm(format!("{:?} is not a supported signature algorithm", alg))
    })?;
    if signing_alg != key.algorithm() {
        return Err(SignError::UnsupportedAlgorithm(format!(
            "{:?} cannot be used with a {:?} key",
            signing_alg,
            key.algorithm()
        )));
    }
    Ok(signing_alg)
}
