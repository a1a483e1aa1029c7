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

//! Decoding of the transported signing inputs.

use crate::{CborSerializable, HeaderMap, InputField, ProtectedHeader, SignError};
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use log::debug;


/// URL-safe alphabet; padding is optional on input and never produced.
pub(crate) const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Base64URL-encode `data` without padding.
pub fn encode_b64url(data: &[u8]) -> String {
    BASE64URL.encode(data)
}

/// Base64URL-decode the value of `field`.
pub fn decode_b64url(field: InputField, data: &str) -> Result<Vec<u8>, SignError> {
    BASE64URL
        .decode(data)
        .map_err(|source| SignError::Decode { field, source })
}

/// Signing inputs after transport decoding.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedInput {
    pub payload: Vec<u8>,
    pub protected: ProtectedHeader,
    pub unprotected: HeaderMap,
}

impl DecodedInput {
    /// Decode the three transported inputs.  All Base64URL decoding happens before any CBOR
    /// parsing, so a request with several problems reports the transport one.
    pub fn decode(
        payload: &str,
        protected_header: &str,
        unprotected_header: &str,
    ) -> Result<Self, SignError> {
        let payload = decode_b64url(InputField::Payload, payload)?;
        let protected_data = decode_b64url(InputField::ProtectedHeader, protected_header)?;
        let unprotected_data = decode_b64url(InputField::UnprotectedHeader, unprotected_header)?;

        let protected = ProtectedHeader::from_wire_data(protected_data).map_err(|source| {
            SignError::CborParse {
                field: InputField::ProtectedHeader,
                source,
            }
        })?;
        let unprotected = HeaderMap::from_slice(&unprotected_data).map_err(|source| {
            SignError::CborParse {
                field: InputField::UnprotectedHeader,
                source,
            }
        })?;
        debug!(
            "decoded {} byte payload, protected header {:?}, unprotected header {:?}",
            payload.len(),
            protected.header(),
            unprotected
        );

        Ok(Self {
            payload,
            protected,
            unprotected,
        })
    }
}
