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

//! Request/response envelope for exposing a [`Signer`] over a JSON transport.
//!
//! The envelope carries caller bookkeeping (`id`, `version`, `metadata`) that is echoed back
//! untouched.  Failures never surface as transport errors: they are reported in the `errors`
//! list of an otherwise normal response.

use crate::{KeyStore, SignError, SignRequest, SignedMessage, Signer};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests;

/// Error code for a body that is not a well-formed signing envelope.
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";

/// Caller metadata, passed through unchanged.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Outer signing request.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CoseSignRequest {
    pub id: Option<String>,
    pub version: Option<String>,
    pub requesttime: Option<String>,
    pub metadata: Option<Metadata>,
    pub request: Option<CoseSignInnerRequest>,
}

/// Signing inputs within a [`CoseSignRequest`].  The three `cose*` fields are required; an empty
/// string is a present but empty value.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoseSignInnerRequest {
    pub cose_payload: String,
    pub application_id: Option<String>,
    pub reference_id: Option<String>,
    pub cose_protected_header: String,
    pub cose_unprotected_header: String,
}

impl From<&CoseSignInnerRequest> for SignRequest {
    fn from(inner: &CoseSignInnerRequest) -> Self {
        SignRequest {
            payload: inner.cose_payload.clone(),
            protected_header: inner.cose_protected_header.clone(),
            unprotected_header: inner.cose_unprotected_header.clone(),
        }
    }
}

/// Outer signing response.  Exactly one of `response` and `errors` is set.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CoseSignResponse {
    pub id: Option<String>,
    pub version: Option<String>,
    pub responsetime: String,
    pub metadata: Option<Metadata>,
    pub response: Option<ResponseBody>,
    pub errors: Option<Vec<ServiceError>>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub cose_signed_data: String,
    pub timestamp: String,
}

impl From<SignedMessage> for ResponseBody {
    fn from(msg: SignedMessage) -> Self {
        ResponseBody {
            cose_signed_data: msg.cose_signed_data,
            timestamp: msg.timestamp,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceError {
    pub error_code: String,
    pub message: String,
}

impl From<&SignError> for ServiceError {
    fn from(e: &SignError) -> Self {
        ServiceError {
            error_code: e.code().to_owned(),
            message: e.to_string(),
        }
    }
}

/// Envelope-level front end for a [`Signer`].
#[derive(Debug)]
pub struct SignService<K> {
    signer: Signer<K>,
}

impl<K: KeyStore> SignService<K> {
    pub fn new(signer: Signer<K>) -> Self {
        Self { signer }
    }

    pub fn signer(&self) -> &Signer<K> {
        &self.signer
    }

    /// Process one request envelope.
    pub fn handle(&self, request: CoseSignRequest) -> CoseSignResponse {
        let mut response = CoseSignResponse {
            id: request.id,
            version: request.version,
            responsetime: self.signer.config().timestamp_now(),
            metadata: request.metadata,
            response: None,
            errors: None,
        };
        let inner = match request.request {
            Some(inner) => inner,
            None => {
                warn!("rejecting envelope without a request body");
                response.errors = Some(vec![ServiceError {
                    error_code: INVALID_REQUEST.to_owned(),
                    message: "missing request body".to_owned(),
                }]);
                return response;
            }
        };
        debug!(
            "signing for application {:?}, reference {:?}",
            inner.application_id, inner.reference_id
        );
        match self.signer.sign(&SignRequest::from(&inner)) {
            Ok(msg) => response.response = Some(msg.into()),
            Err(e) => {
                warn!("signing request {:?} failed: {}", response.id, e);
                response.errors = Some(vec![ServiceError::from(&e)]);
            }
        }
        response
    }

    /// Process one request envelope given as JSON text, returning the response as JSON text.
    pub fn handle_json(&self, body: &str) -> Result<String, serde_json::Error> {
        let response = match serde_json::from_str::<CoseSignRequest>(body) {
            Ok(request) => self.handle(request),
            Err(e) => {
                warn!("rejecting malformed request envelope: {}", e);
                CoseSignResponse {
                    responsetime: self.signer.config().timestamp_now(),
                    errors: Some(vec![ServiceError {
                        error_code: INVALID_REQUEST.to_owned(),
                        message: e.to_string(),
                    }]),
                    ..Default::default()
                }
            }
        };
        serde_json::to_string(&response)
    }
}
