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

//! Selection of the signing key from the request headers.

use crate::{HeaderMap, InputField, KeyId, KeyStore, SignError, SigningKey};
use log::debug;
use std::sync::Arc;

#[cfg(test)]
mod tests;

/// Header that supplied the key identifier.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeyIdSource {
    Protected,
    Unprotected,
}

impl core::fmt::Display for KeyIdSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            KeyIdSource::Protected => write!(f, "protected header"),
            KeyIdSource::Unprotected => write!(f, "unprotected header"),
        }
    }
}

/// Key chosen for a request.
#[derive(Clone, Debug)]
pub struct ResolvedKey {
    pub kid: KeyId,
    pub source: KeyIdSource,
    pub key: Arc<SigningKey>,
}

/// Find the key identifier: the protected header's `kid` if present, otherwise the unprotected
/// header's.  The unprotected value is never consulted (or type-checked) when the protected
/// header has one.
pub fn key_id(
    protected: &HeaderMap,
    unprotected: &HeaderMap,
) -> Result<Option<(KeyId, KeyIdSource)>, SignError> {
    let kid = protected.key_id().map_err(|source| SignError::CborParse {
        field: InputField::ProtectedHeader,
        source,
    })?;
    if let Some(kid) = kid {
        return Ok(Some((KeyId::from(kid), KeyIdSource::Protected)));
    }
    let kid = unprotected.key_id().map_err(|source| SignError::CborParse {
        field: InputField::UnprotectedHeader,
        source,
    })?;
    Ok(kid.map(|kid| (KeyId::from(kid), KeyIdSource::Unprotected)))
}

/// Find the key identifier and look it up in `store`.
pub fn resolve_key<K: KeyStore + ?Sized>(
    store: &K,
    protected: &HeaderMap,
    unprotected: &HeaderMap,
) -> Result<ResolvedKey, SignError> {
    let (kid, source) = key_id(protected, unprotected)?.ok_or(SignError::MissingKeyIdentifier)?;
    debug!("key identifier {} taken from {}", kid, source);
    let key = store
        .lookup(&kid)
        .ok_or_else(|| SignError::UnknownKeyIdentifier(kid.clone()))?;
    Ok(ResolvedKey { kid, source, key })
}
