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

//! Key identifiers and the read-only key lookup used when signing.

use crate::{SigningAlgorithm, SigningKey, VerifyingKey};
use std::{collections::HashMap, sync::Arc};


/// Key identifier, compared as raw bytes.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct KeyId(Vec<u8>);

impl KeyId {
    /// The identifier bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the identifier, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for KeyId {
    fn from(kid: Vec<u8>) -> Self {
        KeyId(kid)
    }
}

impl From<&[u8]> for KeyId {
    fn from(kid: &[u8]) -> Self {
        KeyId(kid.to_vec())
    }
}

impl From<&str> for KeyId {
    fn from(kid: &str) -> Self {
        KeyId(kid.as_bytes().to_vec())
    }
}

impl AsRef<[u8]> for KeyId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Printable UTF-8 identifiers are shown quoted, anything else as hex.
impl core::fmt::Display for KeyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match core::str::from_utf8(&self.0) {
            Ok(s) if !s.is_empty() && !s.chars().any(char::is_control) => write!(f, "{:?}", s),
            _ => write!(f, "h'{}'", hex::encode(&self.0)),
        }
    }
}

/// Read-only lookup from key identifier to private key.
///
/// Implementations are shared between concurrently running signing operations and must not
/// change the mapping while in use.
pub trait KeyStore: Send + Sync {
    /// Return the key registered under `kid`, if any.
    fn lookup(&self, kid: &KeyId) -> Option<Arc<SigningKey>>;
}

impl<K: KeyStore + ?Sized> KeyStore for Arc<K> {
    fn lookup(&self, kid: &KeyId) -> Option<Arc<SigningKey>> {
        (**self).lookup(kid)
    }
}

impl<K: KeyStore + ?Sized> KeyStore for &K {
    fn lookup(&self, kid: &KeyId) -> Option<Arc<SigningKey>> {
        (**self).lookup(kid)
    }
}

/// In-memory [`KeyStore`], immutable once built.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    keys: HashMap<KeyId, Arc<SigningKey>>,
}

impl MemoryKeyStore {
    /// Start building a store.
    pub fn builder() -> MemoryKeyStoreBuilder {
        MemoryKeyStoreBuilder::new()
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Indicate whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Registered identifiers, in byte order.
    pub fn key_ids(&self) -> Vec<&KeyId> {
        let mut ids: Vec<&KeyId> = self.keys.keys().collect();
        ids.sort();
        ids
    }

    /// Public half of the key registered under `kid`.
    pub fn public_key(&self, kid: &KeyId) -> Option<VerifyingKey> {
        self.keys.get(kid).map(|key| key.verifying_key())
    }
}

impl KeyStore for MemoryKeyStore {
    fn lookup(&self, kid: &KeyId) -> Option<Arc<SigningKey>> {
        self.keys.get(kid).cloned()
    }
}

/// Builder for [`MemoryKeyStore`] objects.
#[derive(Debug, Default)]
pub struct MemoryKeyStoreBuilder(MemoryKeyStore);

impl MemoryKeyStoreBuilder {
    builder! {MemoryKeyStore}

    /// Register `key` under `kid`, replacing any key already registered under it.
    #[must_use]
    pub fn insert(mut self, kid: impl Into<KeyId>, key: SigningKey) -> Self {
        self.0.keys.insert(kid.into(), Arc::new(key));
        self
    }

    /// Register a freshly generated key for `alg` under `kid`.
    #[must_use]
    pub fn generate(self, kid: impl Into<KeyId>, alg: SigningAlgorithm) -> Self {
        self.insert(kid, SigningKey::generate(alg))
    }
}
