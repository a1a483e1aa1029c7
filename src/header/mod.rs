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

//! COSE Headers functionality.

use crate::{
    cbor::value::Value,
    common::AsCborValue,
    iana,
    iana::EnumI64,
    util::{cbor_type_error, ValueTryAs},
    Algorithm, CborSerializable, CoseError, Label, Result,
};


const ALG: Label = Label::Int(iana::HeaderParameter::Alg as i64);
const KID: Label = Label::Int(iana::HeaderParameter::Kid as i64);

/// Structure representing a COSE header map.
///
/// ```cddl
///   header_map = {
///       Generic_Headers,
///       * label => values
///   }
///  ```
///
/// Entries are held in the order they were decoded (or added), so that a map received from a
/// caller is emitted again unchanged.  Labels are unique.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeaderMap {
    entries: Vec<(Label, Value)>,
}

impl HeaderMap {
    /// Indicate whether the `HeaderMap` is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries in the map.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return the value for `label`, if present.
    pub fn get(&self, label: &Label) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }

    /// Iterate over the entries in map order.
    pub fn iter(&self) -> impl Iterator<Item = &(Label, Value)> {
        self.entries.iter()
    }

    /// Key identifier (label 4), if present.  A present `kid` must be a non-empty byte string.
    pub fn key_id(&self) -> Result<Option<&[u8]>> {
        match self.get(&KID) {
            None => Ok(None),
            Some(Value::Bytes(kid)) if kid.is_empty() => {
                Err(CoseError::UnexpectedItem("empty bstr", "non-empty bstr"))
            }
            Some(Value::Bytes(kid)) => Ok(Some(kid.as_slice())),
            Some(v) => cbor_type_error(v, "bstr"),
        }
    }

    /// Algorithm identifier (label 1), if present.
    pub fn algorithm(&self) -> Result<Option<Algorithm>> {
        self.get(&ALG)
            .cloned()
            .map(Algorithm::from_cbor_value)
            .transpose()
    }

    fn insert(&mut self, label: Label, value: Value) {
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((label, value)),
        }
    }
}

impl CborSerializable for HeaderMap {}

impl AsCborValue for HeaderMap {
    fn from_cbor_value(value: Value) -> Result<Self> {
        let m = value.try_as_map()?;
        let mut entries: Vec<(Label, Value)> = Vec::with_capacity(m.len());
        for (l, value) in m.into_iter() {
            let label = Label::from_cbor_value(l)?;
            if entries.iter().any(|(existing, _)| *existing == label) {
                return Err(CoseError::DuplicateMapKey);
            }
            // Values are only checked when used.
            entries.push((label, value));
        }
        Ok(Self { entries })
    }

    fn to_cbor_value(self) -> Result<Value> {
        let mut map = Vec::with_capacity(self.entries.len());
        for (label, value) in self.entries {
            map.push((label.to_cbor_value()?, value));
        }
        Ok(Value::Map(map))
    }
}

/// Header map that is covered by the signature, together with the exact bytes that carry it.
///
/// The bytes are the single source of truth: the signature input and the emitted message both
/// use them as-is, so a caller's (possibly non-canonical) encoding is never re-serialized.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProtectedHeader {
    original_data: Vec<u8>,
    header: HeaderMap,
}

impl ProtectedHeader {
    /// Parse a protected header from its serialized form, keeping the serialized form.
    ///
    /// A zero-length input is the encoding of an empty header map (RFC 8152 section 3).
    pub fn from_wire_data(data: Vec<u8>) -> Result<Self> {
        let header = if data.is_empty() {
            HeaderMap::default()
        } else {
            HeaderMap::from_slice(&data)?
        };
        Ok(Self {
            original_data: data,
            header,
        })
    }

    /// Encode a locally built header map, once.  An empty map is carried as a zero-length
    /// byte string.
    pub fn from_header(header: HeaderMap) -> Result<Self> {
        let original_data = if header.is_empty() {
            Vec::new()
        } else {
            header.clone().to_vec()?
        };
        Ok(Self {
            original_data,
            header,
        })
    }

    /// Parse from a CBOR `bstr` holding the serialized header map.
    pub fn from_cbor_bstr(val: Value) -> Result<Self> {
        Self::from_wire_data(val.try_as_bytes()?)
    }

    /// Return a CBOR `bstr` holding the serialized header map.
    pub fn cbor_bstr(&self) -> Value {
        Value::Bytes(self.original_data.clone())
    }

    /// The decoded header map.
    pub fn header(&self) -> &HeaderMap {
        &self.header
    }

    /// The serialized header map.
    pub fn original_data(&self) -> &[u8] {
        &self.original_data
    }
}

/// Builder for [`HeaderMap`] objects.
#[derive(Default)]
pub struct HeaderBuilder(HeaderMap);

impl HeaderBuilder {
    builder! {HeaderMap}

    /// Set the algorithm.
    #[must_use]
    pub fn algorithm(self, alg: iana::Algorithm) -> Self {
        self.value(ALG, Value::from(alg.to_i64()))
    }

    /// Set the key identifier.
    #[must_use]
    pub fn key_id(self, kid: Vec<u8>) -> Self {
        self.value(KID, Value::Bytes(kid))
    }

    /// Set a header label:value pair, replacing any existing value for the label.
    #[must_use]
    pub fn value(mut self, label: Label, value: Value) -> Self {
        self.0.insert(label, value);
        self
    }

    /// Set a header label:value pair where the `label` is text.
    #[must_use]
    pub fn text_value(self, label: String, value: Value) -> Self {
        self.value(Label::Text(label), value)
    }
}
