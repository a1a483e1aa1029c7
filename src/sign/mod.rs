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

//! COSE_Sign1 functionality.

use crate::{
    cbor,
    cbor::value::Value,
    common::AsCborValue,
    iana,
    util::{cbor_type_error, ValueTryAs},
    CborSerializable, CoseError, HeaderMap, ProtectedHeader, Result, TaggedCborSerializable,
};


/// Context string placed at the start of the `Sig_structure` for a COSE_Sign1 signature.
pub const SIGNATURE1_CONTEXT: &str = "Signature1";

/// Signed payload with a single signature.
///
/// ```cddl
///   COSE_Sign1 = [
///       Headers,
///       payload : bstr / nil,
///       signature : bstr
///   ]
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CoseSign1 {
    pub protected: ProtectedHeader,
    pub unprotected: HeaderMap,
    pub payload: Option<Vec<u8>>,
    pub signature: Vec<u8>,
}

impl CborSerializable for CoseSign1 {}

impl TaggedCborSerializable for CoseSign1 {
    const TAG: u64 = iana::CborTag::CoseSign1 as u64;
}

impl AsCborValue for CoseSign1 {
    fn from_cbor_value(value: Value) -> Result<Self> {
        let mut a = value.try_as_array()?;
        if a.len() != 4 {
            return Err(CoseError::UnexpectedItem("array", "array with 4 items"));
        }

        // Remove array elements in reverse order to avoid shifts.
        let signature = a.remove(3).try_as_bytes()?;
        let payload = match a.remove(2) {
            Value::Bytes(b) => Some(b),
            Value::Null => None,
            v => return cbor_type_error(&v, "bstr / nil"),
        };
        let unprotected = HeaderMap::from_cbor_value(a.remove(1))?;
        let protected = ProtectedHeader::from_cbor_bstr(a.remove(0))?;

        Ok(Self {
            protected,
            unprotected,
            payload,
            signature,
        })
    }

    fn to_cbor_value(self) -> Result<Value> {
        Ok(Value::Array(vec![
            self.protected.cbor_bstr(),
            self.unprotected.to_cbor_value()?,
            match self.payload {
                None => Value::Null,
                Some(b) => Value::Bytes(b),
            },
            Value::Bytes(self.signature),
        ]))
    }
}

impl CoseSign1 {
    /// Verify the signature on a `CoseSign1`, with the given `aad` and the embedded payload.
    /// The `verifier` closure is called with the signature and the data that was signed.
    ///
    /// # Panics
    ///
    /// This function will panic if the `payload` has not been set.
    pub fn verify_signature<F, E>(&self, aad: &[u8], verifier: F) -> Result<(), E>
    where
        F: FnOnce(&[u8], &[u8]) -> Result<(), E>,
        E: From<CoseError>,
    {
        let payload = self.payload.as_ref().expect("payload missing"); // safe: documented
        let tbs_data = sig_structure_data(&self.protected, aad, payload)?;
        verifier(&self.signature, &tbs_data)
    }

    /// Verify the signature on a `CoseSign1` whose payload was detached, with the given `aad`
    /// and externally supplied `payload`.
    ///
    /// # Panics
    ///
    /// This function will panic if the `payload` has been set.
    pub fn verify_detached_signature<F, E>(
        &self,
        payload: &[u8],
        aad: &[u8],
        verifier: F,
    ) -> Result<(), E>
    where
        F: FnOnce(&[u8], &[u8]) -> Result<(), E>,
        E: From<CoseError>,
    {
        assert!(self.payload.is_none());
        let tbs_data = sig_structure_data(&self.protected, aad, payload)?;
        verifier(&self.signature, &tbs_data)
    }

    /// Construct the to-be-signed data for this object.
    pub fn tbs_data(&self, aad: &[u8]) -> Result<Vec<u8>> {
        let payload = self.payload.as_deref().unwrap_or_default();
        sig_structure_data(&self.protected, aad, payload)
    }
}

/// Create a binary blob that will be signed.
///
/// ```cddl
///   Sig_structure = [
///       context : "Signature1",
///       body_protected : empty_or_serialized_map,
///       external_aad : bstr,
///       payload : bstr
///   ]
/// ```
///
/// The protected header is included as the bytes it was received (or first encoded) as.
pub fn sig_structure_data(
    protected: &ProtectedHeader,
    external_aad: &[u8],
    payload: &[u8],
) -> Result<Vec<u8>> {
    let arr = Value::Array(vec![
        Value::Text(SIGNATURE1_CONTEXT.to_owned()),
        protected.cbor_bstr(),
        Value::Bytes(external_aad.to_vec()),
        Value::Bytes(payload.to_vec()),
    ]);
    let mut data = Vec::new();
    cbor::ser::into_writer(&arr, &mut data)?;
    Ok(data)
}

/// Builder for [`CoseSign1`] objects.
#[derive(Debug, Default)]
pub struct CoseSign1Builder(CoseSign1);

impl CoseSign1Builder {
    builder! {CoseSign1}
    builder_set! {protected: ProtectedHeader}
    builder_set! {unprotected: HeaderMap}
    builder_set! {signature: Vec<u8>}
    builder_set_optional! {payload: Vec<u8>}

    /// Calculate the signature value, using `signer` to generate the signature bytes that will be
    /// used to complete the object.
    ///
    /// # Panics
    ///
    /// This function will panic if the `payload` has not been set.
    pub fn try_create_signature<F, E>(self, aad: &[u8], signer: F) -> Result<Self, E>
    where
        F: FnOnce(&[u8]) -> Result<Vec<u8>, E>,
        E: From<CoseError>,
    {
        let tbs_data = {
            let payload = self.0.payload.as_ref().expect("payload missing"); // safe: documented
            sig_structure_data(&self.0.protected, aad, payload)?
        };
        let sig_data = signer(&tbs_data)?;
        Ok(self.signature(sig_data))
    }

    /// Calculate the signature value for a detached payload, using `signer` to generate the
    /// signature bytes that will be used to complete the object.  The payload itself is not
    /// included in the built object.
    ///
    /// # Panics
    ///
    /// This function will panic if the `payload` has been set.
    pub fn try_create_detached_signature<F, E>(
        self,
        payload: &[u8],
        aad: &[u8],
        signer: F,
    ) -> Result<Self, E>
    where
        F: FnOnce(&[u8]) -> Result<Vec<u8>, E>,
        E: From<CoseError>,
    {
        assert!(self.0.payload.is_none());
        let tbs_data = sig_structure_data(&self.0.protected, aad, payload)?;
        let sig_data = signer(&tbs_data)?;
        Ok(self.signature(sig_data))
    }
}
