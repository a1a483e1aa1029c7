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

//! Common types.

use crate::{
    cbor,
    cbor::value::Value,
    iana,
    iana::{EnumI64, WithPrivateRange},
    keystore::KeyId,
    util::{cbor_type_error, ValueTryAs},
};
use core::convert::TryInto;


/// Marker structure indicating that the EOF was encountered when reading CBOR data.
#[derive(Debug)]
pub struct EndOfFile;

/// Error type for failures in encoding or decoding COSE types.
#[derive(Debug, thiserror::Error)]
pub enum CoseError {
    /// CBOR decoding failure.
    #[error("decode CBOR failure: {0}")]
    DecodeFailed(cbor::de::Error<EndOfFile>),
    /// Duplicate map key detected.
    #[error("duplicate map key")]
    DuplicateMapKey,
    /// CBOR encoding failure.
    #[error("encode CBOR failure")]
    EncodeFailed,
    /// CBOR input had extra data.
    #[error("extraneous data in CBOR input")]
    ExtraneousData,
    /// Integer value on the wire is outside the range of integers representable in this crate.
    #[error("out of range integer value")]
    OutOfRangeIntegerValue,
    /// Unexpected CBOR item encountered (got, want).
    #[error("got {0}, expected {1}")]
    UnexpectedItem(&'static str, &'static str),
    /// Unrecognized value in neither IANA-controlled range nor private range.
    #[error("expected value in IANA or private use range")]
    UnregisteredIanaNonPrivateValue,
}

/// Crate-specific Result type
pub type Result<T, E = CoseError> = core::result::Result<T, E>;

impl<T> core::convert::From<cbor::de::Error<T>> for CoseError {
    fn from(e: cbor::de::Error<T>) -> Self {
        // Make sure we use our [`EndOfFile`] marker.
        use cbor::de::Error::{Io, RecursionLimitExceeded, Semantic, Syntax};
        let e = match e {
            Io(_) => Io(EndOfFile),
            Syntax(x) => Syntax(x),
            Semantic(a, b) => Semantic(a, b),
            RecursionLimitExceeded => RecursionLimitExceeded,
        };
        CoseError::DecodeFailed(e)
    }
}

impl<T> core::convert::From<cbor::ser::Error<T>> for CoseError {
    fn from(_e: cbor::ser::Error<T>) -> Self {
        CoseError::EncodeFailed
    }
}

impl core::convert::From<core::num::TryFromIntError> for CoseError {
    fn from(_: core::num::TryFromIntError) -> Self {
        CoseError::OutOfRangeIntegerValue
    }
}

/// Which of the three transported inputs of a signing request an error refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputField {
    Payload,
    ProtectedHeader,
    UnprotectedHeader,
}

impl core::fmt::Display for InputField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InputField::Payload => write!(f, "payload"),
            InputField::ProtectedHeader => write!(f, "protected header"),
            InputField::UnprotectedHeader => write!(f, "unprotected header"),
        }
    }
}

/// Error type for a failed signing request.
///
/// Exactly one of these is produced per failed request, for the first problem encountered.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    /// Input was not valid Base64URL.
    #[error("invalid base64url in {field}: {source}")]
    Decode {
        field: InputField,
        #[source]
        source: base64::DecodeError,
    },
    /// Header bytes were not a single well-formed CBOR header map.
    #[error("malformed CBOR in {field}: {source}")]
    CborParse {
        field: InputField,
        #[source]
        source: CoseError,
    },
    /// Neither header carries a key identifier.
    #[error("no key identifier in protected or unprotected header")]
    MissingKeyIdentifier,
    /// The key identifier is not known to the key store.
    #[error("unknown key identifier {0}")]
    UnknownKeyIdentifier(KeyId),
    /// The protected header names an algorithm that cannot be used with the resolved key.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// The cryptographic operation (or final encoding) failed.
    #[error("signing failed: {0}")]
    SigningFailure(String),
}

impl SignError {
    /// Stable error code for the transport layer.
    pub fn code(&self) -> &'static str {
        match self {
            SignError::Decode { .. } => "DECODE_ERROR",
            SignError::CborParse { .. } => "CBOR_PARSE_ERROR",
            SignError::MissingKeyIdentifier => "MISSING_KEY_IDENTIFIER",
            SignError::UnknownKeyIdentifier(_) => "UNKNOWN_KEY_IDENTIFIER",
            SignError::UnsupportedAlgorithm(_) => "UNSUPPORTED_ALGORITHM",
            SignError::SigningFailure(_) => "SIGNING_FAILED",
        }
    }
}

/// Encoding failures while building or emitting a message end the signing operation.
impl From<CoseError> for SignError {
    fn from(e: CoseError) -> Self {
        SignError::SigningFailure(e.to_string())
    }
}

/// Read a CBOR [`Value`] from a byte slice, failing if any extra data remains after the `Value` has
/// been read.
fn read_to_value(mut slice: &[u8]) -> Result<Value> {
    let value = cbor::de::from_reader(&mut slice)?;
    if slice.is_empty() {
        Ok(value)
    } else {
        Err(CoseError::ExtraneousData)
    }
}

/// Trait for types that can be converted to/from a [`Value`].
pub trait AsCborValue: Sized {
    /// Convert a [`Value`] into an instance of the type.
    fn from_cbor_value(value: Value) -> Result<Self>;
    /// Convert the object into a [`Value`], consuming it along the way.
    fn to_cbor_value(self) -> Result<Value>;
}

/// Extension trait that adds serialization/deserialization methods.
pub trait CborSerializable: AsCborValue {
    /// Create an object instance from serialized CBOR data in a slice.  This method will fail (with
    /// `CoseError::ExtraneousData`) if there is additional CBOR data after the object.
    fn from_slice(slice: &[u8]) -> Result<Self> {
        Self::from_cbor_value(read_to_value(slice)?)
    }

    /// Serialize this object to a vector, consuming it along the way.
    fn to_vec(self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        cbor::ser::into_writer(&self.to_cbor_value()?, &mut data)?;
        Ok(data)
    }
}

/// Extension trait that adds tagged serialization/deserialization methods.
pub trait TaggedCborSerializable: AsCborValue {
    /// The associated tag value.
    const TAG: u64;

    /// Create an object instance from serialized CBOR data in a slice, expecting an initial
    /// tag value.
    fn from_tagged_slice(slice: &[u8]) -> Result<Self> {
        let (t, v) = read_to_value(slice)?.try_as_tag()?;
        if t != Self::TAG {
            return Err(CoseError::UnexpectedItem("tag", "other tag"));
        }
        Self::from_cbor_value(*v)
    }

    /// Serialize this object to a vector, including initial tag, consuming the object along the
    /// way.
    fn to_tagged_vec(self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        cbor::ser::into_writer(
            &Value::Tag(Self::TAG, Box::new(self.to_cbor_value()?)),
            &mut data,
        )?;
        Ok(data)
    }
}

/// Trivial implementation of [`AsCborValue`] for [`Value`].
impl AsCborValue for Value {
    fn from_cbor_value(value: Value) -> Result<Self> {
        Ok(value)
    }
    fn to_cbor_value(self) -> Result<Value> {
        Ok(self)
    }
}

impl CborSerializable for Value {}

/// Algorithm identifier.
pub type Algorithm = RegisteredLabelWithPrivate<iana::Algorithm>;

/// A COSE label may be either a signed integer value or a string.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Label {
    Int(i64),
    Text(String),
}

impl CborSerializable for Label {}

impl From<iana::HeaderParameter> for Label {
    fn from(param: iana::HeaderParameter) -> Self {
        Label::Int(param.to_i64())
    }
}

impl AsCborValue for Label {
    fn from_cbor_value(value: Value) -> Result<Self> {
        match value {
            Value::Integer(i) => Ok(Label::Int(i.try_into()?)),
            Value::Text(t) => Ok(Label::Text(t)),
            v => cbor_type_error(&v, "int/tstr"),
        }
    }
    fn to_cbor_value(self) -> Result<Value> {
        Ok(match self {
            Label::Int(i) => Value::from(i),
            Label::Text(t) => Value::Text(t),
        })
    }
}

/// A COSE label which can be either a signed integer value or a string, and
/// where the allowed integer values are governed by IANA but include a private
/// use range.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RegisteredLabelWithPrivate<T: EnumI64 + WithPrivateRange> {
    PrivateUse(i64),
    Assigned(T),
    Text(String),
}

impl<T: EnumI64 + WithPrivateRange> From<T> for RegisteredLabelWithPrivate<T> {
    fn from(val: T) -> Self {
        Self::Assigned(val)
    }
}

impl<T: EnumI64 + WithPrivateRange> CborSerializable for RegisteredLabelWithPrivate<T> {}

impl<T: EnumI64 + WithPrivateRange> AsCborValue for RegisteredLabelWithPrivate<T> {
    fn from_cbor_value(value: Value) -> Result<Self> {
        match value {
            Value::Integer(i) => {
                let i = i.try_into()?;
                if let Some(a) = T::from_i64(i) {
                    Ok(RegisteredLabelWithPrivate::Assigned(a))
                } else if T::is_private(i) {
                    Ok(RegisteredLabelWithPrivate::PrivateUse(i))
                } else {
                    Err(CoseError::UnregisteredIanaNonPrivateValue)
                }
            }
            Value::Text(t) => Ok(RegisteredLabelWithPrivate::Text(t)),
            v => cbor_type_error(&v, "int/tstr"),
        }
    }
    fn to_cbor_value(self) -> Result<Value> {
        Ok(match self {
            RegisteredLabelWithPrivate::PrivateUse(i) => Value::from(i),
            RegisteredLabelWithPrivate::Assigned(i) => Value::from(i.to_i64()),
            RegisteredLabelWithPrivate::Text(t) => Value::Text(t),
        })
    }
}
