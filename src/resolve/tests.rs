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

use super::*;
use crate::{
    cbor::value::Value, iana, util::expect_err, HeaderBuilder, Label, MemoryKeyStore,
    SigningAlgorithm,
};

fn kid_header(kid: &[u8]) -> HeaderMap {
    HeaderBuilder::new().key_id(kid.to_vec()).build()
}

#[test]
fn test_key_id_priority() {
    let empty = HeaderMap::default();
    let tests = vec![
        (kid_header(b"p"), kid_header(b"u"), Some((b"p", KeyIdSource::Protected))),
        (kid_header(b"p"), empty.clone(), Some((b"p", KeyIdSource::Protected))),
        (empty.clone(), kid_header(b"u"), Some((b"u", KeyIdSource::Unprotected))),
        (empty.clone(), empty.clone(), None),
        (
            HeaderBuilder::new()
                .algorithm(iana::Algorithm::ES256)
                .build(),
            kid_header(b"u"),
            Some((b"u", KeyIdSource::Unprotected)),
        ),
    ];
    for (protected, unprotected, want) in tests {
        let got = key_id(&protected, &unprotected).unwrap();
        let want = want.map(|(kid, source)| (KeyId::from(&kid[..]), source));
        assert_eq!(got, want);
    }
}

#[test]
fn test_key_id_wrong_type() {
    let text_kid = HeaderBuilder::new()
        .value(Label::Int(4), Value::Text("123".to_owned()))
        .build();

    // Only the header that supplies the kid is checked.
    let got = key_id(&kid_header(b"p"), &text_kid).unwrap();
    assert_eq!(got, Some((KeyId::from("p"), KeyIdSource::Protected)));

    let result = key_id(&text_kid, &kid_header(b"u"));
    assert_eq!(result.as_ref().map_err(SignError::code), Err("CBOR_PARSE_ERROR"));
    expect_err(result, "in protected header: got tstr, expected bstr");

    let result = key_id(&HeaderMap::default(), &text_kid);
    assert_eq!(result.as_ref().map_err(SignError::code), Err("CBOR_PARSE_ERROR"));
    expect_err(result, "in unprotected header: got tstr, expected bstr");

    let empty_kid = HeaderBuilder::new().key_id(vec![]).build();
    expect_err(
        key_id(&empty_kid, &HeaderMap::default()),
        "in protected header: got empty bstr, expected non-empty bstr",
    );
}

#[test]
fn test_resolve_key() {
    let store = MemoryKeyStore::builder()
        .generate("123", SigningAlgorithm::ES256)
        .generate("456", SigningAlgorithm::ES384)
        .build();

    let got = resolve_key(&store, &kid_header(b"123"), &kid_header(b"456")).unwrap();
    assert_eq!(got.kid, KeyId::from("123"));
    assert_eq!(got.source, KeyIdSource::Protected);
    assert_eq!(got.key.algorithm(), SigningAlgorithm::ES256);

    let got = resolve_key(&store, &HeaderMap::default(), &kid_header(b"456")).unwrap();
    assert_eq!(got.kid, KeyId::from("456"));
    assert_eq!(got.source, KeyIdSource::Unprotected);
    assert_eq!(got.key.algorithm(), SigningAlgorithm::ES384);
}

#[test]
fn test_resolve_key_fail() {
    let store = MemoryKeyStore::builder()
        .generate("123", SigningAlgorithm::ES256)
        .build();

    let result = resolve_key(&store, &HeaderMap::default(), &HeaderMap::default());
    assert!(matches!(result, Err(SignError::MissingKeyIdentifier)));

    // The protected kid wins even when only the unprotected one is known.
    let result = resolve_key(&store, &kid_header(b"999"), &kid_header(b"123"));
    match result {
        Err(SignError::UnknownKeyIdentifier(kid)) => assert_eq!(kid, KeyId::from("999")),
        other => panic!("unexpected result {:?}", other),
    }

    let empty = MemoryKeyStore::default();
    expect_err(
        resolve_key(&empty, &kid_header(b"123"), &HeaderMap::default()),
        "unknown key identifier \"123\"",
    );
}

#[test]
fn test_resolve_key_dyn_store() {
    let store: Box<dyn KeyStore> = Box::new(
        MemoryKeyStore::builder()
            .generate("123", SigningAlgorithm::ES512)
            .build(),
    );
    let got = resolve_key(store.as_ref(), &kid_header(b"123"), &HeaderMap::default()).unwrap();
    assert_eq!(got.key.algorithm(), SigningAlgorithm::ES512);
}
