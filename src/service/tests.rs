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
    decode::{decode_b64url, encode_b64url},
    CborSerializable, CoseSign1, InputField, KeyId, MemoryKeyStore, SigningAlgorithm,
};
use serde_json::json;

fn service() -> SignService<MemoryKeyStore> {
    let store = MemoryKeyStore::builder()
        .generate("123", SigningAlgorithm::ES256)
        .build();
    SignService::new(Signer::new(store))
}

fn inner(protected_hex: &str) -> CoseSignInnerRequest {
    CoseSignInnerRequest {
        cose_payload: encode_b64url(b"hello"),
        application_id: Some("KERNEL".to_owned()),
        reference_id: Some("SIGN".to_owned()),
        cose_protected_header: encode_b64url(&hex::decode(protected_hex).unwrap()),
        cose_unprotected_header: encode_b64url(&[0xa0]),
    }
}

// {1: -7, 4: h'313233'}
const ES256_KID_123: &str = "a201260443313233";

#[test_log::test]
fn test_handle_success() {
    let service = service();
    let mut metadata = Metadata::new();
    metadata.insert("caller".to_owned(), json!({"n": [1, 2]}));
    let response = service.handle(CoseSignRequest {
        id: Some("req-1".to_owned()),
        version: Some("v1".to_owned()),
        requesttime: Some("2026-10-15T09:30:12.000Z".to_owned()),
        metadata: Some(metadata.clone()),
        request: Some(inner(ES256_KID_123)),
    });

    assert_eq!(response.id.as_deref(), Some("req-1"));
    assert_eq!(response.version.as_deref(), Some("v1"));
    assert_eq!(response.metadata, Some(metadata));
    assert!(chrono::DateTime::parse_from_rfc3339(&response.responsetime).is_ok());
    assert_eq!(response.errors, None);

    let body = response.response.unwrap();
    let data = decode_b64url(InputField::Payload, &body.cose_signed_data).unwrap();
    let sign1 = CoseSign1::from_slice(&data).unwrap();
    let vk = service
        .signer()
        .store()
        .public_key(&KeyId::from("123"))
        .unwrap();
    sign1
        .verify_signature(b"", |sig, data| vk.verify(data, sig))
        .unwrap();
}

#[test]
fn test_handle_errors() {
    let service = service();
    let tests = vec![
        (inner("a0"), "MISSING_KEY_IDENTIFIER"),
        (inner("a201260443393939"), "UNKNOWN_KEY_IDENTIFIER"),
        (inner("a201270443313233"), "UNSUPPORTED_ALGORITHM"),
        (inner("a20126"), "CBOR_PARSE_ERROR"),
        (
            CoseSignInnerRequest {
                cose_payload: "!".to_owned(),
                ..inner(ES256_KID_123)
            },
            "DECODE_ERROR",
        ),
    ];
    for (inner, code) in tests {
        let response = service.handle(CoseSignRequest {
            id: Some("req-2".to_owned()),
            request: Some(inner),
            ..Default::default()
        });
        assert_eq!(response.id.as_deref(), Some("req-2"));
        assert_eq!(response.response, None);
        let errors = response.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_code, code);
        assert!(!errors[0].message.is_empty());
    }
}

#[test]
fn test_handle_missing_body() {
    let response = service().handle(CoseSignRequest::default());
    assert_eq!(response.response, None);
    assert_eq!(
        response.errors,
        Some(vec![ServiceError {
            error_code: INVALID_REQUEST.to_owned(),
            message: "missing request body".to_owned(),
        }])
    );
}

#[test]
fn test_handle_json() {
    let service = service();
    let body = json!({
        "id": "req-3",
        "version": "v1",
        "requesttime": "2026-10-15T09:30:12.000Z",
        "metadata": {"k": "v"},
        "request": {
            "cosePayload": "aGVsbG8",
            "applicationId": "KERNEL",
            "referenceId": "SIGN",
            "coseProtectedHeader": "ogEmBEMxMjM",
            "coseUnprotectedHeader": "oA"
        }
    });
    let out = service.handle_json(&body.to_string()).unwrap();
    let out: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(out["id"], "req-3");
    assert_eq!(out["version"], "v1");
    assert_eq!(out["metadata"], json!({"k": "v"}));
    assert!(out["errors"].is_null());
    assert!(out["responsetime"].is_string());
    let signed = out["response"]["coseSignedData"].as_str().unwrap();
    assert!(out["response"]["timestamp"].is_string());

    let data = decode_b64url(InputField::Payload, signed).unwrap();
    let sign1 = CoseSign1::from_slice(&data).unwrap();
    assert_eq!(sign1.payload, Some(b"hello".to_vec()));
}

#[test]
fn test_handle_json_error_fields() {
    let service = service();
    let body = json!({
        "id": "req-4",
        "request": {
            "cosePayload": "aGVsbG8",
            "coseProtectedHeader": "oA",
            "coseUnprotectedHeader": "oA"
        }
    });
    let out = service.handle_json(&body.to_string()).unwrap();
    let out: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(out["id"], "req-4");
    assert!(out["response"].is_null());
    assert_eq!(out["errors"][0]["errorCode"], "MISSING_KEY_IDENTIFIER");
    assert!(out["errors"][0]["message"].is_string());
}

#[test]
fn test_handle_json_malformed() {
    let service = service();
    let tests = [
        "",
        "{",
        "[1, 2]",
        r#"{"request": {"cosePayload": 7}}"#,
        r#"{"request": {"coseProtectedHeader": "oA", "coseUnprotectedHeader": "oA"}}"#,
        r#"{"request": {"cosePayload": "aGVsbG8", "coseUnprotectedHeader": "oA"}}"#,
        r#"{"request": {"cosePayload": "aGVsbG8", "coseProtectedHeader": "oA"}}"#,
    ];
    for body in tests {
        let out = service.handle_json(body).unwrap();
        let out: CoseSignResponse = serde_json::from_str(&out).unwrap();
        assert_eq!(out.id, None);
        assert_eq!(out.response, None);
        let errors = out.errors.unwrap();
        assert_eq!(errors[0].error_code, INVALID_REQUEST, "for {:?}", body);
    }

    let no_payload = r#"{"request": {"coseProtectedHeader": "oA", "coseUnprotectedHeader": "oA"}}"#;
    let out = service.handle_json(no_payload).unwrap();
    assert!(out.contains("missing field `cosePayload`"), "{}", out);
}

#[test]
fn test_handle_json_empty_payload() {
    // A present but empty payload is signed.
    let service = service();
    let body = json!({
        "request": {
            "cosePayload": "",
            "coseProtectedHeader": "ogEmBEMxMjM",
            "coseUnprotectedHeader": "oA"
        }
    });
    let out = service.handle_json(&body.to_string()).unwrap();
    let out: CoseSignResponse = serde_json::from_str(&out).unwrap();
    let body = out.response.unwrap();
    let data = decode_b64url(InputField::Payload, &body.cose_signed_data).unwrap();
    let sign1 = CoseSign1::from_slice(&data).unwrap();
    assert_eq!(sign1.payload, Some(vec![]));
}
