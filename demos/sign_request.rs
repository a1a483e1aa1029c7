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

//! Example program signing a JSON request envelope and checking the result.
use cose_signer::{
    decode_b64url, iana, service::SignService, CborSerializable, CoseSign1, HeaderBuilder,
    InputField, KeyError, KeyId, MemoryKeyStore, Signer, SignerConfig, SigningAlgorithm,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Key store with one freshly generated P-256 key.
    let store = MemoryKeyStore::builder()
        .generate("123", SigningAlgorithm::ES256)
        .build();
    let kid = KeyId::from("123");
    if let Some(vk) = store.public_key(&kid) {
        println!("public key for {}:\n{}", kid, vk.coordinates());
    }

    let config = SignerConfig::from_json(r#"{"timestamp_precision": "seconds"}"#)?;
    let service = SignService::new(Signer::with_config(&store, config));

    // Protected header {1: -7, 4: h'313233'}, empty unprotected header.
    let protected = HeaderBuilder::new()
        .algorithm(iana::Algorithm::ES256)
        .key_id(kid.as_bytes().to_vec())
        .build()
        .to_vec()?;
    let body = serde_json::json!({
        "id": "demo",
        "version": "1.0",
        "requesttime": "2026-10-15T09:30:12.000Z",
        "metadata": {},
        "request": {
            "cosePayload": cose_signer::encode_b64url(b"hello"),
            "applicationId": "DEMO",
            "referenceId": "1",
            "coseProtectedHeader": cose_signer::encode_b64url(&protected),
            "coseUnprotectedHeader": cose_signer::encode_b64url(&[0xa0]),
        }
    });
    let response = service.handle_json(&body.to_string())?;
    println!("{}", response);

    // Verify the result the way a relying party would.
    let response: serde_json::Value = serde_json::from_str(&response)?;
    let signed = response["response"]["coseSignedData"]
        .as_str()
        .ok_or("no signed data in response")?;
    let sign1 = CoseSign1::from_slice(&decode_b64url(InputField::Payload, signed)?)?;
    let vk = store.public_key(&kid).ok_or("key vanished")?;
    let result: Result<(), KeyError> =
        sign1.verify_signature(b"", |sig, data| vk.verify(data, sig));
    println!("Signature verified: {:?}.", result);
    Ok(result?)
}
