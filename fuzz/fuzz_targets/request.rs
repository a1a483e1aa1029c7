#![no_main]
use cose_signer::{MemoryKeyStore, SignRequest, Signer, SigningAlgorithm};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (String, String, String)| {
    let store = MemoryKeyStore::builder()
        .generate("123", SigningAlgorithm::ES256)
        .build();
    let signer = Signer::new(&store);
    let _ = signer.sign(&SignRequest {
        payload: data.0,
        protected_header: data.1,
        unprotected_header: data.2,
    });
});
