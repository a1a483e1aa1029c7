#![no_main]
use cose_signer::{CborSerializable, CoseSign1, TaggedCborSerializable};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = CoseSign1::from_slice(data);
    let _ = CoseSign1::from_tagged_slice(data);
});
