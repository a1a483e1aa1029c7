#![no_main]
use cose_signer::{CborSerializable, HeaderMap, ProtectedHeader};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = HeaderMap::from_slice(data);
    let _ = ProtectedHeader::from_wire_data(data.to_vec());
});
