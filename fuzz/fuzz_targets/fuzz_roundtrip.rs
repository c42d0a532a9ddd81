#![no_main]
use libfuzzer_sys::fuzz_target;
use loder::*;

fuzz_target!(|data: &[u8]| {
    // If we can decode it, re-encoding with the byte range must reproduce the samples
    let limits = Limits {
        max_pixels: Some(1 << 20),
        ..Default::default()
    };
    let Ok(decoded) = DecodeRequest::new(data).with_limits(&limits).decode() else {
        return;
    };

    let Ok(reencoded) = EncodeRequest::new(&decoded)
        .with_range(SampleRange::BYTE)
        .encode()
    else {
        return;
    };
    let Ok(decoded2) = DecodeRequest::new(&reencoded.bytes).decode() else {
        panic!("re-encoded data failed to decode");
    };

    assert_eq!(decoded.samples, decoded2.samples, "roundtrip sample mismatch");
    assert_eq!(decoded.dim, decoded2.dim);
});
