#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Header-only and full decode must never panic
    let limits = loder::Limits {
        max_pixels: Some(1 << 22),
        ..Default::default()
    };
    let _ = loder::DecodeRequest::new(data).with_limits(&limits).inspect();
    let _ = loder::DecodeRequest::new(data).with_limits(&limits).decode();
    // Default budget only
    let _ = loder::DecodeRequest::new(data).decode();
});
