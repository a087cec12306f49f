//! Fuzz target: `CredentialDecoder::feed`
//!
//! Drives arbitrary byte sequences into the streaming credential decoder
//! and checks that every decoded credential is exactly the five bytes that
//! followed a START, and that chunked and byte-wise feeding agree.
//!
//! cargo fuzz run fuzz_credential_decoder

#![no_main]

use doorlock::protocol::{CREDENTIAL_LEN, CredentialDecoder, START};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut chunked = CredentialDecoder::new();
    let mut by_byte = CredentialDecoder::new();
    let mut rest = data;

    while let Some((credential, used)) = chunked.feed(rest) {
        assert!(used >= CREDENTIAL_LEN + 1 && used <= rest.len());
        let frame = &rest[used - CREDENTIAL_LEN - 1..used];
        assert_eq!(frame[0], START, "payload must follow a START byte");
        assert_eq!(credential.as_bytes(), &frame[1..]);

        let mut from_bytes = None;
        for &b in &rest[..used] {
            from_bytes = by_byte.feed_byte(b).or(from_bytes);
        }
        assert_eq!(from_bytes, Some(credential));
        rest = &rest[used..];
    }

    // Whatever is left never completes a frame.
    for &b in rest {
        assert!(by_byte.feed_byte(b).is_none());
    }

    chunked.reset();
    assert!(!chunked.in_frame());
});
