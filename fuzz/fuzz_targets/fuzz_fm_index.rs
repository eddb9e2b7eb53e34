#![no_main]

use arbitrary::Arbitrary;
use fmgrep::index::{FmIndex, IndexConfig};
use fmgrep::scan::{Kmp, Matcher};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    text: &'a [u8],
    pattern: &'a [u8],
    sentinel: u8,
    interval: u8,
}

fuzz_target!(|input: Input<'_>| {
    let config = IndexConfig {
        sentinel: input.sentinel,
        checkpoint_interval: input.interval.max(1) as usize,
        ..Default::default()
    };

    // Texts containing the sentinel are rejected, never indexed
    let Ok(index) = FmIndex::with_config(input.text, &config) else {
        return;
    };

    // Every input byte is content, so the index answers like a scan
    assert_eq!(index.text().content(), input.text);
    assert_eq!(index.search(input.pattern), Kmp.find_all(input.text, input.pattern));
    assert_eq!(index.reconstruct_text(), index.text().as_bytes());
});
