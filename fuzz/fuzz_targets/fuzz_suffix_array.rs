#![no_main]

use fmgrep::index::suffix_array::sais;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let sa = sais(data, 256);
    assert_eq!(sa.len(), data.len());
    for pair in sa.windows(2) {
        assert!(data[pair[0]..] < data[pair[1]..]);
    }
});
