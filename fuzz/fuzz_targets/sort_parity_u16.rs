#![no_main]

use libfuzzer_sys::fuzz_target;

use nanosort_fuzz::u8_as_x;

fuzz_target!(|data: &[u8]| {
    // Differential check: any byte buffer reinterpreted as u16 values must
    // sort to the same result a reference stable sort produces.
    let reference: Vec<u16> = u8_as_x::<u16>(data);

    let mut v = reference.clone();
    let mut reference = reference;

    nanosort::sort(&mut v);
    reference.sort();

    assert_eq!(v, reference);
});
