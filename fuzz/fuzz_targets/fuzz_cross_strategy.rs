#![no_main]

use libfuzzer_sys::fuzz_target;

use fibengine_core::{compute_fibonacci, render_decimal, result_capacity, Strategy};

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    // First 4 bytes pick n, capped at 10000 so the iterative strategy stays fast
    let n = u64::from(u32::from_le_bytes([data[0], data[1], data[2], data[3]])) % 10_000;

    let iterative = compute_fibonacci(n, Strategy::Iterative).unwrap();
    let fast = compute_fibonacci(n, Strategy::FastDoubling).unwrap();
    let karatsuba = compute_fibonacci(n, Strategy::Karatsuba).unwrap();

    assert_eq!(iterative, fast, "Iterative != FastDoubling at n={n}");
    assert_eq!(fast, karatsuba, "FastDoubling != Karatsuba at n={n}");
    assert!(fast.len() <= result_capacity(n).unwrap());
    assert!(*fast.last().unwrap() != 0 || fast == [0]);

    let decimal = render_decimal(&fast);
    assert!(decimal == "0" || !decimal.starts_with('0'));
});
