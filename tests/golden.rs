//! Golden file integration tests.
//!
//! Reads tests/testdata/fibonacci_golden.json and verifies every strategy
//! produces the reference values, both directly and through a device session.

use num_bigint::BigUint;
use serde::Deserialize;

use fibengine_core::{
    compute_fibonacci, render_decimal, result_capacity, CalculatorFactory, DefaultFactory, Limb,
    Strategy,
};
use fibengine_device::transfer::{decode_limbs, LIMB_BYTES};
use fibengine_device::{analyze_comparison_results, compare_strategies, FibDevice, SeekFrom};

// ---------------------------------------------------------------------------
// Golden data structures
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct GoldenData {
    #[allow(dead_code)]
    description: String,
    values: Vec<GoldenEntry>,
}

#[derive(Deserialize)]
struct GoldenEntry {
    n: u64,
    #[serde(default)]
    fib: Option<String>,
    #[serde(default)]
    fib_prefix: Option<String>,
    #[serde(default)]
    fib_suffix: Option<String>,
    #[serde(default)]
    fib_digits: Option<usize>,
    #[serde(default)]
    limbs: Option<usize>,
}

fn load_golden_data() -> GoldenData {
    let path = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/testdata/fibonacci_golden.json"
    );
    let data = std::fs::read_to_string(path).expect("failed to read golden file");
    serde_json::from_str(&data).expect("failed to parse golden JSON")
}

fn compute(strategy: Strategy, n: u64) -> Vec<Limb> {
    compute_fibonacci(n, strategy).unwrap()
}

fn to_biguint(limbs: &[Limb]) -> BigUint {
    BigUint::from_slice(
        &limbs
            .iter()
            .flat_map(|&l| [l as u32, (l >> 32) as u32])
            .collect::<Vec<_>>(),
    )
}

fn check_approximate(entry: &GoldenEntry, name: &str, limbs: &[Limb]) {
    let s = render_decimal(limbs);
    if let Some(prefix) = &entry.fib_prefix {
        assert!(
            s.starts_with(prefix.as_str()),
            "{name} prefix mismatch at n={}: expected starts_with '{prefix}', got '{}'",
            entry.n,
            &s[..prefix.len().min(s.len())],
        );
    }
    if let Some(suffix) = &entry.fib_suffix {
        assert!(
            s.ends_with(suffix.as_str()),
            "{name} suffix mismatch at n={}",
            entry.n
        );
    }
    if let Some(expected_digits) = entry.fib_digits {
        assert_eq!(
            s.len(),
            expected_digits,
            "{name} digit count mismatch at n={}",
            entry.n
        );
    }
    if let Some(expected_limbs) = entry.limbs {
        assert_eq!(limbs.len(), expected_limbs, "{name} limb count at n={}", entry.n);
    }
}

// ---------------------------------------------------------------------------
// Golden: exact values, every strategy
// ---------------------------------------------------------------------------

#[test]
fn golden_exact_all_strategies() {
    let data = load_golden_data();
    for strategy in Strategy::ALL {
        for entry in &data.values {
            if let Some(expected) = &entry.fib {
                let limbs = compute(strategy, entry.n);
                assert_eq!(
                    render_decimal(&limbs),
                    *expected,
                    "{strategy} mismatch at n={}",
                    entry.n,
                );
            }
        }
    }
}

#[test]
fn golden_exact_matches_biguint_parse() {
    let data = load_golden_data();
    for entry in &data.values {
        if let Some(expected) = &entry.fib {
            let expected = BigUint::parse_bytes(expected.as_bytes(), 10).unwrap();
            let limbs = compute(Strategy::Karatsuba, entry.n);
            assert_eq!(to_biguint(&limbs), expected, "n={}", entry.n);
        }
    }
}

// ---------------------------------------------------------------------------
// Golden: prefix, suffix and size (n up to 10000)
// ---------------------------------------------------------------------------

#[test]
fn golden_prefix_and_digits() {
    let data = load_golden_data();
    for entry in data.values.iter().filter(|e| e.fib.is_none() && e.n <= 10_000) {
        for strategy in Strategy::ALL {
            check_approximate(entry, strategy.name(), &compute(strategy, entry.n));
        }
    }
}

#[test]
fn golden_large_n_doubling() {
    let data = load_golden_data();
    for entry in data.values.iter().filter(|e| e.n == 100_000) {
        for strategy in [Strategy::FastDoubling, Strategy::Karatsuba] {
            check_approximate(entry, strategy.name(), &compute(strategy, entry.n));
        }
    }
}

#[test]
#[ignore = "slow in debug builds"]
fn golden_largest_index() {
    let data = load_golden_data();
    for entry in data.values.iter().filter(|e| e.n > 100_000) {
        for strategy in Strategy::ALL {
            check_approximate(entry, strategy.name(), &compute(strategy, entry.n));
        }
    }
}

// ---------------------------------------------------------------------------
// Golden: through the registry and the device
// ---------------------------------------------------------------------------

#[test]
fn golden_via_registry() {
    let factory = DefaultFactory::new();
    let data = load_golden_data();
    for name in ["iterative", "fast", "fastdoubling", "karatsuba"] {
        let calc = factory.get_by_name(name).unwrap();
        for entry in &data.values {
            if let Some(expected) = &entry.fib {
                let limbs = calc.calculate(entry.n).unwrap();
                assert_eq!(render_decimal(&limbs), *expected, "{name} at n={}", entry.n);
            }
        }
    }
}

#[test]
fn golden_via_device_session() {
    let device = FibDevice::default();
    let mut session = device.open().unwrap();
    let data = load_golden_data();
    for strategy in Strategy::ALL {
        session.set_strategy(strategy);
        for entry in data.values.iter().filter(|e| e.n <= 10_000) {
            assert_eq!(session.seek(SeekFrom::Start(entry.n)), entry.n);
            let mut buf = vec![0u8; result_capacity(entry.n).unwrap() * LIMB_BYTES];
            let response = session.read_bytes(&mut buf).unwrap();
            assert_eq!(response.index, entry.n);
            assert_eq!(response.strategy, strategy);
            let limbs = decode_limbs(&buf[..response.limbs * LIMB_BYTES]);
            match &entry.fib {
                Some(expected) => assert_eq!(render_decimal(&limbs), *expected),
                None => check_approximate(entry, strategy.name(), &limbs),
            }
        }
    }
}

#[test]
fn golden_comparison_agrees() {
    let device = FibDevice::default();
    let mut session = device.open().unwrap();
    for n in [0, 1, 93, 94, 187, 1000, 5000] {
        session.seek(SeekFrom::Start(n));
        let mut out = vec![0; result_capacity(n).unwrap()];
        let results = compare_strategies(&mut session, &Strategy::ALL, &mut out);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.outcome.is_ok()), "n={n}");
        analyze_comparison_results(&results).unwrap();
    }
}

// ---------------------------------------------------------------------------
// Edge cases: boundary values
// ---------------------------------------------------------------------------

#[test]
fn edge_case_small_indices() {
    for strategy in Strategy::ALL {
        assert_eq!(compute(strategy, 0), vec![0], "{strategy} F(0)");
        assert_eq!(compute(strategy, 1), vec![1], "{strategy} F(1)");
        assert_eq!(compute(strategy, 2), vec![1], "{strategy} F(2)");
    }
}

#[test]
fn edge_case_limb_boundaries() {
    // F(93) is the largest value in one limb, F(94) the first needing two,
    // and F(187) the first needing three.
    for strategy in Strategy::ALL {
        assert_eq!(compute(strategy, 93), vec![12_200_160_415_121_876_738]);
        assert_eq!(compute(strategy, 94).len(), 2);
        assert_eq!(compute(strategy, 186).len(), 2);
        assert_eq!(compute(strategy, 187).len(), 3);
    }
}

#[test]
fn result_capacity_covers_results() {
    for n in (0..5_000).step_by(37) {
        let limbs = compute(Strategy::FastDoubling, n);
        assert!(limbs.len() <= result_capacity(n).unwrap(), "n={n}");
        assert!(*limbs.last().unwrap() != 0 || limbs == [0], "n={n} not normalized");
    }
}

// ---------------------------------------------------------------------------
// Cross-strategy agreement
// ---------------------------------------------------------------------------

#[test]
fn all_strategies_agree_medium_values() {
    for n in [94, 100, 200, 300, 500, 1000, 2000, 5000, 8191, 8192] {
        let iterative = compute(Strategy::Iterative, n);
        let fast = compute(Strategy::FastDoubling, n);
        let karatsuba = compute(Strategy::Karatsuba, n);
        assert_eq!(iterative, fast, "Iterative != FastDoubling at n={n}");
        assert_eq!(fast, karatsuba, "FastDoubling != Karatsuba at n={n}");
    }
}

#[test]
fn addition_identity_holds() {
    for n in [2, 50, 93, 94, 1000, 4097] {
        let a = to_biguint(&compute(Strategy::Karatsuba, n - 2));
        let b = to_biguint(&compute(Strategy::FastDoubling, n - 1));
        let c = to_biguint(&compute(Strategy::Iterative, n));
        assert_eq!(a + b, c, "F(n-2) + F(n-1) != F(n) at n={n}");
    }
}
