#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint::BigUint;

use fibengine_core::limbs::LimbBuffer;
use fibengine_core::strategy::{KaratsubaStrategy, Multiplier, SchoolbookStrategy};
use fibengine_core::Limb;

fn limbs_from(bytes: &[u8]) -> Vec<Limb> {
    bytes
        .chunks(8)
        .map(|c| {
            let mut word = [0u8; 8];
            word[..c.len()].copy_from_slice(c);
            u64::from_le_bytes(word)
        })
        .collect()
}

fn to_biguint(limbs: &[Limb]) -> BigUint {
    let bytes: Vec<u8> = limbs.iter().flat_map(|l| l.to_le_bytes()).collect();
    BigUint::from_bytes_le(&bytes)
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    // First byte splits the rest into two operands
    let split = usize::from(data[0]).min(data.len() - 1);
    let (x, y) = data[1..].split_at(split);
    let (x, y) = (limbs_from(x), limbs_from(y));
    let x_len = x.len().max(1);
    let y_len = y.len().max(1);
    let product_len = x_len + y_len;

    let x = LimbBuffer::from_limbs(&x, x_len).unwrap();
    let y = LimbBuffer::from_limbs(&y, y_len).unwrap();
    let mut school_out = LimbBuffer::allocate(product_len).unwrap();
    let mut kara_out = LimbBuffer::allocate(product_len).unwrap();

    let mut school = SchoolbookStrategy::with_capacity(product_len).unwrap();
    let mut kara = KaratsubaStrategy::with_capacity(x_len.max(y_len)).unwrap();
    school.multiply(&mut school_out, &x, &y).unwrap();
    kara.multiply(&mut kara_out, &x, &y).unwrap();

    assert_eq!(school_out, kara_out);
    assert_eq!(
        to_biguint(school_out.as_limbs()),
        to_biguint(x.as_limbs()) * to_biguint(y.as_limbs())
    );
});
