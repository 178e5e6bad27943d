//! Classical number theory used alongside the quantum circuits.
//!
//! Everything here is a pure function; no state is touched.

/// Greatest common divisor (Euclid).
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Check whether `a` and `b` share no factor other than 1.
pub fn is_coprime(a: u64, b: u64) -> bool {
    gcd(a, b) == 1
}

/// `(a · b) mod modulus` without intermediate overflow.
#[inline]
pub fn mul_mod(a: u64, b: u64, modulus: u64) -> u64 {
    ((u128::from(a) * u128::from(b)) % u128::from(modulus)) as u64
}

/// `base^exponent mod modulus` by square-and-multiply.
///
/// Returns 0 when `modulus == 1` and panics on `modulus == 0`.
pub fn mod_pow(base: u64, mut exponent: u64, modulus: u64) -> u64 {
    let mut result = 1 % modulus;
    let mut square = base % modulus;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = mul_mod(result, square, modulus);
        }
        square = mul_mod(square, square, modulus);
        exponent >>= 1;
    }
    result
}

/// `[base^(2^0), base^(2^1), …, base^(2^(count-1))] mod modulus`, computed by
/// repeated squaring.
///
/// Panics on `modulus == 0`, like [`mod_pow`].
pub fn squared_powers(base: u64, modulus: u64, count: usize) -> Vec<u64> {
    let mut powers = Vec::with_capacity(count);
    let mut current = base % modulus;
    for _ in 0..count {
        powers.push(current);
        current = mul_mod(current, current, modulus);
    }
    powers
}

/// Multiplicative inverse of `a` modulo `modulus`, if one exists.
pub fn mod_inverse(a: u64, modulus: u64) -> Option<u64> {
    if modulus == 0 {
        return None;
    }
    let (mut old_r, mut r) = (i128::from(a % modulus), i128::from(modulus));
    let (mut old_s, mut s) = (1i128, 0i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }
    if old_r != 1 {
        return None;
    }
    Some(old_s.rem_euclid(i128::from(modulus)) as u64)
}

/// Number of bits needed to hold every value in `[0, modulus)`, at least 1.
pub fn register_width(modulus: u64) -> usize {
    let max_value = modulus.saturating_sub(1);
    (u64::BITS - max_value.leading_zeros()).max(1) as usize
}
