// Copyright 2025 Fondazione LINKS

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

//     http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use rand::RngCore;
use rug::{integer::Order, Integer};

use crate::errors::CredentialError;

/// Samples a uniform integer in `[0, 2^n)` from the thread-local CSPRNG.
pub fn random_bits(n: u32) -> Result<Integer, CredentialError> {
    let mut bytes = vec![0u8; ((n + 7) / 8) as usize];
    rand::thread_rng()
        .try_fill_bytes(&mut bytes)
        .map_err(|_| CredentialError::RngFailure)?;
    let mut number = Integer::from_digits(&bytes, Order::MsfBe);
    number.keep_bits_mut(n);
    Ok(number)
}

/// Samples a uniform integer in `[0, bound)` by rejection.
pub fn random_below(bound: &Integer) -> Result<Integer, CredentialError> {
    let bits = bound.significant_bits();
    loop {
        let candidate = random_bits(bits)?;
        if &candidate < bound {
            return Ok(candidate);
        }
    }
}

/// Samples a uniform integer in `[low, high)`.
pub fn random_in_range(low: &Integer, high: &Integer) -> Result<Integer, CredentialError> {
    let range = Integer::from(high - low);
    Ok(low + random_below(&range)?)
}

/// Returns the first prime at or above a random integer of exactly `n` bits.
pub fn random_prime(n: u32) -> Result<Integer, CredentialError> {
    let mut candidate = random_bits(n)?;
    candidate.set_bit(n - 1, true);
    Ok(candidate.next_prime())
}

/// Samples a random quadratic residue modulo `n` that generates a nontrivial
/// subgroup.
pub fn random_qr(n: &Integer) -> Result<Integer, CredentialError> {
    loop {
        let qr = random_below(n)?.pow_mod(&Integer::from(2), n).unwrap();
        if qr > 1u32 && Integer::from(qr.gcd_ref(n)) == 1u32 {
            return Ok(qr);
        }
    }
}

/// Fresh nonce for one proof session.
pub fn generate_nonce() -> Result<Integer, CredentialError> {
    random_bits(128)
}
