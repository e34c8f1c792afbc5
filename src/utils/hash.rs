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

use std::cmp::Ordering;

use digest::Digest;
use rug::{integer::Order, Integer};
use sha2::Sha256;

/// Encodes an integer as two's-complement big-endian bytes of minimal width.
///
/// Prover and verifier must agree on this encoding bit for bit; any
/// disagreement silently breaks challenge reconstruction.
pub(crate) fn integer_to_bytes(value: &Integer) -> Vec<u8> {
    match value.cmp0() {
        Ordering::Equal => vec![0u8],
        Ordering::Greater => {
            let mut bytes = value.to_digits::<u8>(Order::MsfBe);
            if bytes[0] & 0x80 != 0 {
                bytes.insert(0, 0);
            }
            bytes
        }
        Ordering::Less => {
            // width bytes leave room for the sign bit
            let width = value.significant_bits() / 8 + 1;
            let complement = (Integer::from(1) << (8 * width)) + value;
            let mut bytes = complement.to_digits::<u8>(Order::MsfBe);
            while bytes.len() < width as usize {
                bytes.insert(0, 0xff);
            }
            bytes
        }
    }
}

/// Hashes a sequence of integers into a challenge.
///
/// Each element is fed to SHA-256 as a 4-byte big-endian length followed by
/// its two's-complement big-endian bytes; the digest is read as a
/// non-negative integer.
pub fn hash_commit(values: &[&Integer]) -> Integer {
    let mut hasher = Sha256::new();
    for value in values {
        let bytes = integer_to_bytes(value);
        hasher.update((bytes.len() as u32).to_be_bytes());
        hasher.update(&bytes);
    }
    Integer::from_digits(hasher.finalize().as_slice(), Order::MsfBe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_is_minimal_twos_complement() {
        assert_eq!(integer_to_bytes(&Integer::from(0)), vec![0x00]);
        assert_eq!(integer_to_bytes(&Integer::from(1)), vec![0x01]);
        // a set high bit needs a sign byte
        assert_eq!(integer_to_bytes(&Integer::from(255)), vec![0x00, 0xff]);
        assert_eq!(integer_to_bytes(&Integer::from(-1)), vec![0xff]);
        assert_eq!(integer_to_bytes(&Integer::from(-256)), vec![0xff, 0x00]);
    }

    #[test]
    fn hash_commit_matches_reference_vector() {
        let one = Integer::from(1);
        let two = Integer::from(2);
        let expected = Integer::from_str_radix(
            "13bef33114afeba5cb85e83f14c024e5523c9835db10712f5c58e18aa0efd6f6",
            16,
        )
        .unwrap();
        assert_eq!(hash_commit(&[&one, &two]), expected);
    }

    #[test]
    fn hash_commit_is_order_sensitive() {
        let one = Integer::from(1);
        let two = Integer::from(2);
        assert_ne!(hash_commit(&[&one, &two]), hash_commit(&[&two, &one]));
    }
}
