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

use rug::Integer;
use serde::{Deserialize, Serialize};

use crate::errors::CredentialError;
use crate::keys::{IssuerPublicKey, IssuerSecretKey};
use crate::utils::random::random_bits;

/// A Camenisch-Lysyanskaya signature `(A, e, v)` on an attribute vector:
/// `A^e * S^v * prod R[i]^{m_i} = Z (mod N)`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CLSignature {
    pub A: Integer,
    pub e: Integer,
    pub v: Integer,
}

/// `prod bases[i]^{exponents[i]} mod modulus`.
pub(crate) fn represent_to_bases(
    bases: &[Integer],
    exponents: &[Integer],
    modulus: &Integer,
) -> Integer {
    let mut result = Integer::from(1);
    for (base, exponent) in bases.iter().zip(exponents) {
        result = (result * Integer::from(base.pow_mod_ref(exponent, modulus).unwrap())) % modulus;
    }
    result
}

impl CLSignature {
    /// Signs a complete attribute vector, one value per base starting at
    /// `R[0]`.
    pub fn sign(
        sk: &IssuerSecretKey,
        pk: &IssuerPublicKey,
        attributes: &[Integer],
    ) -> Result<Self, CredentialError> {
        let product = represent_to_bases(&pk.R, attributes, &pk.N);
        Self::sign_product(sk, pk, &product)
    }

    /// Signs a recipient commitment `U` times the attribute vector, which
    /// occupies the bases from `R[1]` up: slot 0 is hidden inside `U`.
    pub fn sign_with_commitment(
        sk: &IssuerSecretKey,
        pk: &IssuerPublicKey,
        commitment: &Integer,
        attributes: &[Integer],
    ) -> Result<Self, CredentialError> {
        let product =
            (represent_to_bases(&pk.R[1..], attributes, &pk.N) * commitment) % &pk.N;
        Self::sign_product(sk, pk, &product)
    }

    fn sign_product(
        sk: &IssuerSecretKey,
        pk: &IssuerPublicKey,
        product: &Integer,
    ) -> Result<Self, CredentialError> {
        let params = &pk.params;

        let v = (Integer::from(1) << (params.Lv - 1)) + random_bits(params.Lv - 1)?;

        // Q = Z / (S^v * product)
        let numerator =
            (Integer::from(pk.S.pow_mod_ref(&v, &pk.N).unwrap()) * product) % &pk.N;
        let q = (Integer::from(&pk.Z) * numerator.invert(&pk.N).unwrap()) % &pk.N;

        let order = sk.group_order();
        let start = Integer::from(1) << (params.Le - 1);
        let end = Integer::from(&start) + (Integer::from(1) << (params.LePrime - 1));
        let (e, d) = loop {
            let candidate = (Integer::from(&start) + random_bits(params.LePrime - 1)?).next_prime();
            if candidate > end {
                continue;
            }
            match candidate.clone().invert(&order) {
                Ok(inverse) => break (candidate, inverse),
                Err(_) => continue,
            }
        };

        let A = q.pow_mod(&d, &pk.N).unwrap();
        Ok(Self { A, e, v })
    }

    /// Verifies the CL equation and the size bound on `e`.
    pub fn verify(&self, pk: &IssuerPublicKey, attributes: &[Integer]) -> bool {
        let params = &pk.params;

        let start = Integer::from(1) << (params.Le - 1);
        let end = Integer::from(&start) + (Integer::from(1) << (params.LePrime - 1));
        if self.e < start || self.e > end {
            return false;
        }

        let ae = Integer::from(self.A.pow_mod_ref(&self.e, &pk.N).unwrap());
        let product = represent_to_bases(&pk.R, attributes, &pk.N);
        let sv = Integer::from(pk.S.pow_mod_ref(&self.v, &pk.N).unwrap());
        let q = (ae * product * sv) % &pk.N;

        pk.Z == q
    }

    /// Re-blinds `A` so that repeated showings of the same signature are
    /// unlinkable. The returned signature verifies on the same attributes;
    /// `self` is unchanged.
    pub fn randomize(&self, pk: &IssuerPublicKey) -> Result<Self, CredentialError> {
        let r = random_bits(pk.params.Lv - pk.params.Ln)?;
        let A = (Integer::from(&self.A) * Integer::from(pk.S.pow_mod_ref(&r, &pk.N).unwrap()))
            % &pk.N;
        let v = Integer::from(&self.v) - Integer::from(&self.e * &r);
        Ok(Self {
            A,
            e: self.e.clone(),
            v,
        })
    }
}
