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

use rug::integer::IsPrime;
use rug::Integer;
use serde::{Deserialize, Serialize};

use crate::errors::CredentialError;
use crate::params::SystemParameters;
use crate::utils::random::{random_in_range, random_prime, random_qr};

/// Issuer public key `(N, S, Z, R[0..L])` together with its parameter set.
///
/// `R` holds one base per attribute slot; slot 0 binds the holder secret
/// key. Immutable, and freely shareable across threads for reading.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct IssuerPublicKey {
    pub N: Integer,
    pub S: Integer,
    pub Z: Integer,
    pub R: Vec<Integer>,
    pub params: SystemParameters,
}

impl IssuerPublicKey {
    pub fn new(
        N: Integer,
        S: Integer,
        Z: Integer,
        R: Vec<Integer>,
        params: SystemParameters,
    ) -> Self {
        Self { N, S, Z, R, params }
    }

    /// Number of attribute slots, including slot 0.
    pub fn num_attributes(&self) -> usize {
        self.R.len()
    }
}

/// Issuer secret key: the factorization of `N` into safe primes.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct IssuerSecretKey {
    pub p: Integer,
    pub q: Integer,
    pub p_prime: Integer,
    pub q_prime: Integer,
}

impl IssuerSecretKey {
    /// Order of the quadratic residue group, `p'q'`.
    pub(crate) fn group_order(&self) -> Integer {
        Integer::from(&self.p_prime * &self.q_prime)
    }
}

/// An issuer key pair.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct KeyPair {
    pub(crate) public: IssuerPublicKey,
    pub(crate) private: IssuerSecretKey,
}

impl KeyPair {
    /// Generates an issuer key pair with `num_attributes` bases.
    ///
    /// `N` is the product of two safe primes of `Ln / 2` bits; `S` is a
    /// random quadratic residue and `Z` and every `R[i]` are powers of `S`
    /// with exponents uniform in `[2, p'q')`.
    pub fn generate(
        params: SystemParameters,
        num_attributes: usize,
    ) -> Result<Self, CredentialError> {
        let n = params.Ln / 2;

        let mut p_prime = random_prime(n - 1)?;
        let mut p = Integer::from(2) * p_prime.clone() + Integer::from(1);
        loop {
            if p.is_probably_prime(50) != IsPrime::No {
                break;
            }
            p_prime = random_prime(n - 1)?;
            p = Integer::from(2) * p_prime.clone() + Integer::from(1);
        }

        let mut q_prime = random_prime(n - 1)?;
        let mut q = Integer::from(2) * q_prime.clone() + Integer::from(1);
        loop {
            if p != q && q.is_probably_prime(50) != IsPrime::No {
                break;
            }
            q_prime = random_prime(n - 1)?;
            q = Integer::from(2) * q_prime.clone() + Integer::from(1);
        }

        let N = Integer::from(&p * &q);
        let S = random_qr(&N)?;
        let order = Integer::from(&p_prime * &q_prime);
        let two = Integer::from(2);

        let x = random_in_range(&two, &order)?;
        let Z = Integer::from(S.pow_mod_ref(&x, &N).unwrap());

        let mut R = Vec::with_capacity(num_attributes);
        for _ in 0..num_attributes {
            let x_i = random_in_range(&two, &order)?;
            R.push(Integer::from(S.pow_mod_ref(&x_i, &N).unwrap()));
        }

        Ok(Self {
            public: IssuerPublicKey { N, S, Z, R, params },
            private: IssuerSecretKey {
                p,
                q,
                p_prime,
                q_prime,
            },
        })
    }

    /// Returns a reference to the public key.
    pub fn public_key(&self) -> &IssuerPublicKey {
        &self.public
    }

    /// Returns a reference to the private key.
    pub fn private_key(&self) -> &IssuerSecretKey {
        &self.private
    }

    /// Returns the couple `(sk, pk)`.
    pub fn into_parts(self) -> (IssuerSecretKey, IssuerPublicKey) {
        (self.private, self.public)
    }
}
