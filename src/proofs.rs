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

use std::collections::BTreeMap;

use rug::Integer;
use serde::{Deserialize, Serialize};

use crate::errors::CredentialError;
use crate::keys::IssuerPublicKey;
use crate::params::SystemParameters;
use crate::signature::CLSignature;
use crate::utils::hash::hash_commit;
use crate::utils::random::random_bits;

/// Creates a challenge by sandwiching the commitment contributions between
/// the context and the nonce.
pub fn create_challenge(context: &Integer, nonce: &Integer, contributions: &[Integer]) -> Integer {
    let mut input: Vec<&Integer> = Vec::with_capacity(2 + contributions.len());
    input.push(context);
    input.extend(contributions.iter());
    input.push(nonce);
    hash_commit(&input)
}

/// State held to build one proof of a bound proof list.
///
/// A builder is single-use: exactly one `commit` followed by exactly one
/// `create_proof`. Reuse yields undefined output.
pub trait ProofBuilder {
    /// Records the shared secret-key randomizer and returns this builder's
    /// contribution to the Fiat-Shamir challenge.
    fn commit(&mut self, sk_randomizer: &Integer) -> Result<Vec<Integer>, CredentialError>;

    /// Finalizes the proof under the given challenge.
    fn create_proof(&self, challenge: &Integer) -> Proof;
}

/// Proof of correctness of the commitment `U = S^{v'} * R[0]^s (mod N)` sent
/// in the first phase of issuance.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ProofU {
    pub u: Integer,
    pub c: Integer,
    pub v_prime_response: Integer,
    pub s_response: Integer,
}

impl ProofU {
    /// Verifies the proof against the given public key, context and nonce.
    pub fn verify(&self, pk: &IssuerPublicKey, context: &Integer, nonce: &Integer) -> bool {
        self.verify_with_challenge(
            pk,
            &create_challenge(context, nonce, &self.challenge_contribution(pk)),
        )
    }

    fn correct_response_sizes(&self, pk: &IssuerPublicKey) -> bool {
        // u must be a unit modulo N, otherwise it cannot come from an
        // honest commitment and its reconstruction is meaningless
        if Integer::from(self.u.gcd_ref(&pk.N)) != 1u32 {
            return false;
        }

        let maximum = (Integer::from(1) << (pk.params.LvPrimeCommit + 1)) - 1u32;
        let minimum = Integer::from(-&maximum);
        self.v_prime_response >= minimum && self.v_prime_response <= maximum
    }

    /// Verifies the proof against a challenge reconstructed by the caller.
    pub fn verify_with_challenge(
        &self,
        pk: &IssuerPublicKey,
        reconstructed_challenge: &Integer,
    ) -> bool {
        let valid = self.correct_response_sizes(pk) && self.c == *reconstructed_challenge;
        if !valid {
            log::debug!("ProofU verification failed");
        }
        valid
    }

    // U_commit = U^{-c} * S^{vPrimeResponse} * R_0^{sResponse}
    fn reconstruct_u_commit(&self, pk: &IssuerPublicKey) -> Integer {
        // a non-invertible u is rejected by the size checks; yield a dummy
        // value here rather than panicking on hostile input
        let uc = match self.u.pow_mod_ref(&Integer::from(-&self.c), &pk.N) {
            Some(power) => Integer::from(power),
            None => return Integer::from(0),
        };
        let sv = Integer::from(pk.S.pow_mod_ref(&self.v_prime_response, &pk.N).unwrap());
        let r0s = Integer::from(pk.R[0].pow_mod_ref(&self.s_response, &pk.N).unwrap());
        (uc * sv * r0s) % &pk.N
    }

    /// The response tied to the holder secret key.
    pub fn secret_key_response(&self) -> &Integer {
        &self.s_response
    }

    /// The challenge recorded in the proof.
    pub fn challenge(&self) -> &Integer {
        &self.c
    }

    /// The contribution of this proof to the transcript hash.
    pub fn challenge_contribution(&self, pk: &IssuerPublicKey) -> Vec<Integer> {
        vec![self.u.clone(), self.reconstruct_u_commit(pk)]
    }
}

/// The issuer's proof that a partial CL signature was computed with the
/// exponent inverse only the issuer knows.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ProofS {
    pub c: Integer,
    pub e_response: Integer,
}

impl ProofS {
    /// Verifies the proof against the signature it was created for.
    pub fn verify(
        &self,
        pk: &IssuerPublicKey,
        signature: &CLSignature,
        context: &Integer,
        nonce: &Integer,
    ) -> bool {
        // ACommit = A^{c + eResponse * e}
        let exponent = Integer::from(&self.e_response * &signature.e) + &self.c;
        let a_commit = match signature.A.pow_mod_ref(&exponent, &pk.N) {
            Some(power) => Integer::from(power),
            None => return false,
        };

        let q = match signature.A.pow_mod_ref(&signature.e, &pk.N) {
            Some(power) => Integer::from(power),
            None => return false,
        };

        let c_prime = hash_commit(&[context, &q, &signature.A, nonce, &a_commit]);
        let valid = self.c == c_prime;
        if !valid {
            log::debug!("ProofS verification failed");
        }
        valid
    }

    /// The challenge recorded in the proof.
    pub fn challenge(&self) -> &Integer {
        &self.c
    }
}

/// A disclosure proof: proves possession of a CL signature on the attribute
/// vector while revealing only the selected attribute values.
///
/// The keys of `a_responses` and `a_disclosed` partition the attribute
/// indices, with index 0 (the holder secret key) always on the response
/// side. Both maps iterate ascending by index.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ProofD {
    pub c: Integer,
    pub A: Integer,
    pub e_response: Integer,
    pub v_response: Integer,
    pub a_responses: BTreeMap<usize, Integer>,
    pub a_disclosed: BTreeMap<usize, Integer>,
}

impl ProofD {
    fn correct_response_sizes(&self, pk: &IssuerPublicKey) -> bool {
        // every index must name an existing base
        if self
            .a_responses
            .keys()
            .chain(self.a_disclosed.keys())
            .any(|i| *i >= pk.R.len())
        {
            return false;
        }

        // A must be a unit modulo N, otherwise it cannot belong to a valid
        // randomized signature and its reconstruction is meaningless
        if Integer::from(self.A.gcd_ref(&pk.N)) != 1u32 {
            return false;
        }

        let mut maximum = (Integer::from(1) << (pk.params.LmCommit + 1)) - 1u32;
        let mut minimum = Integer::from(-&maximum);
        for response in self.a_responses.values() {
            if response < &minimum || response > &maximum {
                return false;
            }
        }

        maximum = (Integer::from(1) << (pk.params.LeCommit + 1)) - 1u32;
        minimum = Integer::from(-&maximum);
        if self.e_response < minimum || self.e_response > maximum {
            return false;
        }

        true
    }

    fn reconstruct_z(&self, pk: &IssuerPublicKey) -> Integer {
        // known = Z / (A^{2^{Le-1}} * prod_{disclosed} R_i^{m_i})
        let offset = Integer::from(1) << (pk.params.Le - 1);
        let mut numerator = Integer::from(self.A.pow_mod_ref(&offset, &pk.N).unwrap());
        for (i, attribute) in &self.a_disclosed {
            if let Some(base) = pk.R.get(*i) {
                numerator =
                    (numerator * Integer::from(base.pow_mod_ref(attribute, &pk.N).unwrap()))
                        % &pk.N;
            }
        }
        // a non-invertible A is rejected by the size checks; yield a dummy
        // value here rather than panicking on hostile input
        let known = match numerator.invert(&pk.N) {
            Ok(inverse) => (Integer::from(&pk.Z) * inverse) % &pk.N,
            Err(_) => return Integer::from(0),
        };

        let known_c = match known.pow_mod_ref(&Integer::from(-&self.c), &pk.N) {
            Some(power) => Integer::from(power),
            None => return Integer::from(0),
        };
        let ae = match self.A.pow_mod_ref(&self.e_response, &pk.N) {
            Some(power) => Integer::from(power),
            None => return Integer::from(0),
        };
        let sv = Integer::from(pk.S.pow_mod_ref(&self.v_response, &pk.N).unwrap());
        let mut rs = Integer::from(1);
        for (i, response) in &self.a_responses {
            if let Some(base) = pk.R.get(*i) {
                rs = (rs * Integer::from(base.pow_mod_ref(response, &pk.N).unwrap())) % &pk.N;
            }
        }

        (known_c * ae * rs * sv) % &pk.N
    }

    /// Verifies the proof against the given public key, context and nonce.
    pub fn verify(&self, pk: &IssuerPublicKey, context: &Integer, nonce: &Integer) -> bool {
        self.verify_with_challenge(
            pk,
            &create_challenge(context, nonce, &self.challenge_contribution(pk)),
        )
    }

    /// Verifies the proof against a challenge reconstructed by the caller.
    pub fn verify_with_challenge(
        &self,
        pk: &IssuerPublicKey,
        reconstructed_challenge: &Integer,
    ) -> bool {
        let valid = self.correct_response_sizes(pk) && self.c == *reconstructed_challenge;
        if !valid {
            log::debug!("ProofD verification failed");
        }
        valid
    }

    /// The contribution of this proof to the transcript hash.
    pub fn challenge_contribution(&self, pk: &IssuerPublicKey) -> Vec<Integer> {
        vec![self.A.clone(), self.reconstruct_z(pk)]
    }

    /// The response tied to the holder secret key, if the proof carries one.
    pub fn secret_key_response(&self) -> Option<&Integer> {
        self.a_responses.get(&0)
    }

    /// The challenge recorded in the proof.
    pub fn challenge(&self) -> &Integer {
        &self.c
    }

    /// Disclosed attribute values, keyed by attribute index.
    pub fn disclosed_attributes(&self) -> &BTreeMap<usize, Integer> {
        &self.a_disclosed
    }
}

/// A non-interactive zero-knowledge proof.
///
/// `ProofS` verification needs the signature being proven, so inside this
/// sum it exposes no challenge contribution or secret-key response and is
/// rejected by challenge-based verification; verify it directly through
/// [`ProofS::verify`].
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Proof {
    U(ProofU),
    S(ProofS),
    D(ProofD),
}

impl Proof {
    /// Verifies against a challenge reconstructed by the caller.
    pub fn verify_with_challenge(&self, pk: &IssuerPublicKey, challenge: &Integer) -> bool {
        match self {
            Self::U(proof) => proof.verify_with_challenge(pk, challenge),
            Self::S(_) => false,
            Self::D(proof) => proof.verify_with_challenge(pk, challenge),
        }
    }

    /// The response tied to the holder secret key, shared by every proof of
    /// a bound list.
    pub fn secret_key_response(&self) -> Option<&Integer> {
        match self {
            Self::U(proof) => Some(proof.secret_key_response()),
            Self::S(_) => None,
            Self::D(proof) => proof.secret_key_response(),
        }
    }

    /// The group elements this proof feeds into the transcript hash.
    pub fn challenge_contribution(&self, pk: &IssuerPublicKey) -> Vec<Integer> {
        match self {
            Self::U(proof) => proof.challenge_contribution(pk),
            Self::S(_) => Vec::new(),
            Self::D(proof) => proof.challenge_contribution(pk),
        }
    }

    /// The Fiat-Shamir challenge recorded in the proof.
    pub fn challenge(&self) -> &Integer {
        match self {
            Self::U(proof) => proof.challenge(),
            Self::S(proof) => proof.challenge(),
            Self::D(proof) => proof.challenge(),
        }
    }
}

/// An ordered list of proofs, typically bound through one shared challenge
/// and one shared secret-key response.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct ProofList(pub(crate) Vec<Proof>);

impl ProofList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The proofs in list order.
    pub fn proofs(&self) -> &[Proof] {
        &self.0
    }

    /// Returns the n'th `ProofU` in this proof list.
    pub fn get_proof_u(&self, n: usize) -> Result<&ProofU, CredentialError> {
        self.0
            .iter()
            .filter_map(|proof| match proof {
                Proof::U(proof_u) => Some(proof_u),
                _ => None,
            })
            .nth(n)
            .ok_or(CredentialError::MissingProofU)
    }

    /// Returns the first `ProofU` in this proof list.
    pub fn get_first_proof_u(&self) -> Result<&ProofU, CredentialError> {
        self.get_proof_u(0)
    }

    fn challenge_contributions(&self, public_keys: &[IssuerPublicKey]) -> Vec<Integer> {
        let mut contributions = Vec::with_capacity(self.0.len() * 2);
        for (proof, pk) in self.0.iter().zip(public_keys) {
            contributions.extend(proof.challenge_contribution(pk));
        }
        contributions
    }

    /// Returns true when every proof verifies; with `should_be_bound` set,
    /// additionally requires one shared challenge over all contributions and
    /// one shared secret-key response.
    ///
    /// The traversal order of the proofs matches the order of `public_keys`.
    pub fn verify(
        &self,
        public_keys: &[IssuerPublicKey],
        context: &Integer,
        nonce: &Integer,
        should_be_bound: bool,
    ) -> bool {
        if self.0.is_empty() {
            return true;
        }

        if self.0.len() != public_keys.len() {
            log::debug!("proof list and public key list differ in length");
            return false;
        }

        if should_be_bound {
            let contributions = self.challenge_contributions(public_keys);
            let expected_challenge = create_challenge(context, nonce, &contributions);
            let expected_response = match self.0[0].secret_key_response() {
                Some(response) => response,
                None => return false,
            };
            for (proof, pk) in self.0.iter().zip(public_keys) {
                if proof.secret_key_response() != Some(expected_response)
                    || !proof.verify_with_challenge(pk, &expected_challenge)
                {
                    return false;
                }
            }
        } else {
            for (proof, pk) in self.0.iter().zip(public_keys) {
                let challenge =
                    create_challenge(context, nonce, &proof.challenge_contribution(pk));
                if !proof.verify_with_challenge(pk, &challenge) {
                    return false;
                }
            }
        }

        true
    }
}

impl From<Vec<Proof>> for ProofList {
    fn from(proofs: Vec<Proof>) -> Self {
        Self(proofs)
    }
}

/// Builds a bound proof list: one secret-key randomizer shared by every
/// builder and one challenge over all their commitment contributions, taken
/// in declaration order.
///
/// Fails fast on the first builder error; no partial list escapes.
pub fn build_proof_list(
    params: &SystemParameters,
    context: &Integer,
    nonce: &Integer,
    builders: &mut [&mut dyn ProofBuilder],
) -> Result<ProofList, CredentialError> {
    let sk_commitment = random_bits(params.LmCommit)?;

    let mut commitments: Vec<Integer> = Vec::with_capacity(builders.len() * 2);
    for builder in builders.iter_mut() {
        commitments.extend(builder.commit(&sk_commitment)?);
    }

    let challenge = create_challenge(context, nonce, &commitments);

    let proofs = builders
        .iter()
        .map(|builder| builder.create_proof(&challenge))
        .collect();
    Ok(ProofList(proofs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_matches_reference_vector() {
        let context = Integer::from(1);
        let nonce = Integer::from(2);
        let contributions = [Integer::from(3), Integer::from(4)];
        let expected = Integer::from_str_radix(
            "5d4863a2dc15975833be16d392aed61e011a57ef1ee7c152993a9b70a116548a",
            16,
        )
        .unwrap();
        assert_eq!(create_challenge(&context, &nonce, &contributions), expected);
    }

    #[test]
    fn empty_list_verifies() {
        let list = ProofList::new();
        assert!(list.verify(&[], &Integer::from(1), &Integer::from(2), true));
        assert!(list.verify(&[], &Integer::from(1), &Integer::from(2), false));
    }

    #[test]
    fn missing_proof_u_is_reported() {
        let list = ProofList::from(vec![Proof::S(ProofS {
            c: Integer::from(1),
            e_response: Integer::from(2),
        })]);
        assert_eq!(
            list.get_first_proof_u().unwrap_err(),
            CredentialError::MissingProofU
        );
    }
}
