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
use crate::proofs::{create_challenge, Proof, ProofBuilder, ProofD};
use crate::signature::CLSignature;
use crate::utils::random::random_bits;

/// A credential: a CL signature over an attribute vector under an issuer
/// public key. `attributes[0]` is the holder secret key and is never
/// disclosed.
///
/// The credential is not mutated during proving; every showing works on a
/// randomized snapshot of the signature held inside a builder.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct IdemixCredential {
    pub signature: CLSignature,
    pub pk: IssuerPublicKey,
    pub attributes: Vec<Integer>,
}

fn get_undisclosed_attributes(disclosed: &[usize], num_attributes: usize) -> Vec<usize> {
    (0..num_attributes).filter(|i| !disclosed.contains(i)).collect()
}

impl IdemixCredential {
    pub fn new(pk: IssuerPublicKey, signature: CLSignature, attributes: Vec<Integer>) -> Self {
        Self {
            signature,
            pk,
            attributes,
        }
    }

    /// Creates a disclosure proof over `disclosed_attributes` in one shot,
    /// with a self-generated secret-key randomizer and a challenge derived
    /// from this proof's contributions alone.
    pub fn create_disclosure_proof(
        &self,
        disclosed_attributes: &[usize],
        context: &Integer,
        nonce: &Integer,
    ) -> Result<ProofD, CredentialError> {
        let mut builder = self.create_disclosure_proof_builder(disclosed_attributes)?;
        let sk_randomizer = random_bits(self.pk.params.LmCommit)?;
        let contributions = builder.commit(&sk_randomizer)?;
        let challenge = create_challenge(context, nonce, &contributions);
        match builder.create_proof(&challenge) {
            Proof::D(proof) => Ok(proof),
            _ => panic!("Cannot happen!"),
        }
    }

    /// Prepares a builder for one showing: randomizes the signature and
    /// samples every randomizer except the one for slot 0, which the
    /// orchestrator supplies at `commit` time so that several proofs can
    /// share it.
    pub fn create_disclosure_proof_builder(
        &self,
        disclosed_attributes: &[usize],
    ) -> Result<DisclosureProofBuilder<'_>, CredentialError> {
        for &i in disclosed_attributes {
            if i == 0 {
                return Err(CredentialError::InvalidDisclosure(
                    "attribute 0 is the holder secret key and cannot be disclosed".to_string(),
                ));
            }
            if i >= self.attributes.len() {
                return Err(CredentialError::InvalidDisclosure(format!(
                    "attribute index {} out of range",
                    i
                )));
            }
        }

        let params = &self.pk.params;
        let randomized_signature = self.signature.randomize(&self.pk)?;
        let e_commit = random_bits(params.LeCommit)?;
        let v_commit = random_bits(params.LvCommit)?;

        let undisclosed_attributes =
            get_undisclosed_attributes(disclosed_attributes, self.attributes.len());
        let mut attr_randomizers = BTreeMap::new();
        for &i in &undisclosed_attributes {
            if i != 0 {
                attr_randomizers.insert(i, random_bits(params.LmCommit)?);
            }
        }

        Ok(DisclosureProofBuilder {
            randomized_signature,
            e_commit,
            v_commit,
            attr_randomizers,
            disclosed_attributes: disclosed_attributes.to_vec(),
            undisclosed_attributes,
            pk: &self.pk,
            attributes: &self.attributes,
        })
    }
}

/// Transient state for one disclosure proof round, consumed by the two-phase
/// builder protocol: one `commit`, then one `create_proof`.
pub struct DisclosureProofBuilder<'a> {
    randomized_signature: CLSignature,
    e_commit: Integer,
    v_commit: Integer,
    attr_randomizers: BTreeMap<usize, Integer>,
    disclosed_attributes: Vec<usize>,
    undisclosed_attributes: Vec<usize>,
    pk: &'a IssuerPublicKey,
    attributes: &'a [Integer],
}

impl ProofBuilder for DisclosureProofBuilder<'_> {
    fn commit(&mut self, sk_randomizer: &Integer) -> Result<Vec<Integer>, CredentialError> {
        self.attr_randomizers.insert(0, sk_randomizer.clone());

        // Z = A^{eCommit} * S^{vCommit}
        //     * prod_{i in undisclosed} R_i^{attrRandomizers[i]}
        let n = &self.pk.N;
        let ae = Integer::from(
            self.randomized_signature
                .A
                .pow_mod_ref(&self.e_commit, n)
                .unwrap(),
        );
        let sv = Integer::from(self.pk.S.pow_mod_ref(&self.v_commit, n).unwrap());
        let mut z = (ae * sv) % n;
        for &i in &self.undisclosed_attributes {
            z = (z * Integer::from(
                self.pk.R[i]
                    .pow_mod_ref(&self.attr_randomizers[&i], n)
                    .unwrap(),
            )) % n;
        }

        Ok(vec![self.randomized_signature.A.clone(), z])
    }

    fn create_proof(&self, challenge: &Integer) -> Proof {
        // e' = e - 2^{Le-1} offsets e into the signed range the verifier expects
        let e_prime = Integer::from(&self.randomized_signature.e)
            - (Integer::from(1) << (self.pk.params.Le - 1));
        let e_response = Integer::from(challenge * &e_prime) + &self.e_commit;
        let v_response =
            Integer::from(challenge * &self.randomized_signature.v) + &self.v_commit;

        let mut a_responses = BTreeMap::new();
        for &i in &self.undisclosed_attributes {
            let response =
                Integer::from(challenge * &self.attributes[i]) + &self.attr_randomizers[&i];
            a_responses.insert(i, response);
        }

        let mut a_disclosed = BTreeMap::new();
        for &i in &self.disclosed_attributes {
            a_disclosed.insert(i, self.attributes[i].clone());
        }

        Proof::D(ProofD {
            c: challenge.clone(),
            A: self.randomized_signature.A.clone(),
            e_response,
            v_response,
            a_responses,
            a_disclosed,
        })
    }
}
