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

use rug::ops::RemRounding;
use rug::Integer;
use serde::{Deserialize, Serialize};

use crate::credential::IdemixCredential;
use crate::errors::CredentialError;
use crate::keys::{IssuerPublicKey, IssuerSecretKey};
use crate::proofs::{Proof, ProofBuilder, ProofS, ProofU};
use crate::signature::CLSignature;
use crate::utils::hash::hash_commit;
use crate::utils::random::{random_below, random_bits};

/// Recipient state for the first phase of issuance.
///
/// Holds the secret key `s` and blinding `v'` inside the commitment
/// `U = S^{v'} * R[0]^s (mod N)` and acts as the `ProofU` builder in a
/// bound proof list.
pub struct CredentialBuilder<'a> {
    pk: &'a IssuerPublicKey,
    secret: Integer,
    v_prime: Integer,
    u: Integer,
    v_prime_commit: Option<Integer>,
    sk_randomizer: Option<Integer>,
}

impl<'a> CredentialBuilder<'a> {
    /// Samples the blinding `v'` and forms the issuance commitment.
    pub fn new(pk: &'a IssuerPublicKey, secret: Integer) -> Result<Self, CredentialError> {
        let v_prime = random_bits(pk.params.LvPrime)?;
        let sv = Integer::from(pk.S.pow_mod_ref(&v_prime, &pk.N).unwrap());
        let r0s = Integer::from(pk.R[0].pow_mod_ref(&secret, &pk.N).unwrap());
        let u = (sv * r0s) % &pk.N;

        Ok(Self {
            pk,
            secret,
            v_prime,
            u,
            v_prime_commit: None,
            sk_randomizer: None,
        })
    }

    /// The issuance commitment `U` sent to the issuer.
    pub fn commitment(&self) -> &Integer {
        &self.u
    }

    /// Completes the credential from the issuer's partial signature by
    /// folding the blinding back in: `v = v' + v''`.
    ///
    /// Rejects if the signature-correctness proof or the completed
    /// signature does not verify. `attributes` are the issuer-known values
    /// occupying slots 1 and up.
    pub fn construct_credential(
        &self,
        message: &IssueSignatureMessage,
        attributes: &[Integer],
        context: &Integer,
        nonce2: &Integer,
    ) -> Result<IdemixCredential, CredentialError> {
        if !message
            .proof
            .verify(self.pk, &message.signature, context, nonce2)
        {
            return Err(CredentialError::InvalidIssuance(
                "proof of signature correctness does not verify".to_string(),
            ));
        }

        let signature = CLSignature {
            A: message.signature.A.clone(),
            e: message.signature.e.clone(),
            v: Integer::from(&self.v_prime + &message.signature.v),
        };

        let mut all_attributes = Vec::with_capacity(attributes.len() + 1);
        all_attributes.push(self.secret.clone());
        all_attributes.extend_from_slice(attributes);

        if !signature.verify(self.pk, &all_attributes) {
            return Err(CredentialError::InvalidIssuance(
                "signature does not verify on the attributes".to_string(),
            ));
        }

        Ok(IdemixCredential::new(
            self.pk.clone(),
            signature,
            all_attributes,
        ))
    }
}

impl ProofBuilder for CredentialBuilder<'_> {
    fn commit(&mut self, sk_randomizer: &Integer) -> Result<Vec<Integer>, CredentialError> {
        let v_prime_commit = random_bits(self.pk.params.LvPrimeCommit)?;

        // U_commit = S^{vPrimeCommit} * R_0^{skRandomizer}
        let sv = Integer::from(self.pk.S.pow_mod_ref(&v_prime_commit, &self.pk.N).unwrap());
        let r0s = Integer::from(self.pk.R[0].pow_mod_ref(sk_randomizer, &self.pk.N).unwrap());
        let u_commit = (sv * r0s) % &self.pk.N;

        self.v_prime_commit = Some(v_prime_commit);
        self.sk_randomizer = Some(sk_randomizer.clone());

        Ok(vec![self.u.clone(), u_commit])
    }

    fn create_proof(&self, challenge: &Integer) -> Proof {
        let v_prime_commit = self
            .v_prime_commit
            .as_ref()
            .expect("commit must precede create_proof");
        let sk_randomizer = self
            .sk_randomizer
            .as_ref()
            .expect("commit must precede create_proof");

        let s_response = Integer::from(challenge * &self.secret) + sk_randomizer;
        let v_prime_response = Integer::from(challenge * &self.v_prime) + v_prime_commit;

        Proof::U(ProofU {
            u: self.u.clone(),
            c: challenge.clone(),
            v_prime_response,
            s_response,
        })
    }
}

/// The issuer's answer to an issuance commitment: a partial CL signature
/// and the proof it was correctly formed.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct IssueSignatureMessage {
    pub signature: CLSignature,
    pub proof: ProofS,
}

/// Issuer-side signing of an issuance commitment.
pub struct Issuer<'a> {
    sk: &'a IssuerSecretKey,
    pk: &'a IssuerPublicKey,
}

impl<'a> Issuer<'a> {
    pub fn new(sk: &'a IssuerSecretKey, pk: &'a IssuerPublicKey) -> Self {
        Self { sk, pk }
    }

    /// Signs `U * prod R[i+1]^{m_i}` and proves knowledge of the exponent
    /// inverse used to form `A`. Slot 0 stays hidden inside `U`.
    pub fn issue_signature(
        &self,
        commitment: &Integer,
        attributes: &[Integer],
        context: &Integer,
        nonce2: &Integer,
    ) -> Result<IssueSignatureMessage, CredentialError> {
        let signature =
            CLSignature::sign_with_commitment(self.sk, self.pk, commitment, attributes)?;
        let proof = self.prove_signature(&signature, context, nonce2)?;
        Ok(IssueSignatureMessage { signature, proof })
    }

    // eResponse = eCommit - c * e^{-1} (mod p'q') over ACommit = Q^{eCommit}
    fn prove_signature(
        &self,
        signature: &CLSignature,
        context: &Integer,
        nonce2: &Integer,
    ) -> Result<ProofS, CredentialError> {
        let n = &self.pk.N;
        let q = Integer::from(signature.A.pow_mod_ref(&signature.e, n).unwrap());

        let order = self.sk.group_order();
        // e was chosen invertible modulo p'q' at signing time
        let d = signature.e.clone().invert(&order).unwrap();

        let e_commit = random_below(&order)?;
        let a_commit = Integer::from(q.pow_mod_ref(&e_commit, n).unwrap());

        let c = hash_commit(&[context, &q, &signature.A, nonce2, &a_commit]);
        let e_response = (e_commit - Integer::from(&c * &d)).rem_euc(&order);

        Ok(ProofS { c, e_response })
    }
}
