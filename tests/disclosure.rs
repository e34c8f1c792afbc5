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

use digest::Digest;
use rug::{integer::Order, Integer};
use sha2::Sha256;

use idemix::credential::IdemixCredential;
use idemix::keys::KeyPair;
use idemix::params::{SystemParameters, DEFAULT_SYSTEM_PARAMETERS};
use idemix::proofs::{build_proof_list, create_challenge, Proof, ProofBuilder, ProofList};
use idemix::signature::CLSignature;

const ATTR_SEEDS: &[&str] = &[
    "9872ad089e452c7b6e283dfac2a80d58e8d0ff71cc4d5e310a1debdda4a45f02",
    "9872ad089e452c7b6e283dfac2a80d58e8d0ff71cc4d5e310a1debdda4a45f03",
    "9872ad089e452c7b6e283dfac2a80d58e8d0ff71cc4d5e310a1debdda4a45f04",
    "9872ad089e452c7b6e283dfac2a80d58e8d0ff71cc4d5e310a1debdda4a45f05",
];

// The attribute bit-lengths match the canonical set; the smaller modulus
// keeps safe-prime generation fast.
fn test_parameters() -> SystemParameters {
    SystemParameters {
        Ln: 512,
        ..DEFAULT_SYSTEM_PARAMETERS
    }
}

// slot 0 is the holder secret key
fn test_attributes() -> Vec<Integer> {
    ATTR_SEEDS
        .iter()
        .map(|m| {
            Integer::from_digits(
                Sha256::digest(hex::decode(m).unwrap()).as_slice(),
                Order::MsfBe,
            )
        })
        .collect()
}

fn issue_credential(keypair: &KeyPair, attributes: Vec<Integer>) -> IdemixCredential {
    let signature =
        CLSignature::sign(keypair.private_key(), keypair.public_key(), &attributes).unwrap();
    IdemixCredential::new(keypair.public_key().clone(), signature, attributes)
}

#[test]
fn full_disclosure_verifies_and_rejects_tampered_values() {
    let keypair = KeyPair::generate(test_parameters(), 4).unwrap();
    let credential = issue_credential(&keypair, test_attributes());
    let context = Integer::from(0xdeadbeefu32);
    let nonce = Integer::from(0xcafebabeu32);

    let proof = credential
        .create_disclosure_proof(&[1, 2, 3], &context, &nonce)
        .unwrap();

    assert!(proof.verify(keypair.public_key(), &context, &nonce));
    assert_eq!(proof.a_responses.len(), 1);
    assert_eq!(
        proof.disclosed_attributes().keys().copied().collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    for (i, value) in proof.disclosed_attributes() {
        assert_eq!(value, &credential.attributes[*i]);
    }

    let mut tampered = proof.clone();
    tampered
        .a_disclosed
        .insert(1, Integer::from(&credential.attributes[1] + 1u32));
    assert!(!tampered.verify(keypair.public_key(), &context, &nonce));
}

#[test]
fn full_hiding_verifies_with_all_responses_present() {
    let keypair = KeyPair::generate(test_parameters(), 4).unwrap();
    let credential = issue_credential(&keypair, test_attributes());
    let context = Integer::from(1);
    let nonce = Integer::from(2);

    let proof = credential
        .create_disclosure_proof(&[], &context, &nonce)
        .unwrap();

    assert!(proof.verify(keypair.public_key(), &context, &nonce));
    assert!(proof.a_disclosed.is_empty());
    assert_eq!(
        proof.a_responses.keys().copied().collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );
}

#[test]
fn single_bit_tampering_is_rejected() {
    let keypair = KeyPair::generate(test_parameters(), 4).unwrap();
    let credential = issue_credential(&keypair, test_attributes());
    let context = Integer::from(3);
    let nonce = Integer::from(4);

    let proof = credential
        .create_disclosure_proof(&[2], &context, &nonce)
        .unwrap();
    assert!(proof.verify(keypair.public_key(), &context, &nonce));

    let mut tampered = proof.clone();
    tampered.e_response += 1u32;
    assert!(!tampered.verify(keypair.public_key(), &context, &nonce));

    let mut tampered = proof.clone();
    tampered.v_response += 1u32;
    assert!(!tampered.verify(keypair.public_key(), &context, &nonce));

    let mut tampered = proof.clone();
    tampered.c += 1u32;
    assert!(!tampered.verify(keypair.public_key(), &context, &nonce));

    let mut tampered = proof.clone();
    let response = Integer::from(&tampered.a_responses[&1] + 1u32);
    tampered.a_responses.insert(1, response);
    assert!(!tampered.verify(keypair.public_key(), &context, &nonce));

    // the challenge binds the nonce and context as well
    assert!(!proof.verify(keypair.public_key(), &context, &Integer::from(5)));
    assert!(!proof.verify(keypair.public_key(), &Integer::from(5), &nonce));
}

#[test]
fn wrong_public_key_is_rejected() {
    let keypair = KeyPair::generate(test_parameters(), 4).unwrap();
    let other_keypair = KeyPair::generate(test_parameters(), 4).unwrap();
    let credential = issue_credential(&keypair, test_attributes());
    let context = Integer::from(6);
    let nonce = Integer::from(7);

    let proof = credential
        .create_disclosure_proof(&[1, 2, 3], &context, &nonce)
        .unwrap();

    assert!(proof.verify(keypair.public_key(), &context, &nonce));
    assert!(!proof.verify(other_keypair.public_key(), &context, &nonce));
}

#[test]
fn out_of_range_responses_are_rejected() {
    let keypair = KeyPair::generate(test_parameters(), 4).unwrap();
    let credential = issue_credential(&keypair, test_attributes());
    let params = keypair.public_key().params;
    let context = Integer::from(8);
    let nonce = Integer::from(9);

    let proof = credential
        .create_disclosure_proof(&[1], &context, &nonce)
        .unwrap();

    // a proof trivially agrees with its own challenge, so only the range
    // checks can reject here
    let challenge = proof.c.clone();
    assert!(proof.verify_with_challenge(keypair.public_key(), &challenge));

    let mut oversized = proof.clone();
    oversized.e_response = Integer::from(1) << (params.LeCommit + 2);
    assert!(!oversized.verify_with_challenge(keypair.public_key(), &challenge));

    let mut oversized = proof.clone();
    oversized
        .a_responses
        .insert(0, Integer::from(1) << (params.LmCommit + 2));
    assert!(!oversized.verify_with_challenge(keypair.public_key(), &challenge));

    let mut oversized = proof;
    let below = -(Integer::from(1) << (params.LmCommit + 2));
    oversized.a_responses.insert(0, below);
    assert!(!oversized.verify_with_challenge(keypair.public_key(), &challenge));
}

#[test]
fn create_proof_is_deterministic_after_commit() {
    let keypair = KeyPair::generate(test_parameters(), 4).unwrap();
    let credential = issue_credential(&keypair, test_attributes());
    let context = Integer::from(10);
    let nonce = Integer::from(11);

    let mut builder = credential
        .create_disclosure_proof_builder(&[1, 3])
        .unwrap();
    let sk_randomizer = Integer::from(123456789u64);
    let contributions = builder.commit(&sk_randomizer).unwrap();
    let challenge = create_challenge(&context, &nonce, &contributions);

    // with the randomizer stream fixed, the response phase is a pure function
    let first = builder.create_proof(&challenge);
    let second = builder.create_proof(&challenge);
    assert_eq!(first, second);

    match first {
        Proof::D(proof) => {
            assert!(proof.verify(keypair.public_key(), &context, &nonce));
            assert_eq!(proof.secret_key_response(), Some(&{
                let c_times_secret = Integer::from(&challenge * &credential.attributes[0]);
                c_times_secret + &sk_randomizer
            }));
        }
        _ => panic!("expected a disclosure proof"),
    }
}

#[test]
fn proofs_survive_serialization() {
    let keypair = KeyPair::generate(test_parameters(), 4).unwrap();
    let credential = issue_credential(&keypair, test_attributes());
    let context = Integer::from(12);
    let nonce = Integer::from(13);

    let proof = credential
        .create_disclosure_proof(&[2, 3], &context, &nonce)
        .unwrap();

    let encoded = serde_json::to_string(&proof).unwrap();
    let decoded: idemix::proofs::ProofD = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, proof);
    assert!(decoded.verify(keypair.public_key(), &context, &nonce));
}

#[test]
fn unbound_list_is_equivalent_to_independent_verification() {
    let keypair = KeyPair::generate(test_parameters(), 4).unwrap();
    let credential = issue_credential(&keypair, test_attributes());
    let context = Integer::from(14);
    let nonce = Integer::from(15);

    let first = credential
        .create_disclosure_proof(&[1], &context, &nonce)
        .unwrap();
    let second = credential
        .create_disclosure_proof(&[2, 3], &context, &nonce)
        .unwrap();

    assert!(first.verify(keypair.public_key(), &context, &nonce));
    assert!(second.verify(keypair.public_key(), &context, &nonce));

    let list = ProofList::from(vec![Proof::D(first), Proof::D(second)]);
    let public_keys = vec![
        keypair.public_key().clone(),
        keypair.public_key().clone(),
    ];
    assert!(list.verify(&public_keys, &context, &nonce, false));

    // these proofs were not built against a shared challenge
    assert!(!list.verify(&public_keys, &context, &nonce, true));
}

#[test]
fn bound_list_shares_the_secret_key_response() {
    let keypair = KeyPair::generate(test_parameters(), 4).unwrap();
    let credential = issue_credential(&keypair, test_attributes());

    let mut other_attributes = test_attributes();
    other_attributes[2] += 99u32;
    let other_credential = issue_credential(&keypair, other_attributes);

    let context = Integer::from(16);
    let nonce = Integer::from(17);

    let mut first = credential
        .create_disclosure_proof_builder(&[1])
        .unwrap();
    let mut second = other_credential
        .create_disclosure_proof_builder(&[3])
        .unwrap();

    let list = build_proof_list(
        &test_parameters(),
        &context,
        &nonce,
        &mut [&mut first as &mut dyn ProofBuilder, &mut second],
    )
    .unwrap();

    let public_keys = vec![
        keypair.public_key().clone(),
        keypair.public_key().clone(),
    ];
    assert!(list.verify(&public_keys, &context, &nonce, true));

    let responses: Vec<_> = list
        .proofs()
        .iter()
        .map(|proof| proof.secret_key_response().unwrap().clone())
        .collect();
    assert_eq!(responses[0], responses[1]);

    // binding fails once any single response is disturbed
    let mut proofs = list.proofs().to_vec();
    if let Proof::D(proof) = &mut proofs[1] {
        let response = Integer::from(&proof.a_responses[&0] + 1u32);
        proof.a_responses.insert(0, response);
    }
    let tampered = ProofList::from(proofs);
    assert!(!tampered.verify(&public_keys, &context, &nonce, true));
}

#[test]
fn list_and_key_counts_must_match() {
    let keypair = KeyPair::generate(test_parameters(), 4).unwrap();
    let credential = issue_credential(&keypair, test_attributes());
    let context = Integer::from(18);
    let nonce = Integer::from(19);

    let proof = credential
        .create_disclosure_proof(&[1], &context, &nonce)
        .unwrap();
    let list = ProofList::from(vec![Proof::D(proof)]);

    assert!(!list.verify(&[], &context, &nonce, false));
    let public_keys = vec![
        keypair.public_key().clone(),
        keypair.public_key().clone(),
    ];
    assert!(!list.verify(&public_keys, &context, &nonce, false));
}
