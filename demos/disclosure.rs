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

use idemix::issuance::{CredentialBuilder, Issuer};
use idemix::keys::KeyPair;
use idemix::params::DEFAULT_SYSTEM_PARAMETERS;
use idemix::proofs::{build_proof_list, ProofBuilder};
use idemix::utils::random::{generate_nonce, random_bits};

fn main() {
    use std::env;

    dotenv::dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 1 {
        println!("Usage: {}", args[0]);
        return;
    }

    const ATTRS: &[&str] = &[
        "9872ad089e452c7b6e283dfac2a80d58e8d0ff71cc4d5e310a1debdda4a45f02",
        "9872ad089e452c7b6e283dfac2a80d58e8d0ff71cc4d5e310a1debdda4a45f03",
        "9872ad089e452c7b6e283dfac2a80d58e8d0ff71cc4d5e310a1debdda4a45f04",
    ];

    log::info!("Attributes: {:?}", ATTRS);
    log::info!("Issuer keypair generation (safe primes, this takes a while)");

    let params = DEFAULT_SYSTEM_PARAMETERS;
    let keypair = KeyPair::generate(params, ATTRS.len() + 1).expect("keypair generation failed");
    let pk = keypair.public_key();

    let attributes: Vec<Integer> = ATTRS
        .iter()
        .map(|m| {
            Integer::from_digits(
                Sha256::digest(hex::decode(m).unwrap()).as_slice(),
                Order::MsfBe,
            )
        })
        .collect();

    log::info!("Issuance: recipient commits to its secret key");

    let context = generate_nonce().expect("rng failure");
    let nonce1 = generate_nonce().expect("rng failure");
    let nonce2 = generate_nonce().expect("rng failure");

    let secret = random_bits(params.Lm).expect("rng failure");
    let mut builder = CredentialBuilder::new(pk, secret).expect("commitment failed");

    let list = build_proof_list(
        &params,
        &context,
        &nonce1,
        &mut [&mut builder as &mut dyn ProofBuilder],
    )
    .expect("proof list construction failed");

    assert!(
        list.verify(&[pk.clone()], &context, &nonce1, true),
        "Error! The commitment proof verification should PASS!"
    );
    log::info!("Commitment proof (ProofU) is VALID!");

    let issuer = Issuer::new(keypair.private_key(), pk);
    let message = issuer
        .issue_signature(builder.commitment(), &attributes, &context, &nonce2)
        .expect("issuance failed");

    let credential = builder
        .construct_credential(&message, &attributes, &context, &nonce2)
        .expect("credential construction failed");
    log::info!("Credential issued over {} attribute slots", credential.attributes.len());

    log::info!("Showing: disclose attributes 1 and 2, hide the rest");

    let showing_nonce = generate_nonce().expect("rng failure");
    let proof = credential
        .create_disclosure_proof(&[1, 2], &context, &showing_nonce)
        .expect("disclosure proof failed");

    assert!(
        proof.verify(pk, &context, &showing_nonce),
        "Error! The disclosure proof verification should PASS!"
    );
    log::info!("Disclosure proof (ProofD) is VALID!");
    log::info!(
        "Disclosed attribute indices: {:?}",
        proof.disclosed_attributes().keys().collect::<Vec<_>>()
    );
}
