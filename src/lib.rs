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

//! # Idemix
//! ## Description
//! An Idemix-style anonymous credential engine over **Camenisch-Lysyanskaya**
//! (CL) signatures. A holder of a CL signature on a hidden secret key and a
//! vector of attributes can prove, without revealing the signature or the
//! undisclosed attributes, that the signature is valid under a known issuer
//! public key and that selected attributes equal disclosed clear-text values.
//!
//! The library provides:
//! * the **CL signature** primitive with unlinkable re-randomization;
//! * **selective disclosure proofs** (`ProofD`), non-interactive through the
//!   Fiat-Shamir transform;
//! * the issuance protocol: the recipient's commitment proof (`ProofU`) and
//!   the issuer's signature-correctness proof (`ProofS`);
//! * **bound proof lists**: several proofs sharing one challenge and one
//!   secret-key response, proving they refer to the same holder secret.
//!
//! This crate depends on the [Rug crate](https://crates.io/crates/rug) for
//! arbitrary-precision arithmetic, which builds on GMP through the low-level
//! FFI bindings in the
//! [gmp-mpfr-sys crate](https://crates.io/crates/gmp-mpfr-sys).
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! idemix = "0.1"
//! ```
//!
//! ### Example
//!
//! You can run the end-to-end walkthrough (issuance, showing, bound proof
//! list) with:
//! ```sh
//! cargo run --example disclosure
//! ```
//!
//! ## Test
//!
//! To test the library you can launch the test suite with:
//!
//! ```sh
//! cargo test
//! ```

#![allow(non_snake_case)]
#![allow(non_upper_case_globals)]

/// Credential container and disclosure proof builder
pub mod credential;
/// Errors module
pub mod errors;
/// Issuance protocol: recipient commitment builder and issuer signing
pub mod issuance;
/// Issuer key material
pub mod keys;
/// System parameters
pub mod params;
/// Proof objects and the proof-list orchestrator
pub mod proofs;
/// The CL signature primitive
pub mod signature;
/// Utils module
pub mod utils;
