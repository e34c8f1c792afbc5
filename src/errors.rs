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

use std::error::Error;
use std::fmt;

/// Errors surfaced by credential and proof construction.
///
/// Verification never produces one of these: it returns a plain boolean so
/// that callers cannot tell which check rejected a proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialError {
    /// The disclosed attribute set names index 0 (the holder secret key) or
    /// an index outside the attribute vector.
    InvalidDisclosure(String),
    /// A `ProofU` was expected in a proof list but none was found.
    MissingProofU,
    /// The issuer's partial signature or its correctness proof did not
    /// verify while completing a credential.
    InvalidIssuance(String),
    /// The system random number generator failed.
    RngFailure,
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidDisclosure(reason) => write!(f, "invalid disclosure: {}", reason),
            Self::MissingProofU => write!(
                f,
                "missing ProofU in ProofList, has a CredentialBuilder been added?"
            ),
            Self::InvalidIssuance(reason) => write!(f, "invalid issuance: {}", reason),
            Self::RngFailure => write!(f, "the random number generator failed"),
        }
    }
}

impl Error for CredentialError {}
