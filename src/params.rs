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

use serde::{Deserialize, Serialize};

/// Bit-lengths governing element sizes, sampling bounds and the range checks
/// applied during verification. Immutable after construction: every
/// participant of a proof session must hold the same record.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SystemParameters {
    /// Size of the modulus `N`.
    pub Ln: u32,
    /// Size of the challenge hash output.
    pub Lh: u32,
    /// Size of an attribute.
    pub Lm: u32,
    /// Size of the signature exponent `e`.
    pub Le: u32,
    /// Width of the interval the prime `e` is drawn from.
    pub LePrime: u32,
    /// Size of the signature blinding `v`.
    pub Lv: u32,
    /// Size of the recipient blinding `v'` committed to during issuance.
    pub LvPrime: u32,
    /// Size of the randomizer for `e`.
    pub LeCommit: u32,
    /// Size of an attribute randomizer.
    pub LmCommit: u32,
    /// Size of the randomizer for `v`.
    pub LvCommit: u32,
    /// Size of the randomizer for `v'`.
    pub LvPrimeCommit: u32,
}

/// The canonical parameter set for a 1024-bit modulus.
pub const DEFAULT_SYSTEM_PARAMETERS: SystemParameters = SystemParameters {
    Ln: 1024,
    Lh: 256,
    Lm: 256,
    Le: 597,
    LePrime: 120,
    Lv: 1700,
    LvPrime: 768,
    LeCommit: 456,
    LmCommit: 592,
    LvCommit: 1700,
    LvPrimeCommit: 1104,
};
