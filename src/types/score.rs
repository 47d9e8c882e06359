// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Deserialize;
use serde::Serialize;

/// Running tally for a session. `correct_count <= total_count` always holds,
/// since the only way to bump `correct_count` is `record_correct`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    #[serde(default)]
    correct_count: usize,
    #[serde(default)]
    total_count: usize,
}

impl Score {
    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn record_correct(&mut self) {
        self.correct_count += 1;
        self.total_count += 1;
    }

    pub fn record_wrong(&mut self) {
        self.total_count += 1;
    }

    /// Rebuild a score from stored counts. A stored correct count larger than
    /// the total is clamped, so the invariant survives hand-edited records.
    pub fn from_counts(correct_count: usize, total_count: usize) -> Self {
        Self {
            correct_count: correct_count.min(total_count),
            total_count,
        }
    }
}
