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

use std::fmt::Display;
use std::fmt::Formatter;

use crate::types::card::Card;

/// The name used when the first question yields nothing usable.
const DEFAULT_NAME: &str = "Flashcards";

/// How many characters of the first question go into a derived name.
const DERIVED_NAME_LENGTH: usize = 20;

/// The name of a flashcard set. Always sanitized, so it is safe to use as a
/// store key or a file name.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SetName(String);

impl SetName {
    pub fn new(name: &str) -> Self {
        Self(sanitize(name))
    }

    /// Derive a name from the first question of a freshly parsed deck.
    pub fn from_first_card(cards: &[Card]) -> Option<Self> {
        let first = cards.first()?;
        let prefix: String = first.question().chars().take(DERIVED_NAME_LENGTH).collect();
        let name = sanitize(&prefix);
        if name.is_empty() {
            Some(Self(DEFAULT_NAME.to_string()))
        } else {
            Some(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SetName {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Replace every character outside `[a-zA-Z0-9_-]` with an underscore.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
