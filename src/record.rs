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

use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::score::Score;
use crate::types::set_name::SetName;

/// Prefix of every saved-set key in the store.
pub const SET_KEY_PREFIX: &str = "flashcardSet-";

/// Key of the side record holding the latest wrong list.
pub const WRONG_LIST_KEY: &str = "wrongFlashcards";

/// The stored snapshot of a session. Every field is optional on the way in,
/// so older or hand-written records still load.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default)]
    pub flashcards: Vec<Card>,
    #[serde(default)]
    pub score: Score,
    #[serde(default)]
    pub current_card_index: usize,
    #[serde(default)]
    pub wrong_flashcards: Vec<Card>,
}

impl Record {
    pub fn to_json(&self) -> Fallible<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Fallible<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

pub fn set_key(name: &SetName) -> String {
    format!("{SET_KEY_PREFIX}{name}")
}

/// The inverse of `set_key`. Returns `None` for keys that are not sets.
pub fn set_name_from_key(key: &str) -> Option<SetName> {
    key.strip_prefix(SET_KEY_PREFIX).map(SetName::new)
}

/// Encode a list of cards the way the side record and the export file store
/// them.
pub fn cards_to_json(cards: &[Card]) -> Fallible<String> {
    Ok(serde_json::to_string(cards)?)
}

/// Pretty-printed with two-space indentation, for files meant to be read.
pub fn cards_to_pretty_json(cards: &[Card]) -> Fallible<String> {
    Ok(serde_json::to_string_pretty(cards)?)
}

pub fn cards_from_json(json: &str) -> Fallible<Vec<Card>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_field_names() -> Fallible<()> {
        let record = Record {
            flashcards: vec![Card::new("Q", "A")],
            score: Score::from_counts(1, 2),
            current_card_index: 1,
            wrong_flashcards: vec![Card::new("Q", "A")],
        };
        let json = record.to_json()?;
        assert_eq!(
            json,
            r#"{"flashcards":[{"question":"Q","answer":"A"}],"score":{"correctCount":1,"totalCount":2},"currentCardIndex":1,"wrongFlashcards":[{"question":"Q","answer":"A"}]}"#
        );
        Ok(())
    }

    #[test]
    fn test_missing_fields_default() -> Fallible<()> {
        let record = Record::from_json("{}")?;
        assert_eq!(record, Record::default());
        let record = Record::from_json(r#"{"score":{"totalCount":3}}"#)?;
        assert_eq!(record.score.correct_count(), 0);
        assert_eq!(record.score.total_count(), 3);
        Ok(())
    }

    #[test]
    fn test_corrupt_record() {
        let err = Record::from_json("not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
        let err = Record::from_json(r#"{"flashcards": 5}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }

    #[test]
    fn test_keys() {
        let name = SetName::new("Capitals");
        let key = set_key(&name);
        assert_eq!(key, "flashcardSet-Capitals");
        assert_eq!(set_name_from_key(&key), Some(name));
        assert_eq!(set_name_from_key(WRONG_LIST_KEY), None);
    }

    #[test]
    fn test_pretty_json_indent() -> Fallible<()> {
        let json = cards_to_pretty_json(&[Card::new("Q", "A")])?;
        assert_eq!(
            json,
            "[\n  {\n    \"question\": \"Q\",\n    \"answer\": \"A\"\n  }\n]"
        );
        Ok(())
    }
}
