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

use crate::error::ErrorKind;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::card::Card;

const HEADER_PREFIX: &str = "Flashcard ";
const QUESTION_PREFIX: &str = "Question:";
const ANSWER_PREFIX: &str = "Answer:";

/// What to do with a block that lacks a question or answer line.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParseMode {
    /// Fail the whole parse, naming the first bad block.
    Strict,
    /// Drop bad blocks and keep going.
    Lenient,
}

/// The result of a lenient parse: the cards that made it, and an error for
/// every block that did not.
pub struct LenientParse {
    pub cards: Vec<Card>,
    pub skipped: Vec<ErrorReport>,
}

/// A run of lines between two `Flashcard <N>` headers.
struct Block<'a> {
    /// 1-based position among the non-empty blocks.
    index: usize,
    /// The header that opened this block, if any. Text before the first
    /// header forms a block with no label.
    label: Option<&'a str>,
    lines: Vec<&'a str>,
}

impl Block<'_> {
    fn describe(&self) -> String {
        match self.label {
            Some(label) => format!("block {} ({label})", self.index),
            None => format!("block {}", self.index),
        }
    }

    fn find_field(&self, prefix: &str) -> Option<String> {
        self.lines
            .iter()
            .find_map(|line| line.strip_prefix(prefix))
            .map(|rest| rest.trim().to_string())
    }

    fn into_card(self) -> Fallible<Card> {
        let question = self.find_field(QUESTION_PREFIX).ok_or_else(|| {
            ErrorReport::new(
                ErrorKind::Parse,
                format!("{} has no \"{QUESTION_PREFIX}\" line.", self.describe()),
            )
        })?;
        let answer = self.find_field(ANSWER_PREFIX).ok_or_else(|| {
            ErrorReport::new(
                ErrorKind::Parse,
                format!("{} has no \"{ANSWER_PREFIX}\" line.", self.describe()),
            )
        })?;
        Ok(Card::new(question, answer))
    }
}

/// Parse pasted text into cards, in input order.
pub fn parse_flashcards(text: &str, mode: ParseMode) -> Fallible<Vec<Card>> {
    match mode {
        ParseMode::Strict => split_blocks(text)
            .into_iter()
            .map(Block::into_card)
            .collect(),
        ParseMode::Lenient => {
            let LenientParse { cards, skipped } = parse_flashcards_lenient(text);
            for err in skipped {
                log::warn!("Skipping malformed flashcard: {}", err.message());
            }
            Ok(cards)
        }
    }
}

pub fn parse_flashcards_lenient(text: &str) -> LenientParse {
    let mut cards = Vec::new();
    let mut skipped = Vec::new();
    for block in split_blocks(text) {
        match block.into_card() {
            Ok(card) => cards.push(card),
            Err(e) => skipped.push(e),
        }
    }
    LenientParse { cards, skipped }
}

fn split_blocks(text: &str) -> Vec<Block<'_>> {
    let mut raw: Vec<(Option<&str>, Vec<&str>)> = vec![(None, Vec::new())];
    for line in text.lines() {
        let line = line.trim();
        if let Some((label, rest)) = strip_header(line) {
            raw.push((Some(label), Vec::new()));
            if !rest.is_empty() {
                if let Some((_, lines)) = raw.last_mut() {
                    lines.push(rest);
                }
            }
        } else if !line.is_empty() {
            if let Some((_, lines)) = raw.last_mut() {
                lines.push(line);
            }
        }
    }
    raw.into_iter()
        .filter(|(_, lines)| !lines.is_empty())
        .enumerate()
        .map(|(i, (label, lines))| Block {
            index: i + 1,
            label,
            lines,
        })
        .collect()
}

/// If the (trimmed) line opens with `Flashcard <digits>`, return the header
/// itself and whatever follows it on the same line.
fn strip_header(line: &str) -> Option<(&str, &str)> {
    let after_prefix = line.strip_prefix(HEADER_PREFIX)?;
    let digits = after_prefix
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(after_prefix.len());
    if digits == 0 {
        return None;
    }
    let header_len = HEADER_PREFIX.len() + digits;
    Some((&line[..header_len], line[header_len..].trim()))
}
