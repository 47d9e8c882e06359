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

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::ErrorKind;
use crate::error::Fallible;
use crate::error::fail;
use crate::record::Record;
use crate::types::card::Card;
use crate::types::score::Score;
use crate::types::set_name::SetName;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionState {
    /// No deck is loaded.
    Empty,
    /// There is a current card to study.
    Active,
    /// The position is at or past the end of the deck.
    Exhausted,
}

/// Identifies the one auto-advance a session may have pending. Tickets are
/// never reused within a session, so a late timer can't advance a session
/// that has moved on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Ticket(u64);

/// The state of a study session: the shuffled deck, where we are in it, and
/// how it has gone so far.
#[derive(Debug, Default)]
pub struct Session {
    deck: Vec<Card>,
    position: usize,
    score: Score,
    wrong_cards: Vec<Card>,
    set_name: Option<SetName>,
    pending: Option<Ticket>,
    next_ticket: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        if self.deck.is_empty() {
            SessionState::Empty
        } else if self.position < self.deck.len() {
            SessionState::Active
        } else {
            SessionState::Exhausted
        }
    }

    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn wrong_cards(&self) -> &[Card] {
        &self.wrong_cards
    }

    pub fn set_name(&self) -> Option<&SetName> {
        self.set_name.as_ref()
    }

    pub fn pending(&self) -> Option<Ticket> {
        self.pending
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.deck.get(self.position)
    }

    /// Replace the deck with a uniformly shuffled copy of `cards` and start
    /// over. The set is named after the first card in input order.
    pub fn load_deck<R: Rng + ?Sized>(&mut self, cards: Vec<Card>, rng: &mut R) {
        let set_name = SetName::from_first_card(&cards);
        let mut deck = cards;
        deck.shuffle(rng);
        log::debug!("Loaded deck of {} cards.", deck.len());
        self.deck = deck;
        self.set_name = set_name;
        self.position = 0;
        self.score = Score::default();
        self.wrong_cards.clear();
        self.pending = None;
    }

    /// Check the current card can be revealed, and return it.
    pub fn reveal_answer(&self) -> Fallible<&Card> {
        self.require_active()?;
        match self.current_card() {
            Some(card) => Ok(card),
            None => fail(ErrorKind::InvalidState, "no card to reveal."),
        }
    }

    pub fn grade_correct(&mut self) -> Fallible<SessionState> {
        self.require_gradable()?;
        self.score.record_correct();
        self.position += 1;
        let state = self.state();
        if state == SessionState::Exhausted {
            log::debug!("Deck exhausted.");
        }
        Ok(state)
    }

    /// Record the current card as missed. The position does not move until
    /// `complete_advance` is called with the returned ticket.
    pub fn grade_wrong(&mut self) -> Fallible<Ticket> {
        self.require_gradable()?;
        let card = match self.current_card() {
            Some(card) => card.clone(),
            None => return fail(ErrorKind::InvalidState, "no card to grade."),
        };
        self.wrong_cards.push(card);
        self.score.record_wrong();
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.pending = Some(ticket);
        Ok(ticket)
    }

    /// Apply a pending advance. Returns false, and does nothing, if the
    /// ticket was superseded.
    pub fn complete_advance(&mut self, ticket: Ticket) -> bool {
        if self.pending != Some(ticket) {
            log::debug!("Ignoring stale advance {ticket:?}.");
            return false;
        }
        self.pending = None;
        self.position += 1;
        true
    }

    /// Move straight to `index`. Indices past the end are allowed and leave
    /// the session exhausted.
    pub fn jump_to(&mut self, index: usize) -> Fallible<SessionState> {
        if self.deck.is_empty() {
            return fail(ErrorKind::InvalidState, "no deck loaded.");
        }
        self.pending = None;
        self.position = index;
        Ok(self.state())
    }

    pub fn rename(&mut self, name: SetName) -> Fallible<()> {
        if self.deck.is_empty() {
            return fail(ErrorKind::InvalidState, "no deck loaded.");
        }
        self.set_name = Some(name);
        Ok(())
    }

    pub fn clear_wrong(&mut self) {
        self.wrong_cards.clear();
    }

    pub fn serialize(&self) -> Record {
        Record {
            flashcards: self.deck.clone(),
            score: self.score,
            current_card_index: self.position,
            wrong_flashcards: self.wrong_cards.clone(),
        }
    }

    pub fn deserialize(set_name: Option<SetName>, record: Record) -> Self {
        let score = Score::from_counts(record.score.correct_count(), record.score.total_count());
        Self {
            deck: record.flashcards,
            position: record.current_card_index,
            score,
            wrong_cards: record.wrong_flashcards,
            set_name,
            pending: None,
            next_ticket: 0,
        }
    }

    /// Swap in another session, such as one loaded from the store. Ticket
    /// numbering carries on from this session, so a timer holding one of
    /// our tickets can never match a ticket the new session hands out.
    pub fn replace(&mut self, next: Session) {
        let next_ticket = self.next_ticket.max(next.next_ticket);
        *self = next;
        self.pending = None;
        self.next_ticket = next_ticket;
    }

    fn require_active(&self) -> Fallible<()> {
        match self.state() {
            SessionState::Active => Ok(()),
            SessionState::Empty => fail(ErrorKind::InvalidState, "no deck loaded."),
            SessionState::Exhausted => fail(ErrorKind::InvalidState, "all cards are done."),
        }
    }

    /// Succeeds if a grading action would be accepted right now.
    pub fn require_gradable(&self) -> Fallible<()> {
        self.require_active()?;
        if self.pending.is_some() {
            return fail(ErrorKind::Busy, "session busy: waiting to show the next card.");
        }
        Ok(())
    }
}
