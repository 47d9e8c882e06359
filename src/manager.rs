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

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::db::Database;
use crate::error::ErrorKind;
use crate::error::Fallible;
use crate::error::fail;
use crate::observer::SessionObserver;
use crate::parser::ParseMode;
use crate::parser::LenientParse;
use crate::parser::parse_flashcards;
use crate::parser::parse_flashcards_lenient;
use crate::record::Record;
use crate::record::SET_KEY_PREFIX;
use crate::record::WRONG_LIST_KEY;
use crate::record::cards_from_json;
use crate::record::cards_to_json;
use crate::record::cards_to_pretty_json;
use crate::record::set_key;
use crate::record::set_name_from_key;
use crate::session::Session;
use crate::session::SessionState;
use crate::session::Ticket;
use crate::types::card::Card;
use crate::types::set_name::SetName;
use crate::types::timestamp::Timestamp;

/// File name used when exporting a deck that has no set name.
const UNNAMED_EXPORT: &str = "flashcards";

/// What `add_flashcards_with_report` did with its input.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Added {
    /// Cards loaded into the new session.
    pub count: usize,
    /// Malformed blocks dropped. Always zero in strict mode.
    pub skipped: usize,
}

/// A deck rendered as a standalone JSON document.
pub struct Export {
    pub file_name: String,
    pub json: String,
}

/// Owns the study session and the store it is saved to, and tells the
/// observer about every change. All mutation goes through here.
///
/// Every operation either applies fully or leaves the session as it was.
/// Store writes happen before the in-memory change they record.
pub struct Manager<O: SessionObserver> {
    session: Session,
    db: Database,
    observer: O,
    rng: StdRng,
    parse_mode: ParseMode,
}

impl<O: SessionObserver> Manager<O> {
    pub fn new(db: Database, observer: O, parse_mode: ParseMode) -> Self {
        Self::with_rng(db, observer, parse_mode, StdRng::from_os_rng())
    }

    pub fn with_rng(db: Database, observer: O, parse_mode: ParseMode, rng: StdRng) -> Self {
        Self {
            session: Session::new(),
            db,
            observer,
            rng,
            parse_mode,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    #[cfg(test)]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Parse pasted text and, if it yields any cards, start a new session
    /// with them. Returns the number of cards loaded. Input with no cards
    /// leaves the current session alone.
    pub fn add_flashcards(&mut self, text: &str) -> Fallible<usize> {
        Ok(self.add_flashcards_with_report(text)?.count)
    }

    /// `add_flashcards`, also reporting how many malformed blocks lenient
    /// parsing dropped.
    pub fn add_flashcards_with_report(&mut self, text: &str) -> Fallible<Added> {
        let (cards, skipped) = match self.parse_mode {
            ParseMode::Strict => (parse_flashcards(text, ParseMode::Strict)?, 0),
            ParseMode::Lenient => {
                let LenientParse { cards, skipped } = parse_flashcards_lenient(text);
                for err in &skipped {
                    log::warn!("Skipping malformed flashcard: {}", err.message());
                }
                (cards, skipped.len())
            }
        };
        let count = cards.len();
        if count == 0 {
            log::debug!("Input contained no flashcards.");
            return Ok(Added { count, skipped });
        }
        self.session.load_deck(cards, &mut self.rng);
        self.notify_all();
        Ok(Added { count, skipped })
    }

    pub fn reveal_answer(&mut self) -> Fallible<Card> {
        let card = self.session.reveal_answer()?.clone();
        self.observer.on_answer_revealed(&card);
        Ok(card)
    }

    pub fn grade_correct(&mut self) -> Fallible<SessionState> {
        let state = self.session.grade_correct()?;
        self.notify_card();
        self.notify_score();
        Ok(state)
    }

    /// Mark the current card wrong and persist the wrong list. The caller
    /// owns the delay: once it elapses, pass the ticket to
    /// `complete_advance`.
    pub fn grade_wrong(&mut self) -> Fallible<Ticket> {
        self.session.require_gradable()?;
        let card = match self.session.current_card() {
            Some(card) => card.clone(),
            None => return fail(ErrorKind::InvalidState, "no card to grade."),
        };
        let mut wrong: Vec<Card> = self.session.wrong_cards().to_vec();
        wrong.push(card.clone());
        self.db.set(WRONG_LIST_KEY, &cards_to_json(&wrong)?)?;
        let ticket = self.session.grade_wrong()?;
        self.observer.on_answer_revealed(&card);
        self.observer.on_wrong_list_changed(self.session.wrong_cards());
        self.notify_score();
        Ok(ticket)
    }

    /// Apply a scheduled advance. Stale tickets are ignored.
    pub fn complete_advance(&mut self, ticket: Ticket) -> bool {
        let advanced = self.session.complete_advance(ticket);
        if advanced {
            self.notify_card();
            self.notify_score();
        }
        advanced
    }

    pub fn jump_to(&mut self, index: usize) -> Fallible<SessionState> {
        let state = self.session.jump_to(index)?;
        self.notify_card();
        Ok(state)
    }

    pub fn clear_wrong(&mut self) -> Fallible<()> {
        self.db.set(WRONG_LIST_KEY, &cards_to_json(&[])?)?;
        self.session.clear_wrong();
        self.observer.on_wrong_list_changed(self.session.wrong_cards());
        Ok(())
    }

    /// Give the current deck a different set name. Nothing is saved until
    /// `save` is called.
    pub fn rename(&mut self, name: &str) -> Fallible<SetName> {
        let name = SetName::new(name);
        self.session.rename(name.clone())?;
        Ok(name)
    }

    /// Save the whole session under its set name.
    pub fn save(&mut self) -> Fallible<SetName> {
        let name = match self.session.set_name() {
            Some(name) => name.clone(),
            None => return fail(ErrorKind::InvalidState, "add flashcards first to save."),
        };
        let json = self.session.serialize().to_json()?;
        self.db.set(&set_key(&name), &json)?;
        log::debug!("Saved set {name}.");
        self.notify_saved_sets()?;
        Ok(name)
    }

    /// Names of every saved set, most recently saved last.
    pub fn saved_sets(&self) -> Fallible<Vec<SetName>> {
        let names = self
            .saved_set_times()?
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        Ok(names)
    }

    /// Like `saved_sets`, with when each set was last saved.
    pub fn saved_set_times(&self) -> Fallible<Vec<(SetName, Timestamp)>> {
        let sets = self
            .db
            .entries_with_prefix(SET_KEY_PREFIX)?
            .into_iter()
            .filter_map(|entry| {
                set_name_from_key(&entry.key).map(|name| (name, entry.updated_at))
            })
            .collect();
        Ok(sets)
    }

    /// Replace the session with a saved set.
    pub fn load_set(&mut self, name: &str) -> Fallible<SetName> {
        let name = SetName::new(name);
        let json = match self.db.get(&set_key(&name))? {
            Some(json) => json,
            None => return fail(ErrorKind::NotFound, format!("set \"{name}\" not found.")),
        };
        let record = Record::from_json(&json)?;
        self.session
            .replace(Session::deserialize(Some(name.clone()), record));
        log::debug!("Loaded set {name}.");
        self.notify_all();
        Ok(name)
    }

    /// Load the most recently saved set, if there is one.
    pub fn load_last_session(&mut self) -> Fallible<Option<SetName>> {
        match self.saved_sets()?.pop() {
            Some(name) => {
                let name = self.load_set(name.as_str())?;
                log::info!("Last session \"{name}\" loaded on startup.");
                Ok(Some(name))
            }
            None => {
                log::info!("No saved session found on startup.");
                Ok(None)
            }
        }
    }

    pub fn delete_set(&mut self, name: &str) -> Fallible<()> {
        let name = SetName::new(name);
        if !self.db.remove(&set_key(&name))? {
            return fail(ErrorKind::NotFound, format!("set \"{name}\" not found."));
        }
        self.notify_saved_sets()?;
        Ok(())
    }

    /// The latest wrong list as last persisted, which may belong to an
    /// earlier session.
    pub fn stored_wrong_list(&self) -> Fallible<Vec<Card>> {
        match self.db.get(WRONG_LIST_KEY)? {
            Some(json) => cards_from_json(&json),
            None => Ok(Vec::new()),
        }
    }

    pub fn export_deck(&self) -> Fallible<Export> {
        if self.session.deck().is_empty() {
            return fail(ErrorKind::InvalidState, "no flashcards to export.");
        }
        let stem = match self.session.set_name() {
            Some(name) => name.to_string(),
            None => UNNAMED_EXPORT.to_string(),
        };
        Ok(Export {
            file_name: format!("{stem}.json"),
            json: cards_to_pretty_json(self.session.deck())?,
        })
    }

    fn notify_card(&mut self) {
        self.observer.on_card_changed(self.session.current_card());
    }

    fn notify_score(&mut self) {
        let score = self.session.score();
        self.observer
            .on_score_changed(score.correct_count(), score.total_count());
    }

    fn notify_all(&mut self) {
        self.notify_card();
        self.notify_score();
        self.observer.on_wrong_list_changed(self.session.wrong_cards());
    }

    fn notify_saved_sets(&mut self) -> Fallible<()> {
        let sets = self.saved_sets()?;
        self.observer.on_saved_sets_changed(&sets);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Event {
        Card(Option<String>),
        Score(usize, usize),
        Wrong(usize),
        Sets(Vec<String>),
        Revealed(String),
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
    }

    impl SessionObserver for Recorder {
        fn on_card_changed(&mut self, card: Option<&Card>) {
            self.events
                .push(Event::Card(card.map(|c| c.question().to_string())));
        }

        fn on_score_changed(&mut self, correct: usize, total: usize) {
            self.events.push(Event::Score(correct, total));
        }

        fn on_wrong_list_changed(&mut self, list: &[Card]) {
            self.events.push(Event::Wrong(list.len()));
        }

        fn on_saved_sets_changed(&mut self, list: &[SetName]) {
            self.events
                .push(Event::Sets(list.iter().map(|n| n.to_string()).collect()));
        }

        fn on_answer_revealed(&mut self, card: &Card) {
            self.events.push(Event::Revealed(card.answer().to_string()));
        }
    }

    const INPUT: &str = "Flashcard 1\nQuestion: Capital of France?\nAnswer: Paris\n\nFlashcard 2\nQuestion: Capital of Spain?\nAnswer: Madrid\n\nFlashcard 3\nQuestion: Capital of Italy?\nAnswer: Rome\n";

    fn manager() -> Fallible<Manager<Recorder>> {
        let db = Database::in_memory()?;
        Ok(Manager::with_rng(
            db,
            Recorder::default(),
            ParseMode::Strict,
            StdRng::seed_from_u64(3),
        ))
    }

    fn loaded() -> Fallible<Manager<Recorder>> {
        let mut m = manager()?;
        m.add_flashcards(INPUT)?;
        Ok(m)
    }

    #[test]
    fn test_add_flashcards() -> Fallible<()> {
        let mut m = manager()?;
        assert_eq!(
            m.add_flashcards_with_report(INPUT)?,
            Added { count: 3, skipped: 0 }
        );
        assert_eq!(m.session().state(), SessionState::Active);
        assert_eq!(m.session().set_name().unwrap().as_str(), "Capital_of_France_");
        let first = m.session().current_card().unwrap().question().to_string();
        assert_eq!(
            m.observer().events,
            vec![Event::Card(Some(first)), Event::Score(0, 0), Event::Wrong(0)]
        );
        Ok(())
    }

    #[test]
    fn test_add_nothing_keeps_session() -> Fallible<()> {
        let mut m = loaded()?;
        let deck = m.session().deck().to_vec();
        assert_eq!(m.add_flashcards("   \n")?, 0);
        assert_eq!(m.session().deck(), deck.as_slice());
        Ok(())
    }

    #[test]
    fn test_add_malformed_keeps_session() -> Fallible<()> {
        let mut m = loaded()?;
        m.grade_correct()?;
        let err = m.add_flashcards("Flashcard 1\nQuestion: only\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(m.session().position(), 1);
        assert_eq!(m.session().deck().len(), 3);
        Ok(())
    }

    #[test]
    fn test_lenient_mode() -> Fallible<()> {
        let mut m = Manager::with_rng(
            Database::in_memory()?,
            Recorder::default(),
            ParseMode::Lenient,
            StdRng::seed_from_u64(3),
        );
        let added = m.add_flashcards_with_report(
            "Flashcard 1\nQuestion: only\nFlashcard 2\nQuestion: Q\nAnswer: A\n",
        )?;
        assert_eq!(added, Added { count: 1, skipped: 1 });
        assert_eq!(m.session().deck().len(), 1);
        let added = m.add_flashcards_with_report("Flashcard 1\nnothing\n")?;
        assert_eq!(added, Added { count: 0, skipped: 1 });
        assert_eq!(m.session().deck().len(), 1);
        Ok(())
    }

    #[test]
    fn test_grading_on_empty_session() -> Fallible<()> {
        let mut m = manager()?;
        assert_eq!(m.grade_correct().unwrap_err().kind(), ErrorKind::InvalidState);
        assert_eq!(m.grade_wrong().unwrap_err().kind(), ErrorKind::InvalidState);
        assert_eq!(m.jump_to(0).unwrap_err().kind(), ErrorKind::InvalidState);
        assert_eq!(m.reveal_answer().unwrap_err().kind(), ErrorKind::InvalidState);
        assert!(m.observer().events.is_empty());
        Ok(())
    }

    #[test]
    fn test_reveal_does_not_change_state() -> Fallible<()> {
        let mut m = loaded()?;
        let card = m.reveal_answer()?;
        assert_eq!(m.session().position(), 0);
        assert_eq!(m.session().score().total_count(), 0);
        assert_eq!(
            m.observer().events.last(),
            Some(&Event::Revealed(card.answer().to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_grade_wrong_persists_wrong_list() -> Fallible<()> {
        let mut m = loaded()?;
        let card = m.session().current_card().unwrap().clone();
        let ticket = m.grade_wrong()?;
        assert_eq!(m.stored_wrong_list()?, vec![card.clone()]);
        assert_eq!(m.session().position(), 0);
        assert_eq!(m.grade_correct().unwrap_err().kind(), ErrorKind::Busy);
        assert!(m.complete_advance(ticket));
        assert_eq!(m.session().position(), 1);
        assert!(!m.complete_advance(ticket));
        assert_eq!(m.session().position(), 1);
        Ok(())
    }

    #[test]
    fn test_full_pass() -> Fallible<()> {
        let mut m = loaded()?;
        m.grade_correct()?;
        let ticket = m.grade_wrong()?;
        m.complete_advance(ticket);
        let state = m.grade_correct()?;
        assert_eq!(state, SessionState::Exhausted);
        let score = m.session().score();
        assert_eq!(score.correct_count(), 2);
        assert_eq!(score.total_count(), 3);
        assert_eq!(m.observer().events.last(), Some(&Event::Score(2, 3)));
        assert!(m.observer().events.contains(&Event::Card(None)));
        Ok(())
    }

    #[test]
    fn test_clear_wrong() -> Fallible<()> {
        let mut m = loaded()?;
        let ticket = m.grade_wrong()?;
        m.complete_advance(ticket);
        m.clear_wrong()?;
        assert!(m.session().wrong_cards().is_empty());
        assert!(m.stored_wrong_list()?.is_empty());
        m.clear_wrong()?;
        assert!(m.session().wrong_cards().is_empty());
        Ok(())
    }

    #[test]
    fn test_clear_wrong_on_empty_session() -> Fallible<()> {
        let mut m = manager()?;
        m.clear_wrong()?;
        assert_eq!(m.observer().events, vec![Event::Wrong(0)]);
        Ok(())
    }

    #[test]
    fn test_save_requires_deck() -> Fallible<()> {
        let mut m = manager()?;
        assert_eq!(m.save().unwrap_err().kind(), ErrorKind::InvalidState);
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> Fallible<()> {
        let mut m = loaded()?;
        m.grade_correct()?;
        let ticket = m.grade_wrong()?;
        m.complete_advance(ticket);
        let name = m.save()?;
        assert_eq!(
            m.observer().events.last(),
            Some(&Event::Sets(vec![name.to_string()]))
        );
        let deck = m.session().deck().to_vec();
        let wrong = m.session().wrong_cards().to_vec();

        m.add_flashcards("Flashcard 1\nQuestion: Other\nAnswer: Set\n")?;
        assert_eq!(m.session().deck().len(), 1);

        m.load_set(name.as_str())?;
        assert_eq!(m.session().deck(), deck.as_slice());
        assert_eq!(m.session().wrong_cards(), wrong.as_slice());
        assert_eq!(m.session().position(), 2);
        assert_eq!(m.session().score().correct_count(), 1);
        assert_eq!(m.session().score().total_count(), 2);
        assert_eq!(m.session().set_name(), Some(&name));
        Ok(())
    }

    #[test]
    fn test_load_set_supersedes_pending_advance() -> Fallible<()> {
        let mut m = loaded()?;
        let name = m.save()?;
        let old = m.grade_wrong()?;
        m.load_set(name.as_str())?;
        assert_eq!(m.session().pending(), None);
        let new = m.grade_wrong()?;
        assert_ne!(old, new);
        assert!(!m.complete_advance(old));
        assert_eq!(m.session().position(), 0);
        assert_eq!(m.session().pending(), Some(new));
        assert!(m.complete_advance(new));
        assert_eq!(m.session().position(), 1);
        Ok(())
    }

    #[test]
    fn test_load_missing_set() -> Fallible<()> {
        let mut m = loaded()?;
        m.grade_correct()?;
        let deck = m.session().deck().to_vec();
        let err = m.load_set("nope").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(m.session().deck(), deck.as_slice());
        assert_eq!(m.session().position(), 1);
        Ok(())
    }

    #[test]
    fn test_load_corrupt_set() -> Fallible<()> {
        let mut m = loaded()?;
        m.db.set("flashcardSet-broken", "{not json")?;
        let err = m.load_set("broken").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
        assert_eq!(m.session().deck().len(), 3);
        Ok(())
    }

    #[test]
    fn test_load_sanitizes_name() -> Fallible<()> {
        let mut m = loaded()?;
        m.save()?;
        let name = m.load_set("Capital of France?")?;
        assert_eq!(name.as_str(), "Capital_of_France_");
        Ok(())
    }

    #[test]
    fn test_load_record_with_missing_fields() -> Fallible<()> {
        let mut m = manager()?;
        m.db
            .set("flashcardSet-old", r#"{"flashcards":[{"question":"Q","answer":"A"}]}"#)?;
        m.load_set("old")?;
        assert_eq!(m.session().state(), SessionState::Active);
        assert_eq!(m.session().score().total_count(), 0);
        assert!(m.session().wrong_cards().is_empty());
        Ok(())
    }

    #[test]
    fn test_load_last_session() -> Fallible<()> {
        let mut m = manager()?;
        assert_eq!(m.load_last_session()?, None);

        m.add_flashcards("Flashcard 1\nQuestion: First set\nAnswer: A\n")?;
        m.save()?;
        m.add_flashcards("Flashcard 1\nQuestion: Second set\nAnswer: B\n")?;
        m.save()?;
        m.add_flashcards(INPUT)?;

        let loaded = m.load_last_session()?.unwrap();
        assert_eq!(loaded.as_str(), "Second_set");
        assert_eq!(m.session().deck()[0].answer(), "B");
        Ok(())
    }

    #[test]
    fn test_rename() -> Fallible<()> {
        let mut m = manager()?;
        assert_eq!(m.rename("x").unwrap_err().kind(), ErrorKind::InvalidState);
        m.add_flashcards(INPUT)?;
        m.rename("Europe capitals")?;
        let name = m.save()?;
        assert_eq!(name.as_str(), "Europe_capitals");
        assert_eq!(m.saved_sets()?, vec![name]);
        Ok(())
    }

    #[test]
    fn test_delete_set() -> Fallible<()> {
        let mut m = loaded()?;
        let name = m.save()?;
        m.delete_set(name.as_str())?;
        assert!(m.saved_sets()?.is_empty());
        assert_eq!(m.delete_set(name.as_str()).unwrap_err().kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[test]
    fn test_export() -> Fallible<()> {
        let m = manager()?;
        assert_eq!(m.export_deck().err().map(|e| e.kind()), Some(ErrorKind::InvalidState));

        let m = loaded()?;
        let export = m.export_deck()?;
        assert_eq!(export.file_name, "Capital_of_France_.json");
        let cards: Vec<Card> = serde_json::from_str(&export.json)?;
        assert_eq!(cards, m.session().deck());
        assert!(export.json.contains("\n  {\n    \"question\""));
        Ok(())
    }
}
