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

use crate::types::card::Card;
use crate::types::set_name::SetName;

/// Receives change notifications from a `Manager` so a front end can
/// re-render. The manager calls these after a mutation has been applied,
/// never before.
pub trait SessionObserver: Send {
    /// The card on display changed. `None` means there is nothing left to
    /// show.
    fn on_card_changed(&mut self, card: Option<&Card>);

    fn on_score_changed(&mut self, correct: usize, total: usize);

    fn on_wrong_list_changed(&mut self, list: &[Card]);

    fn on_saved_sets_changed(&mut self, list: &[SetName]);

    fn on_answer_revealed(&mut self, _card: &Card) {}
}

/// Writes notifications to the debug log. Used where the front end renders
/// by polling the manager instead.
pub struct LogObserver;

impl SessionObserver for LogObserver {
    fn on_card_changed(&mut self, card: Option<&Card>) {
        match card {
            Some(card) => log::debug!("Showing card: {}", card.question()),
            None => log::debug!("All done."),
        }
    }

    fn on_score_changed(&mut self, correct: usize, total: usize) {
        log::debug!("Score: {correct}/{total}");
    }

    fn on_wrong_list_changed(&mut self, list: &[Card]) {
        log::debug!("Wrong list has {} cards.", list.len());
    }

    fn on_saved_sets_changed(&mut self, list: &[SetName]) {
        log::debug!("{} saved sets.", list.len());
    }

    fn on_answer_revealed(&mut self, card: &Card) {
        log::debug!("Revealed answer: {}", card.answer());
    }
}
