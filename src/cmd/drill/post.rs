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

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use crate::cmd::drill::advance::cancel_advance;
use crate::cmd::drill::advance::schedule_advance;
use crate::cmd::drill::state::ServerState;
use crate::error::ErrorKind;
use crate::error::Fallible;
use crate::error::fail;

#[derive(Debug, Deserialize)]
enum Action {
    Add,
    Hint,
    Correct,
    Wrong,
    Jump,
    Save,
    #[serde(rename = "Saved Sets")]
    ShowSets,
    Load,
    Delete,
    #[serde(rename = "Clear Wrong", alias = "ClearWrong")]
    ClearWrong,
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    index: Option<usize>,
    #[serde(default)]
    name: Option<String>,
}

pub async fn post_handler(State(state): State<ServerState>, Form(form): Form<FormData>) -> Redirect {
    if let Err(e) = action_handler(&state, form) {
        match e.kind() {
            ErrorKind::Busy => log::debug!("{e}"),
            _ => log::error!("{e}"),
        }
        state.lock().message = Some(e.message().to_string());
    }
    Redirect::to("/")
}

fn action_handler(state: &ServerState, form: FormData) -> Fallible<()> {
    let mut mutable = state.lock();
    let mutable = &mut *mutable;
    match form.action {
        Action::Add => {
            let text = form.text.unwrap_or_default();
            let added = mutable.manager.add_flashcards_with_report(&text)?;
            if added.count > 0 {
                cancel_advance(mutable);
                mutable.reveal = false;
            }
            if added.skipped > 0 {
                mutable.message = Some(format!(
                    "Added {} flashcards, skipped {} malformed block(s).",
                    added.count, added.skipped
                ));
            }
        }
        Action::Hint => {
            mutable.manager.reveal_answer()?;
            mutable.reveal = true;
        }
        Action::Correct => {
            mutable.manager.grade_correct()?;
            mutable.reveal = false;
        }
        Action::Wrong => {
            let ticket = mutable.manager.grade_wrong()?;
            mutable.reveal = true;
            schedule_advance(&state.mutable, mutable, ticket, state.auto_advance);
        }
        Action::Jump => {
            let index = match form.index {
                Some(index) => index,
                None => return fail(ErrorKind::InvalidState, "no card selected."),
            };
            mutable.manager.jump_to(index)?;
            cancel_advance(mutable);
            mutable.reveal = false;
        }
        Action::Save => {
            let name = mutable.manager.save()?;
            mutable.message = Some(format!("Flashcard set \"{name}\" saved!"));
        }
        Action::ShowSets => {
            mutable.show_sets = !mutable.show_sets;
        }
        Action::Load => {
            let name = form.name.unwrap_or_default();
            let name = mutable.manager.load_set(&name)?;
            cancel_advance(mutable);
            mutable.reveal = false;
            mutable.show_sets = false;
            mutable.message = Some(format!("Flashcard set \"{name}\" loaded!"));
        }
        Action::Delete => {
            let name = form.name.unwrap_or_default();
            mutable.manager.delete_set(&name)?;
        }
        Action::ClearWrong => {
            mutable.manager.clear_wrong()?;
        }
    }
    Ok(())
}
