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

use std::time::Duration;

use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CONTENT_DISPOSITION;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use maud::Markup;
use maud::html;

use crate::cmd::drill::state::MutableState;
use crate::cmd::drill::state::ServerState;
use crate::cmd::drill::template::page_template;
use crate::manager::Export;
use crate::session::SessionState;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let mut mutable = state.lock();
    let reload_ms = mutable
        .manager
        .session()
        .pending()
        .map(|_| reload_delay_ms(state.auto_advance));
    let body = render_page(&mut mutable);
    let html = page_template(body, reload_ms);
    (StatusCode::OK, Html(html.into_string()))
}

/// The delay in whole milliseconds, saturating at `u64::MAX`.
fn reload_delay_ms(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

fn render_page(mutable: &mut MutableState) -> Markup {
    let message = mutable.message.take();
    let saved_sets = if mutable.show_sets {
        match mutable.manager.saved_sets() {
            Ok(sets) => Some(sets),
            Err(e) => {
                log::error!("{e}");
                Some(Vec::new())
            }
        }
    } else {
        None
    };
    let session = mutable.manager.session();
    let score = session.score();
    let busy = session.pending().is_some();
    let active = session.state() == SessionState::Active;
    let set_name = session.set_name().map(|name| name.to_string());

    let card_content = match session.state() {
        SessionState::Empty => html! {
            div.question { "Paste some flashcards to begin." }
            div.answer {}
        },
        SessionState::Exhausted => html! {
            div.question { "All done!" }
            div.answer {}
        },
        SessionState::Active => match session.current_card() {
            Some(card) => {
                if mutable.reveal {
                    html! {
                        div.question { (card.question()) }
                        div.answer { (card.answer()) }
                    }
                } else {
                    html! {
                        div.question { (card.question()) }
                        div.answer.hidden {}
                    }
                }
            }
            None => html! {},
        },
    };

    html! {
        div.root {
            div.header {
                h1 { "flashset" }
                @if let Some(name) = &set_name {
                    div.set-name { (name) }
                }
            }
            @if let Some(message) = message {
                div.message { (message) }
            }
            form.input action="/" method="post" {
                textarea name="text" rows="8" placeholder="Flashcard 1\nQuestion: ...\nAnswer: ..." {}
                input id="add" type="submit" name="action" value="Add";
            }
            div.card {
                (card_content)
                form.controls action="/" method="post" {
                    @if active {
                        input id="hint" type="submit" name="action" value="Hint";
                    } @else {
                        input id="hint" type="submit" name="action" value="Hint" disabled;
                    }
                    @if active && !busy {
                        input id="correct" type="submit" name="action" value="Correct";
                        input id="wrong" type="submit" name="action" value="Wrong";
                    } @else {
                        input id="correct" type="submit" name="action" value="Correct" disabled;
                        input id="wrong" type="submit" name="action" value="Wrong" disabled;
                    }
                }
                div.score {
                    (format!("Score: {}/{}", score.correct_count(), score.total_count()))
                    @if active {
                        span.progress {
                            (format!(" · Card {} of {}", session.position() + 1, session.deck().len()))
                        }
                    }
                }
            }
            form.sets action="/" method="post" {
                input id="save" type="submit" name="action" value="Save";
                input id="show-sets" type="submit" name="action" value="Saved Sets";
                input id="clear-wrong" type="submit" name="action" value="Clear Wrong";
                a id="download" href="/download" { "Download" }
            }
            @if let Some(sets) = saved_sets {
                div.saved-sets {
                    @if sets.is_empty() {
                        "No saved flashcard sets found."
                    } @else {
                        ul {
                            @for name in &sets {
                                li {
                                    form action="/" method="post" {
                                        input type="hidden" name="name" value=(name.as_str());
                                        input type="submit" name="action" value="Load";
                                        span { (name.as_str()) }
                                        input type="submit" name="action" value="Delete";
                                    }
                                }
                            }
                        }
                    }
                }
            }
            div.lists {
                div.question-list {
                    h2 { "Questions" }
                    form action="/" method="post" {
                        input type="hidden" name="action" value="Jump";
                        @for (index, card) in session.deck().iter().enumerate() {
                            button.question-item type="submit" name="index" value=(index) {
                                (format!("{}. {}", index + 1, card.question()))
                            }
                        }
                    }
                }
                div.wrong-list {
                    h2 { "Wrong" }
                    @for (index, card) in session.wrong_cards().iter().enumerate() {
                        div.wrong-item {
                            (format!("{}. {}", index + 1, card.question()))
                        }
                    }
                }
            }
        }
    }
}

pub async fn download_handler(
    State(state): State<ServerState>,
) -> Result<(StatusCode, [(HeaderName, String); 2], String), (StatusCode, Html<String>)> {
    let mutable = state.lock();
    match mutable.manager.export_deck() {
        Ok(Export { file_name, json }) => Ok((
            StatusCode::OK,
            [
                (CONTENT_TYPE, "application/json".to_string()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{file_name}\""),
                ),
            ],
            json,
        )),
        Err(e) => Err((
            StatusCode::NOT_FOUND,
            Html(e.message().to_string()),
        )),
    }
}
