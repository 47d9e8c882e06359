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

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::time::sleep;

use crate::cmd::drill::get::download_handler;
use crate::cmd::drill::get::get_handler;
use crate::cmd::drill::post::post_handler;
use crate::cmd::drill::state::MutableState;
use crate::cmd::drill::state::ServerState;
use crate::cmd::open_manager;
use crate::config::Config;
use crate::error::Fallible;

/// Serve the drill page. With `preload`, the text is parsed into a fresh
/// deck; otherwise the most recently saved set is restored.
pub async fn start_server(config: Config, preload: Option<String>) -> Fallible<()> {
    let mut manager = open_manager(&config)?;
    let mut message = None;
    match preload {
        Some(text) => {
            let count = manager.add_flashcards(&text)?;
            log::debug!("Preloaded {count} cards.");
        }
        None => {
            if let Some(name) = manager.load_last_session()? {
                log::debug!("Resumed set {name}.");
                message = Some(format!("Flashcard set \"{name}\" loaded!"));
            }
        }
    }

    let state = ServerState {
        port: config.port,
        auto_advance: config.auto_advance_delay(),
        mutable: Arc::new(Mutex::new(MutableState {
            manager,
            reveal: false,
            show_sets: false,
            message,
            advance: None,
        })),
    };
    let bind = format!("127.0.0.1:{}", state.port);
    let app = Router::new();
    let app = app.route("/", get(get_handler).post(post_handler));
    let app = app.route("/download", get(download_handler));
    let app = app.route("/script.js", get(script));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);

    if config.open_browser {
        // Start a separate task to open the browser.
        let url = format!("http://{bind}/");
        let addr = bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&addr).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            if let Err(e) = open::that(&url) {
                log::warn!("Failed to open browser: {e}");
            }
        });
    }

    log::debug!("Starting server on {bind}");
    println!("Serving on http://{bind}/");
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::debug!("Shutting down.");
}

async fn script() -> (StatusCode, [(HeaderName, &'static str); 1], &'static str) {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/javascript")],
        include_str!("script.js"),
    )
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}
