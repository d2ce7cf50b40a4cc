use askama_axum::Template;
use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::api::session;
use crate::chat::{Message, SessionStore, MESSAGE_QUOTA};
use crate::config::SessionConfig;
use crate::error::PostRejection;

const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");

/// Shared state for the web handlers
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub session: SessionConfig,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    messages_remaining: u32,
    needs_registration: bool,
    quota: u32,
}

#[derive(Template)]
#[template(path = "messages.html")]
struct MessagesTemplate {
    messages: Vec<MessageRow>,
}

#[derive(Template)]
#[template(path = "limit_reached.html")]
struct LimitReachedTemplate {
    quota: u32,
}

#[derive(Template)]
#[template(path = "register_prompt.html")]
struct RegisterPromptTemplate {
    quota: u32,
}

#[derive(Debug)]
struct MessageRow {
    content: String,
    time: String,
}

impl From<&Message> for MessageRow {
    fn from(message: &Message) -> Self {
        MessageRow {
            content: message.content.clone(),
            time: message.timestamp.format("%H:%M").to_string(),
        }
    }
}

#[derive(Deserialize)]
pub struct PostForm {
    #[serde(default)]
    message: String,
}

async fn render_feed(store: &SessionStore) -> MessagesTemplate {
    let messages = store.list_messages().await;
    MessagesTemplate {
        messages: messages.iter().map(MessageRow::from).collect(),
    }
}

fn with_trigger(mut response: Response, payload: serde_json::Value) -> Response {
    match HeaderValue::from_str(&payload.to_string()) {
        Ok(value) => {
            response.headers_mut().insert(HX_TRIGGER, value);
        }
        Err(e) => warn!("Could not encode HX-Trigger header: {}", e),
    }
    response
}

// Main page (GET /)
pub async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let token = session::read_token(&headers, &state.session.cookie_name);
    let view = state.store.handle_view(token.as_deref()).await;

    let page = IndexTemplate {
        messages_remaining: view.remaining,
        needs_registration: view.remaining == 0,
        quota: MESSAGE_QUOTA,
    };

    session::attach_if_new(page.into_response(), &state.session, &view.identity, view.is_new)
}

// Feed fragment (GET /get-messages)
pub async fn get_messages(State(state): State<Arc<AppState>>) -> Response {
    render_feed(&state.store).await.into_response()
}

// Post form submission (POST /post-message)
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<PostForm>,
) -> Response {
    let token = session::read_token(&headers, &state.session.cookie_name);
    let receipt = state.store.handle_post(token.as_deref(), &form.message).await;

    let response = match receipt.outcome {
        Ok(posted) => {
            let feed = render_feed(&state.store).await.into_response();
            with_trigger(
                feed,
                serde_json::json!({ "updateCounter": posted.remaining_after.to_string() }),
            )
        }
        Err(PostRejection::QuotaExceeded) => with_trigger(
            LimitReachedTemplate {
                quota: MESSAGE_QUOTA,
            }
            .into_response(),
            serde_json::json!({ "showRegistration": true }),
        ),
        Err(PostRejection::EmptyContent) => {
            (StatusCode::BAD_REQUEST, PostRejection::EmptyContent.to_string()).into_response()
        }
        Err(PostRejection::UnknownIdentity) => (
            StatusCode::UNAUTHORIZED,
            PostRejection::UnknownIdentity.to_string(),
        )
            .into_response(),
    };

    session::attach_if_new(response, &state.session, &receipt.identity, receipt.is_new)
}

// Account creation modal (GET /register-prompt). Registration is not
// implemented; the form only renders.
pub async fn register_prompt() -> impl IntoResponse {
    RegisterPromptTemplate {
        quota: MESSAGE_QUOTA,
    }
}

// Modal dismissal (GET /close-modal)
pub async fn close_modal() -> impl IntoResponse {
    Html("")
}
