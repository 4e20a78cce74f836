//! Chat session state machine
//!
//! `ChatSession` owns the conversation log and enforces turn-taking:
//!
//! ```text
//! LoggedOut --begin_login--> AwaitingResponse --complete_login--> Idle
//! Idle --begin_*--> AwaitingResponse --complete_*--> Idle
//! ```
//!
//! Reset clears the log in `begin_reset` and holds the session until `/reset_chat`
//! settles.
//!
//! Every network-bound operation is split into a synchronous `begin_*` that
//! validates and records intent, and a `complete_*` that consumes the pending
//! handle together with the backend's result. Only one request may be pending at a
//! time, so a user message is always followed by exactly one assistant message.

use crate::api::{ApiError, ApiResult, ChatReply, ChatRequest, HistoryEntry, OrderRequest};
use crate::types::{ChatMessage, FoodId, MenuCategory, MenuEntry, MessageKind, group_menu};
use std::fmt;
use std::num::NonZeroU32;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";
pub const ORDER_FAILED: &str =
    "Sorry, there was an error processing your order. Please try again.";
pub const MENU_FAILED: &str = "Sorry, I couldn't load the menu right now.";

pub const DEFAULT_QUICK_ACTIONS: &[&str] = &[
    "Recommend me some spicy dishes",
    "What's good for breakfast?",
    "I'm feeling vegetarian today",
    "Something comforting for a rainy evening",
];

pub fn welcome_message(username: &str) -> String {
    format!(
        "Welcome, **{username}**! I'm your personal food recommendation assistant. \
         I can help you discover dishes based on your preferences, mood, or dietary \
         requirements. How can I assist you today?"
    )
}

pub fn order_confirmation(quantity: Quantity, food_name: &str) -> String {
    format!("🎉 Successfully ordered {quantity} {food_name}(s)!")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    Idle,
    AwaitingResponse,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("log in before chatting")]
    NotLoggedIn,

    #[error("another request is still in flight")]
    RequestInFlight,

    #[error("username must not be empty")]
    EmptyUsername,

    #[error("quantity must be a positive whole number, got {0:?}")]
    InvalidQuantity(String),

    #[error(transparent)]
    Storage(#[from] crate::storage::StorageError),
}

/// Number of portions in an order. Always at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    /// Parses user input strictly. Zero, negatives, fractions and junk are rejected.
    pub fn parse(input: &str) -> Result<Self, SessionError> {
        input
            .trim()
            .parse::<NonZeroU32>()
            .map(Self)
            .map_err(|_| SessionError::InvalidQuantity(input.to_string()))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chat turn waiting on the backend.
#[derive(Debug)]
#[must_use = "a pending turn must be completed to return the session to idle"]
pub struct PendingTurn {
    pub request: ChatRequest,
}

#[derive(Debug)]
#[must_use = "a pending order must be completed to return the session to idle"]
pub struct PendingOrder {
    pub request: OrderRequest,
    quantity: Quantity,
    food_name: String,
}

#[derive(Debug)]
#[must_use = "a pending menu request must be completed to return the session to idle"]
pub struct PendingMenu(());

#[derive(Debug)]
#[must_use = "a pending reset must be completed to return the session to idle"]
pub struct PendingReset(());

/// A login waiting on `/login`. Holds the trimmed username.
#[derive(Debug)]
#[must_use = "a pending login must be completed or abandoned"]
pub struct PendingLogin {
    pub username: String,
}

/// Result of a reset. The local log is cleared either way.
#[derive(Debug)]
pub enum ResetOutcome {
    Synced,
    RemoteFailed(ApiError),
}

#[derive(Debug)]
pub struct ChatSession {
    username: Option<String>,
    history: Vec<ChatMessage>,
    pending: bool,
    weather_time_enabled: bool,
    quick_actions: Vec<String>,
    quick_actions_visible: bool,
    typing: Option<CancellationToken>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            username: None,
            history: Vec::new(),
            pending: false,
            weather_time_enabled: false,
            quick_actions: DEFAULT_QUICK_ACTIONS.iter().map(|s| s.to_string()).collect(),
            quick_actions_visible: true,
            typing: None,
        }
    }

    pub fn with_quick_actions(mut self, actions: Vec<String>) -> Self {
        self.quick_actions = actions;
        self
    }

    pub fn state(&self) -> SessionState {
        match (&self.username, self.pending) {
            (None, _) => SessionState::LoggedOut,
            (Some(_), false) => SessionState::Idle,
            (Some(_), true) => SessionState::AwaitingResponse,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn weather_time_enabled(&self) -> bool {
        self.weather_time_enabled
    }

    pub fn set_weather_time(&mut self, enabled: bool) {
        self.weather_time_enabled = enabled;
    }

    pub fn toggle_weather_time(&mut self) -> bool {
        self.weather_time_enabled = !self.weather_time_enabled;
        self.weather_time_enabled
    }

    /// Suggested prompts currently on offer. Empty once the conversation has started.
    pub fn quick_actions(&self) -> &[String] {
        if self.quick_actions_visible {
            &self.quick_actions
        } else {
            &[]
        }
    }

    pub fn quick_action(&self, index: usize) -> Option<&str> {
        self.quick_actions().get(index).map(String::as_str)
    }

    /// The conversation as the backend sees it: prompts and replies only.
    pub fn transcript(&self) -> Vec<HistoryEntry> {
        self.history
            .iter()
            .filter(|msg| msg.kind.is_transcript())
            .map(HistoryEntry::from)
            .collect()
    }

    /// `LoggedOut → Idle` without telling the backend, for a username restored from storage.
    pub fn login(&mut self, username: &str) -> Result<(), SessionError> {
        self.sign_in(username)?;
        Ok(())
    }

    /// `LoggedOut → AwaitingResponse` until the `/login` call settles.
    pub fn begin_login(&mut self, username: &str) -> Result<PendingLogin, SessionError> {
        let username = self.sign_in(username)?;
        self.pending = true;
        Ok(PendingLogin { username })
    }

    /// A failed `/login` is logged and otherwise ignored.
    pub fn complete_login(&mut self, login: PendingLogin, result: ApiResult<()>) {
        self.pending = false;
        if let Err(err) = result {
            warn!(
                error = %err,
                username = %login.username,
                "login request failed, continuing locally"
            );
        }
    }

    /// Returns to `LoggedOut` when the login could not be recorded locally.
    pub fn abandon_login(&mut self, _login: PendingLogin) {
        self.pending = false;
        self.username = None;
    }

    fn sign_in(&mut self, username: &str) -> Result<String, SessionError> {
        if self.pending {
            return Err(SessionError::RequestInFlight);
        }
        let username = username.trim();
        if username.is_empty() {
            return Err(SessionError::EmptyUsername);
        }
        info!(username, "session started");
        self.username = Some(username.to_string());
        Ok(username.to_string())
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        if self.pending {
            return Err(SessionError::RequestInFlight);
        }
        self.cancel_typing();
        self.username = None;
        self.history.clear();
        self.quick_actions_visible = true;
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        match self.state() {
            SessionState::LoggedOut => Err(SessionError::NotLoggedIn),
            SessionState::AwaitingResponse => Err(SessionError::RequestInFlight),
            SessionState::Idle => Ok(()),
        }
    }

    fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.history.push(message);
        &self.history[self.history.len() - 1]
    }

    /// Records the user's message and returns the request to send.
    /// Blank input is ignored and yields `Ok(None)`.
    pub fn begin_turn(&mut self, text: &str) -> Result<Option<PendingTurn>, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        self.ensure_idle()?;
        self.cancel_typing();

        let request = ChatRequest {
            message: text.to_string(),
            history: self.transcript(),
            use_weather_time: self.weather_time_enabled,
        };
        self.push(ChatMessage::user(text));
        self.quick_actions_visible = false;
        self.pending = true;
        Ok(Some(PendingTurn { request }))
    }

    /// Appends the assistant's side of the turn: the reply, or the fallback on any failure.
    pub fn complete_turn(
        &mut self,
        _turn: PendingTurn,
        result: ApiResult<ChatReply>,
    ) -> &ChatMessage {
        self.pending = false;
        let message = match result {
            Ok(reply) => ChatMessage::reply(reply.text, reply.foods),
            Err(err) => {
                warn!(error = %err, "chat turn failed");
                ChatMessage::assistant(MessageKind::Fallback, FALLBACK_REPLY)
            }
        };
        self.push(message)
    }

    /// Looks up a dish by id among the food cards shown so far, newest first.
    pub fn food_name(&self, food_id: &FoodId) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .flat_map(|msg| msg.foods.iter())
            .find(|food| &food.id == food_id)
            .map(|food| food.name.as_str())
    }

    pub fn begin_order(
        &mut self,
        food_id: FoodId,
        quantity: Quantity,
    ) -> Result<PendingOrder, SessionError> {
        self.ensure_idle()?;
        let food_name = self
            .food_name(&food_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("item #{food_id}"));
        self.pending = true;
        Ok(PendingOrder {
            request: OrderRequest::new(food_id, quantity.get()),
            quantity,
            food_name,
        })
    }

    pub fn complete_order(&mut self, order: PendingOrder, result: ApiResult<()>) -> &ChatMessage {
        self.pending = false;
        let content = match result {
            Ok(()) => {
                info!(
                    food_id = %order.request.food_id,
                    quantity = order.quantity.get(),
                    "order placed"
                );
                order_confirmation(order.quantity, &order.food_name)
            }
            Err(err) => {
                warn!(error = %err, food_id = %order.request.food_id, "order failed");
                ORDER_FAILED.to_string()
            }
        };
        self.push(ChatMessage::assistant(MessageKind::Notice, content))
    }

    pub fn begin_menu(&mut self) -> Result<PendingMenu, SessionError> {
        self.ensure_idle()?;
        self.pending = true;
        Ok(PendingMenu(()))
    }

    /// Appends the menu listing (or an apology) and returns the grouped menu on success.
    pub fn complete_menu(
        &mut self,
        _menu: PendingMenu,
        result: ApiResult<Vec<MenuEntry>>,
    ) -> Option<Vec<MenuCategory>> {
        self.pending = false;
        match result {
            Ok(entries) => {
                let groups = group_menu(entries);
                self.push(ChatMessage::assistant(
                    MessageKind::Notice,
                    describe_menu(&groups),
                ));
                Some(groups)
            }
            Err(err) => {
                warn!(error = %err, "menu request failed");
                self.push(ChatMessage::assistant(MessageKind::Notice, MENU_FAILED));
                None
            }
        }
    }

    /// Clears the log in place and greets the user again, then waits on `/reset_chat`.
    /// The local clear is not rolled back if the remote call fails.
    pub fn begin_reset(&mut self) -> Result<PendingReset, SessionError> {
        self.ensure_idle()?;
        self.cancel_typing();
        let username = self.username.clone().unwrap_or_default();
        self.history.clear();
        self.push(ChatMessage::assistant(
            MessageKind::Welcome,
            welcome_message(&username),
        ));
        self.quick_actions_visible = true;
        self.pending = true;
        Ok(PendingReset(()))
    }

    pub fn complete_reset(
        &mut self,
        _reset: PendingReset,
        result: ApiResult<()>,
    ) -> ResetOutcome {
        self.pending = false;
        match result {
            Ok(()) => {
                info!("conversation reset");
                ResetOutcome::Synced
            }
            Err(err) => {
                warn!(error = %err, "remote reset failed after local clear");
                ResetOutcome::RemoteFailed(err)
            }
        }
    }

    /// Cancels any running typing animation and hands out the token for the next one.
    pub fn start_typing(&mut self) -> CancellationToken {
        self.cancel_typing();
        let token = CancellationToken::new();
        self.typing = Some(token.clone());
        token
    }

    pub fn cancel_typing(&mut self) {
        if let Some(token) = self.typing.take() {
            token.cancel();
        }
    }
}

fn describe_menu(groups: &[MenuCategory]) -> String {
    if groups.is_empty() {
        return "The menu is empty right now.".to_string();
    }
    let mut out = String::from("Here's today's menu:");
    for group in groups {
        out.push_str(&format!("\n\n**{}**", group.name));
        for entry in &group.entries {
            if entry.description.is_empty() {
                out.push_str(&format!("\n- {}", entry.name));
            } else {
                out.push_str(&format!("\n- {}: {}", entry.name, entry.description));
            }
        }
    }
    out
}
