use crate::api::ChefBackend;
use crate::session::{ChatSession, Quantity, ResetOutcome, SessionError};
use crate::storage::ProfileStore;
use crate::types::{ChatMessage, FoodId, MenuCategory};
use std::sync::Arc;

/// Drives a [`ChatSession`] against a backend.
///
/// Backend failures never escape from the turn-level operations; they end up in the
/// log as fallback or notice messages. Only state-machine violations are returned.
pub struct ChefChat {
    session: ChatSession,
    backend: Arc<dyn ChefBackend>,
    store: ProfileStore,
}

impl ChefChat {
    pub fn new(backend: Arc<dyn ChefBackend>, store: ProfileStore) -> Self {
        Self {
            session: ChatSession::new(),
            backend,
            store,
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ChatSession {
        &mut self.session
    }

    pub fn backend(&self) -> Arc<dyn ChefBackend> {
        Arc::clone(&self.backend)
    }

    /// Logs in with the stored username, if there is one. No request is made.
    pub fn resume(&mut self) -> Result<bool, SessionError> {
        match self.store.load_username()? {
            Some(username) => {
                self.session.login(&username)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Stores the username and announces it to the backend. A failed `/login` is
    /// logged and otherwise ignored. If the username cannot be stored the session
    /// stays logged out.
    pub async fn login(&mut self, username: &str) -> Result<(), SessionError> {
        let login = self.session.begin_login(username)?;
        if let Err(err) = self.store.save_username(&login.username) {
            self.session.abandon_login(login);
            return Err(err.into());
        }
        let result = self.backend.login(&login.username).await;
        self.session.complete_login(login, result);
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.session.logout()?;
        self.store.forget_username()?;
        Ok(())
    }

    /// Runs one turn. Returns the assistant message, or `None` for blank input.
    pub async fn submit_message(
        &mut self,
        text: &str,
    ) -> Result<Option<ChatMessage>, SessionError> {
        let Some(turn) = self.session.begin_turn(text)? else {
            return Ok(None);
        };
        let result = self.backend.chat(&turn.request).await;
        Ok(Some(self.session.complete_turn(turn, result).clone()))
    }

    /// Submits the quick action at `index` as if typed. Unknown indices do nothing.
    pub async fn submit_quick_action(
        &mut self,
        index: usize,
    ) -> Result<Option<ChatMessage>, SessionError> {
        let Some(text) = self.session.quick_action(index).map(str::to_string) else {
            return Ok(None);
        };
        self.submit_message(&text).await
    }

    /// Clears the local log, then asks the backend to forget the conversation.
    /// The local clear stands even when the remote call fails.
    pub async fn reset_session(&mut self) -> Result<ResetOutcome, SessionError> {
        let reset = self.session.begin_reset()?;
        let result = self.backend.reset_chat().await;
        Ok(self.session.complete_reset(reset, result))
    }

    pub async fn place_order(
        &mut self,
        food_id: FoodId,
        quantity: Quantity,
    ) -> Result<ChatMessage, SessionError> {
        let order = self.session.begin_order(food_id, quantity)?;
        let result = self.backend.order(&order.request).await;
        Ok(self.session.complete_order(order, result).clone())
    }

    pub async fn load_menu(&mut self) -> Result<Option<Vec<MenuCategory>>, SessionError> {
        let pending = self.session.begin_menu()?;
        let result = self.backend.menu().await;
        Ok(self.session.complete_menu(pending, result))
    }
}
