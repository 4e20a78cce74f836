use crate::api::ChefBackend;
use crate::session::{ChatSession, Quantity, ResetOutcome, SessionState};
use crate::storage::ProfileStore;
use crate::types::FoodId;
use crate::typing::typing_stream;
use crate::views::{ChatView, LoginModal, Sidebar};
use dioxus::prelude::*;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Everything the widget needs from outside the page, handed in at launch.
#[derive(Clone)]
pub struct ChefContext {
    pub backend: Arc<dyn ChefBackend>,
    pub store: ProfileStore,
    pub typing_delay: Duration,
}

/// The partially revealed text of the message at `index`.
#[derive(Clone, Debug, PartialEq)]
pub struct TypingFrame {
    pub index: usize,
    pub text: String,
}

/// Shared widget state: the session, the running typing frame and the alert text.
#[derive(Clone, Copy)]
pub struct ChatHandles {
    pub session: Signal<ChatSession>,
    pub typing: Signal<Option<TypingFrame>>,
    pub alert: Signal<Option<String>>,
}

fn initial_session(store: &ProfileStore) -> ChatSession {
    let mut session = ChatSession::new();
    match store.load_username() {
        Ok(Some(name)) => {
            if let Err(err) = session.login(&name) {
                warn!(error = %err, "stored username rejected");
            }
        }
        Ok(None) => {}
        Err(err) => warn!(error = %err, "could not read stored username"),
    }
    session
}

#[component]
pub fn App() -> Element {
    let ctx = use_context::<ChefContext>();
    let handles = use_context_provider(|| ChatHandles {
        session: Signal::new(initial_session(&ctx.store)),
        typing: Signal::new(None),
        alert: Signal::new(None),
    });
    let logged_out = handles.session.read().state() == SessionState::LoggedOut;

    rsx! {
        if logged_out {
            LoginModal {}
        } else {
            div { class: "app-layout",
                Sidebar {}
                ChatView {}
            }
        }
        AlertDialog {}
    }
}

#[component]
fn AlertDialog() -> Element {
    let mut alert = use_context::<ChatHandles>().alert;
    let Some(text) = alert() else {
        return rsx! {};
    };
    rsx! {
        div { class: "modal-overlay",
            div { class: "modal", role: "alertdialog",
                p { "{text}" }
                button { class: "btn btn-primary", r#type: "button",
                    onclick: move |_| alert.set(None),
                    "OK"
                }
            }
        }
    }
}

// ---------------
// Session actions
// ---------------

/// Reveals the message at `index` frame by frame until done or superseded.
async fn animate(index: usize, handles: ChatHandles, delay: Duration) {
    let ChatHandles {
        mut session,
        mut typing,
        ..
    } = handles;
    let Some(content) = session.peek().history().get(index).map(|m| m.content.clone()) else {
        return;
    };
    let cancel = session.write().start_typing();
    let mut frames = std::pin::pin!(typing_stream(content, delay, cancel));
    while let Some(text) = frames.next().await {
        typing.set(Some(TypingFrame { index, text }));
    }
    if typing.peek().as_ref().map(|frame| frame.index) == Some(index) {
        typing.set(None);
    }
}

fn last_index(session: Signal<ChatSession>) -> usize {
    session.peek().history().len().saturating_sub(1)
}

pub fn submit_message(text: String, ctx: ChefContext, handles: ChatHandles) {
    let ChatHandles {
        mut session,
        mut typing,
        ..
    } = handles;
    let turn = match session.write().begin_turn(&text) {
        Ok(Some(turn)) => turn,
        Ok(None) => return,
        Err(err) => {
            warn!(error = %err, "submission rejected");
            return;
        }
    };
    typing.set(None);
    spawn(async move {
        let result = ctx.backend.chat(&turn.request).await;
        session.write().complete_turn(turn, result);
        animate(last_index(session), handles, ctx.typing_delay).await;
    });
}

pub fn reset_session(ctx: ChefContext, handles: ChatHandles) {
    let ChatHandles {
        mut session,
        mut typing,
        mut alert,
    } = handles;
    let reset = match session.write().begin_reset() {
        Ok(reset) => reset,
        Err(err) => {
            warn!(error = %err, "reset rejected");
            return;
        }
    };
    typing.set(None);
    spawn(async move {
        let result = ctx.backend.reset_chat().await;
        let outcome = session.write().complete_reset(reset, result);
        if let ResetOutcome::RemoteFailed(err) = outcome {
            alert.set(Some(format!("Could not reset the chat on the server: {err}")));
        }
    });
}

/// Validates the quantity field and places the order. Returns the validation
/// error for display next to the field.
pub fn place_order(
    food_id: FoodId,
    quantity: &str,
    ctx: ChefContext,
    handles: ChatHandles,
) -> Result<(), String> {
    let mut session = handles.session;
    let quantity = Quantity::parse(quantity).map_err(|err| err.to_string())?;
    let order = session
        .write()
        .begin_order(food_id, quantity)
        .map_err(|err| err.to_string())?;
    spawn(async move {
        let result = ctx.backend.order(&order.request).await;
        session.write().complete_order(order, result);
        animate(last_index(session), handles, ctx.typing_delay).await;
    });
    Ok(())
}

pub fn load_menu(ctx: ChefContext, handles: ChatHandles) {
    let mut session = handles.session;
    let pending = match session.write().begin_menu() {
        Ok(pending) => pending,
        Err(err) => {
            warn!(error = %err, "menu request rejected");
            return;
        }
    };
    spawn(async move {
        let result = ctx.backend.menu().await;
        session.write().complete_menu(pending, result);
        animate(last_index(session), handles, ctx.typing_delay).await;
    });
}

/// Starts the session and persists the username. The chat stays locked until
/// `/login` settles. Returns the error for display in the login modal.
pub fn login(name: &str, ctx: ChefContext, handles: ChatHandles) -> Result<(), String> {
    let mut session = handles.session;
    let login = session.write().begin_login(name).map_err(|err| err.to_string())?;
    if let Err(err) = ctx.store.save_username(&login.username) {
        warn!(error = %err, "could not persist username");
        session.write().abandon_login(login);
        return Err(format!("Could not save your name: {err}"));
    }
    spawn(async move {
        let result = ctx.backend.login(&login.username).await;
        session.write().complete_login(login, result);
    });
    Ok(())
}

pub fn logout(ctx: ChefContext, handles: ChatHandles) {
    let ChatHandles {
        mut session,
        mut typing,
        ..
    } = handles;
    if let Err(err) = session.write().logout() {
        warn!(error = %err, "logout rejected");
        return;
    }
    typing.set(None);
    if let Err(err) = ctx.store.forget_username() {
        warn!(error = %err, "could not forget username");
    }
}
