use crate::markup::format_message;
use crate::session::welcome_message;
use crate::types::{ChatMessage, Role};
use crate::ui::{ChatHandles, ChefContext, submit_message};
use crate::views::FoodCards;
use dioxus::events::Key;
use dioxus::prelude::*;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

fn format_message_timestamp(timestamp: OffsetDateTime) -> Option<String> {
    let mut datetime = timestamp;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

fn role_class(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "bot",
    }
}

#[component]
pub fn ChatView() -> Element {
    let ctx = use_context::<ChefContext>();
    let handles = use_context::<ChatHandles>();
    let mut input = use_signal(String::new);

    let session = handles.session.read();
    let typing = handles.typing.read().clone();
    let pending = session.is_pending();
    let username = session.username().unwrap_or_default().to_string();
    let messages: Vec<(usize, ChatMessage)> =
        session.history().iter().cloned().enumerate().collect();
    drop(session);
    let empty = messages.is_empty();

    let mut send = move || {
        let text = input();
        if text.trim().is_empty() {
            return;
        }
        input.set(String::new());
        submit_message(text, ctx.clone(), handles);
    };
    let mut send_on_enter = send.clone();

    rsx! {
        div { class: "chat-container",
            div { id: "chat-messages", class: "chat-messages",
                if empty {
                    div { class: "message bot",
                        div { class: "message-content",
                            h2 { "Welcome to Food AI Chat" }
                            p { dangerous_inner_html: "{format_message(&welcome_message(&username))}" }
                        }
                    }
                }
                for (i, msg) in messages {
                    MessageRow {
                        key: "{i}",
                        text: match &typing {
                            Some(frame) if frame.index == i => frame.text.clone(),
                            _ => msg.content.clone(),
                        },
                        revealing: matches!(&typing, Some(frame) if frame.index == i),
                        message: msg,
                    }
                }
                if pending {
                    div { class: "message bot",
                        div { class: "message-content",
                            div { class: "typing-indicator", span {} span {} span {} }
                        }
                    }
                }
            }
            div { class: "chat-input",
                textarea {
                    id: "user-input",
                    rows: "1",
                    placeholder: "Ask the chef for a recommendation...",
                    value: "{input}",
                    disabled: pending,
                    oninput: move |ev| input.set(ev.value()),
                    onkeydown: move |ev: KeyboardEvent| {
                        if ev.key() == Key::Enter && !ev.modifiers().shift() {
                            ev.prevent_default();
                            send_on_enter();
                        }
                    },
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: pending || input().trim().is_empty(),
                    onclick: move |_| send(),
                    "Send"
                }
            }
        }
    }
}

#[component]
fn MessageRow(message: ChatMessage, text: String, revealing: bool) -> Element {
    let class = role_class(message.role);
    let html = format_message(&text);
    rsx! {
        div { class: "message {class}",
            div { class: "message-content",
                if matches!(message.role, Role::Assistant) {
                    div { class: "chef-name", "Chef" }
                }
                div { class: "message-text", dangerous_inner_html: "{html}" }
                if let Some(ts) = format_message_timestamp(message.timestamp) {
                    div { class: "message-timestamp", "{ts}" }
                }
            }
        }
        if !message.foods.is_empty() && !revealing {
            FoodCards { foods: message.foods.clone() }
        }
    }
}
