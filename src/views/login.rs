use crate::ui::{ChatHandles, ChefContext, login};
use dioxus::events::Key;
use dioxus::prelude::*;

/// Name prompt shown until a username is known.
#[component]
pub fn LoginModal() -> Element {
    let ctx = use_context::<ChefContext>();
    let handles = use_context::<ChatHandles>();
    let mut name = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);

    let mut save = move || {
        if let Err(message) = login(&name(), ctx.clone(), handles) {
            error.set(Some(message));
        }
    };
    let mut save_on_enter = save.clone();

    rsx! {
        div { class: "modal-overlay",
            div { class: "modal name-modal",
                h2 { "Welcome! What's your name?" }
                input {
                    id: "nameInput",
                    r#type: "text",
                    placeholder: "Your name",
                    value: "{name}",
                    autofocus: true,
                    oninput: move |ev| name.set(ev.value()),
                    onkeydown: move |ev: KeyboardEvent| {
                        if ev.key() == Key::Enter {
                            ev.prevent_default();
                            save_on_enter();
                        }
                    },
                }
                if let Some(message) = error() {
                    p { class: "modal-error", "{message}" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| save(),
                    "Start chatting"
                }
            }
        }
    }
}
