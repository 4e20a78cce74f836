use crate::ui::{ChatHandles, ChefContext, load_menu, logout, reset_session, submit_message};
use dioxus::prelude::*;

#[component]
pub fn Sidebar() -> Element {
    let ctx = use_context::<ChefContext>();
    let handles = use_context::<ChatHandles>();
    let mut session = handles.session;

    let snapshot = session.read();
    let username = snapshot.username().unwrap_or_default().to_string();
    let quick_actions = snapshot.quick_actions().to_vec();
    let weather_time = snapshot.weather_time_enabled();
    let pending = snapshot.is_pending();
    drop(snapshot);

    let reset_ctx = ctx.clone();
    let menu_ctx = ctx.clone();
    let logout_ctx = ctx.clone();

    rsx! {
        aside { class: "sidebar",
            div { class: "sidebar-header",
                div { class: "username", "{username}" }
                button {
                    class: "btn btn-ghost new-chat-button",
                    r#type: "button",
                    disabled: pending,
                    onclick: move |_| reset_session(reset_ctx.clone(), handles),
                    "New chat"
                }
            }
            if !quick_actions.is_empty() {
                div { class: "sidebar-section",
                    h3 { class: "section-title", "Try asking" }
                    ul { class: "tips-list",
                        for action in quick_actions {
                            li {
                                key: "{action}",
                                class: "suggestion-btn",
                                onclick: {
                                    let ctx = ctx.clone();
                                    let text = action.clone();
                                    move |_| submit_message(text.clone(), ctx.clone(), handles)
                                },
                                "\"{action}\""
                            }
                        }
                    }
                }
            }
            div { class: "sidebar-section",
                label { class: "toggle",
                    input {
                        r#type: "checkbox",
                        checked: weather_time,
                        onchange: move |_| {
                            session.write().toggle_weather_time();
                        },
                    }
                    span { "Use weather & time of day" }
                }
                button {
                    class: "btn btn-ghost action-btn",
                    r#type: "button",
                    disabled: pending,
                    onclick: move |_| load_menu(menu_ctx.clone(), handles),
                    "View Menu"
                }
                button {
                    class: "btn btn-ghost action-btn",
                    r#type: "button",
                    disabled: pending,
                    onclick: move |_| logout(logout_ctx.clone(), handles),
                    "Switch user"
                }
            }
        }
    }
}
