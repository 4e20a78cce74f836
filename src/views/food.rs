use crate::types::FoodItem;
use crate::ui::{ChatHandles, ChefContext, place_order};
use dioxus::prelude::*;

#[component]
pub fn FoodCards(foods: Vec<FoodItem>) -> Element {
    rsx! {
        div { class: "message bot food-cards",
            for food in foods {
                FoodCard { key: "{food.id}", food }
            }
        }
    }
}

#[component]
fn FoodCard(food: FoodItem) -> Element {
    let ctx = use_context::<ChefContext>();
    let handles = use_context::<ChatHandles>();
    let mut quantity = use_signal(|| "1".to_string());
    let mut error = use_signal(|| Option::<String>::None);
    let pending = handles.session.read().is_pending();

    let food_id = food.id.clone();
    let on_order = move |_| {
        let result = place_order(food_id.clone(), &quantity(), ctx.clone(), handles);
        error.set(result.err());
    };

    rsx! {
        div { class: "food-card",
            img { class: "food-card-image", src: "{food.image_src()}", alt: "{food.name}" }
            div { class: "food-card-body",
                div { class: "food-card-header",
                    h3 { class: "food-card-title", "{food.name}" }
                    span { class: "food-card-price", "{food.price_label()}" }
                }
                p { class: "food-card-description", "{food.description}" }
                div { class: "food-card-order",
                    input {
                        class: "quantity-input",
                        r#type: "number",
                        min: "1",
                        value: "{quantity}",
                        oninput: move |ev| quantity.set(ev.value()),
                    }
                    button {
                        class: "order-button",
                        r#type: "button",
                        disabled: pending,
                        onclick: on_order,
                        "Order"
                    }
                }
                if let Some(message) = error() {
                    p { class: "food-card-error", "{message}" }
                }
            }
        }
    }
}
