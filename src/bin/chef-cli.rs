//! Terminal front-end for the chef.
//!
//! Drives the same session as the widget from stdin, revealing replies word by word.
//!
//! # Commands
//!
//! - `/quick <n>` - Send suggested prompt number `n`
//! - `/order <food id> <quantity>` - Order a dish from the cards shown
//! - `/menu` - Show today's menu
//! - `/weather` - Toggle weather/time aware recommendations
//! - `/reset` - Start a new conversation
//! - `/logout` - Forget the stored name
//! - `/quit` - Exit

use anyhow::Result;
use chefchat::api::HttpBackend;
use chefchat::config::{ClientConfig, apply_bundled_config};
use chefchat::markup::plain_text;
use chefchat::storage::ProfileStore;
use chefchat::types::{ChatMessage, FoodId};
use chefchat::typing::typing_stream;
use chefchat::{ChefChat, Quantity, ResetOutcome};
use futures::StreamExt;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

const BUNDLED_CONFIG: &str = include_str!("../../assets/config.env");

#[tokio::main]
async fn main() -> Result<()> {
    if dotenvy::dotenv().is_err() {
        apply_bundled_config(BUNDLED_CONFIG);
    }
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env()?;
    let backend = Arc::new(HttpBackend::new(&config)?);
    let mut chat = ChefChat::new(backend, ProfileStore::open(config.storage_dir.clone()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if !chat.resume()? {
        loop {
            let Some(name) = prompt(&mut lines, "What should the chef call you? ").await? else {
                return Ok(());
            };
            match chat.login(&name).await {
                Ok(()) => break,
                Err(err) => println!("{err}"),
            }
        }
    }
    let username = chat.session().username().unwrap_or_default().to_string();
    println!("Hi {username}! Type /help for commands.\n");
    print_quick_actions(&chat);

    while let Some(line) = prompt(&mut lines, "You: ").await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("/quit") => break,
            Some("/help") => print_help(),
            Some("/weather") => {
                let enabled = chat.session_mut().toggle_weather_time();
                println!("Weather/time aware suggestions {}", if enabled { "on" } else { "off" });
            }
            Some("/reset") => {
                if let ResetOutcome::RemoteFailed(err) = chat.reset_session().await? {
                    eprintln!("! Could not reset the chef's memory: {err}");
                }
                show_last(&mut chat, config.typing_delay).await;
                print_quick_actions(&chat);
            }
            Some("/logout") => {
                chat.logout()?;
                println!("Goodbye {username}!");
                break;
            }
            Some("/menu") => {
                chat.load_menu().await?;
                show_last(&mut chat, config.typing_delay).await;
            }
            Some("/order") => {
                let (Some(id), Some(qty)) = (parts.next(), parts.next()) else {
                    println!("Usage: /order <food id> <quantity>");
                    continue;
                };
                let quantity = match Quantity::parse(qty) {
                    Ok(quantity) => quantity,
                    Err(err) => {
                        println!("{err}");
                        continue;
                    }
                };
                let food_id = id.parse::<i64>().map(FoodId::Number).unwrap_or_else(|_| id.into());
                chat.place_order(food_id, quantity).await?;
                show_last(&mut chat, config.typing_delay).await;
            }
            Some("/quick") => {
                let index = parts
                    .next()
                    .and_then(|n| n.parse::<usize>().ok())
                    .and_then(|n| n.checked_sub(1));
                let sent = match index {
                    Some(index) => chat.submit_quick_action(index).await?.is_some(),
                    None => false,
                };
                if sent {
                    show_last(&mut chat, config.typing_delay).await;
                } else {
                    println!("No such suggestion.");
                }
            }
            _ => {
                if chat.submit_message(line).await?.is_some() {
                    show_last(&mut chat, config.typing_delay).await;
                }
            }
        }
    }
    Ok(())
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}

async fn show_last(chat: &mut ChefChat, delay: Duration) {
    if let Some(message) = chat.session().history().last().cloned() {
        show(&message, delay, chat).await;
    }
}

async fn show(message: &ChatMessage, delay: Duration, chat: &mut ChefChat) {
    let cancel = chat.session_mut().start_typing();
    let mut frames = std::pin::pin!(typing_stream(plain_text(&message.content), delay, cancel));
    let mut shown = 0;
    print!("Chef: ");
    while let Some(frame) = frames.next().await {
        print!("{}", &frame[shown..]);
        let _ = std::io::stdout().flush();
        shown = frame.len();
    }
    println!();
    for food in &message.foods {
        println!(
            "  [{}] {} ({}) - {}",
            food.id,
            food.name,
            food.price_label(),
            food.description
        );
    }
    println!();
}

fn print_quick_actions(chat: &ChefChat) {
    let actions = chat.session().quick_actions();
    if actions.is_empty() {
        return;
    }
    println!("Try one of these (/quick <n>):");
    for (i, action) in actions.iter().enumerate() {
        println!("  {}. {}", i + 1, action);
    }
    println!();
}

fn print_help() {
    println!("    /quick <n>            send a suggested prompt");
    println!("    /order <id> <qty>     order a dish from the cards");
    println!("    /menu                 show today's menu");
    println!("    /weather              toggle weather/time aware suggestions");
    println!("    /reset                start over");
    println!("    /logout               forget your name");
    println!("    /quit                 exit");
}
