use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Where a message in the log came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    /// Text the user submitted.
    Prompt,
    /// The backend's answer to a prompt.
    Reply,
    /// Stand-in reply for a turn whose request failed.
    Fallback,
    /// Canned greeting shown after a reset.
    Welcome,
    /// Local status output: order results, menu listings.
    Notice,
}

impl MessageKind {
    /// Whether messages of this kind are part of the conversation sent back to the backend.
    pub fn is_transcript(self) -> bool {
        matches!(self, MessageKind::Prompt | MessageKind::Reply)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: OffsetDateTime,
    pub kind: MessageKind,
    pub foods: Vec<FoodItem>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, MessageKind::Prompt, content)
    }

    pub fn assistant(kind: MessageKind, content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, kind, content)
    }

    pub fn reply(content: impl Into<String>, foods: Vec<FoodItem>) -> Self {
        Self {
            foods,
            ..Self::new(Role::Assistant, MessageKind::Reply, content)
        }
    }

    fn new(role: Role, kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: OffsetDateTime::now_utc(),
            kind,
            foods: Vec::new(),
        }
    }
}

/// Identifier of a dish. The backend may send either a number or a string and
/// expects the same shape back when ordering.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FoodId {
    Number(i64),
    Text(String),
}

impl fmt::Display for FoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoodId::Number(n) => write!(f, "{n}"),
            FoodId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for FoodId {
    fn from(id: i64) -> Self {
        FoodId::Number(id)
    }
}

impl From<&str> for FoodId {
    fn from(id: &str) -> Self {
        FoodId::Text(id.to_string())
    }
}

pub const PRICE_UNAVAILABLE: &str = "Price N/A";
pub const DEFAULT_FOOD_IMAGE: &str = "default-food-image.jpg";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: FoodId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "price_text")]
    pub price: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl FoodItem {
    pub fn price_label(&self) -> &str {
        self.price.as_deref().unwrap_or(PRICE_UNAVAILABLE)
    }

    pub fn image_src(&self) -> &str {
        self.image_url.as_deref().unwrap_or(DEFAULT_FOOD_IMAGE)
    }
}

// Prices arrive as "₹120", 120 or 12.5 depending on the backend version.
fn price_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub category: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MenuCategory {
    pub name: String,
    pub entries: Vec<MenuEntry>,
}

/// Groups menu entries by category, keeping the order in which categories first appear.
pub fn group_menu(entries: Vec<MenuEntry>) -> Vec<MenuCategory> {
    let mut groups: Vec<MenuCategory> = Vec::new();
    for entry in entries {
        match groups.iter_mut().find(|g| g.name == entry.category) {
            Some(group) => group.entries.push(entry),
            None => groups.push(MenuCategory {
                name: entry.category.clone(),
                entries: vec![entry],
            }),
        }
    }
    groups
}
