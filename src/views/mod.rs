pub mod chat;
pub mod food;
pub mod login;
pub mod sidebar;

pub use chat::ChatView;
pub use food::FoodCards;
pub use login::LoginModal;
pub use sidebar::Sidebar;
