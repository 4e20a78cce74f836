use chefchat::api::{ChefBackend, HttpBackend};
use chefchat::config::{ClientConfig, apply_bundled_config};
use chefchat::storage::ProfileStore;
use chefchat::ui::{App, ChefContext};
use std::sync::Arc;

#[cfg(not(any(feature = "web", feature = "desktop")))]
compile_error!("the chefchat app needs a renderer: build with `--features web` or `--features desktop`");

/// Bundled config for builds without a .env (web, packaged desktop)
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

#[cfg(not(target_arch = "wasm32"))]
fn load_dotenv() {
    // First try to load from .env file (desktop dev)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    apply_bundled_config(BUNDLED_CONFIG);
}

#[cfg(target_arch = "wasm32")]
fn load_dotenv() {
    apply_bundled_config(BUNDLED_CONFIG);
}

fn main() -> anyhow::Result<()> {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ClientConfig::from_env()?;
    let backend: Arc<dyn ChefBackend> = Arc::new(HttpBackend::new(&config)?);
    let context = ChefContext {
        backend,
        store: ProfileStore::open(config.storage_dir.clone()),
        typing_delay: config.typing_delay,
    };

    #[cfg(feature = "desktop")]
    let builder = dioxus::LaunchBuilder::desktop();
    #[cfg(all(feature = "web", not(feature = "desktop")))]
    let builder = dioxus::LaunchBuilder::web();

    builder.with_context(context).launch(App);
    Ok(())
}
