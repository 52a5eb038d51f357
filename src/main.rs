use std::sync::Arc;

use movai_client::{
    coordinators::FeedCoordinator,
    models::SurveyFilters,
    nav::{Navigator, Route},
    session::SessionStore,
    Config, HttpBackend, MovieBackend,
};
use tracing_subscriber::EnvFilter;

/// Headless smoke flow: resolve the entry route and, when signed in, run one
/// guarded feed load against the configured backend.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let backend: Arc<dyn MovieBackend> = Arc::new(HttpBackend::new(&config)?);
    let sessions = SessionStore::open(&config.session_path);
    let navigator = Navigator::new(sessions.clone());

    let entry = navigator.resolve_entry().await;
    tracing::info!(route = ?entry, "Entry route resolved");

    if let Some(user_id) = sessions.user_id().await {
        let feed = FeedCoordinator::new(backend.clone(), config.feed_size);
        feed.load(user_id, &SurveyFilters::default()).await;

        match feed.state().await {
            movai_client::coordinators::ViewState::Ready(view) => {
                println!("Welcome{}", match view.display_name.as_str() {
                    "" => String::new(),
                    name => format!(", {}", name),
                });
                if let Some(featured) = &view.featured {
                    println!("Featured: {} ({:.2})", featured.title, featured.predicted_rating);
                }
                for rec in &view.recommended {
                    println!("  {} ({:.2})", rec.title, rec.predicted_rating);
                }
            }
            movai_client::coordinators::ViewState::Failed(message) => {
                eprintln!("Feed unavailable: {}", message);
            }
            movai_client::coordinators::ViewState::Loading => {}
        }
    } else {
        println!("No session; landing on {:?}. Sign in to see recommendations.", Route::Home);
    }

    Ok(())
}
