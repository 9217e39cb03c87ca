//! Dashboard client entry point.
//!
//! Restores any persisted session and prints the signed-in user together
//! with the menu sections they are allowed to see.

use washdesk_client::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    washdesk_observability::init();

    let config = Config::from_env();
    tracing::info!(api_url = %config.api_url, "starting washdesk client");

    let app = AppState::new(config)?;
    app.restore().await;

    let session = app.store().snapshot().await;
    match session.user() {
        Some(user) => println!("signed in as {} <{}>", user.name, user.email),
        None => println!("no persisted session; sign in to continue"),
    }

    for section in app.visible_menu().await {
        println!("{}", section.title);
        for entry in &section.entries {
            println!("  {}", entry.name);
            for sub in &entry.sub_items {
                println!("    {}", sub.name);
            }
        }
    }

    app.shutdown().await;
    Ok(())
}
