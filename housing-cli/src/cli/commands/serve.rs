use anyhow::Result;

use crate::api::{AppState, create_app, run_server};
use crate::config::{Settings, repository};

pub async fn handle_serve_command(mut settings: Settings, bind: Option<String>) -> Result<()> {
    if let Some(bind) = bind {
        settings.bind = bind;
    }
    if settings.uses_default_secret() {
        log::warn!("Using the default signing key; set HOUSING_SECRET_KEY before exposing the API");
    }

    let pool = repository::connect(&settings.database_url).await?;
    let addr = settings.bind.clone();
    let app = create_app(AppState::new(pool, settings));
    run_server(app, &addr).await
}
