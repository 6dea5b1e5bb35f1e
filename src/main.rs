use coursedesk::config::CONFIG;
use coursedesk::db::{self, Storage};
use coursedesk::router::{DeskState, desk_router};
use coursedesk::session;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &*CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        listen_addr = %cfg.listen_addr,
        loglevel = %cfg.loglevel,
        seed_demo_data = cfg.seed_demo_data
    );

    let pool = db::connect(&cfg.database_url).await?;
    let storage = Storage::new(pool);
    storage.init_schema().await?;

    if cfg.seed_demo_data {
        db::seed::seed_demo_data(&storage).await?;
    }

    let key = session::cookie_key(&cfg.session_secret);
    let state = DeskState::new(storage, key, cfg.insecure_cookie);
    let app = desk_router(state);

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
