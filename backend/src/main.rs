//! Service entry-point: loads settings, wires repositories and serves the
//! customer API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use tenant_customers::inbound::http::health::HealthState;

use server::{
    ServerConfig, ServiceSettings, build_http_state, connect_database, create_server,
    load_session_key, seed_fixture_tenant,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load()
        .map_err(|err| std::io::Error::other(format!("invalid configuration: {err}")))?;
    let key = load_session_key(&settings).map_err(std::io::Error::other)?;
    let pool = connect_database(&settings).await?;
    if let (Some(db), true) = (pool.as_ref(), settings.fixture_login()) {
        seed_fixture_tenant(db).await?;
    }
    let http_state = build_http_state(pool.as_ref(), settings.fixture_login());

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(
        key,
        settings.cookie_secure(),
        settings.bind_addr(),
        http_state,
    );
    info!(bind_addr = settings.bind_addr(), "starting customer service");
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_draining();
    result
}
