use barberpro::router::init_router;
use barberpro::state::init_app_state;
use barberpro_config::ServerConfig;
use barberpro_observability::init_console_logging;
use dotenvy::dotenv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_console_logging();

    let state = init_app_state()?;
    let app = init_router(state);

    let server = ServerConfig::from_env();
    let listener = tokio::net::TcpListener::bind(&server.bind_addr).await?;
    tracing::info!(addr = %server.bind_addr, "listening");
    println!("🚀 Server running on http://{}", server.bind_addr);
    println!("🩺 Connection test available at http://{}/test", server.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
