//! auditlens: audit log admin list view with narrated diffs of extra data.
//! Used by: binary entrypoint.

pub mod audit;
pub mod config;
pub mod console;
pub mod diff;
pub mod error;
pub mod handlers;
pub mod links;
pub mod listview;
pub mod markup;
pub mod server;
pub mod state;
pub mod telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = config::Config::from_env()?;
    let state = state::build_state(&config)?;
    tracing::info!(addr = %config.bind_addr, db = %config.db_path, "starting auditlens");

    console::print_banner();
    console::print_startup(&config);
    server::run(state, &config.bind_addr).await?;
    Ok(())
}
