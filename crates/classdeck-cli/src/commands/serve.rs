//! `classdeck serve` - start the admin dashboard.

use anyhow::{Context, Result};
use classdeck_core::ClassdeckConfig;
use classdeck_dashboard::{AppState, DashboardServer};

pub async fn run(config: ClassdeckConfig) -> Result<()> {
    let catalog = config.catalog().context("failed to load catalog")?;
    tracing::info!(
        project = %config.project,
        courses = catalog.courses.len(),
        users = catalog.users.len(),
        "catalog loaded"
    );

    let state = AppState::new(&config, catalog).context("failed to prepare dashboard state")?;
    let server = DashboardServer::new(config.dashboard.clone(), state);

    println!("🚀 Classdeck dashboard on http://{}", server.bind_addr());
    server.run().await?;
    Ok(())
}
