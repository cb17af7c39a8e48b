//! Shared application state.

use std::sync::Arc;

use crate::audit::sqlite::LogStore;
use crate::config::Config;
use crate::error::Result;
use crate::links::RouteTable;
use crate::listview::columns::Column;
use crate::telemetry::Metrics;

pub struct AppStateInner {
    pub store: LogStore,
    pub routes: RouteTable,
    pub columns: Vec<Column>,
    pub page_size: u32,
    pub metrics: Metrics,
}

pub type AppState = Arc<AppStateInner>;

struct StateBuilder {
    store: LogStore,
    routes: RouteTable,
    config: Config,
}

impl StateBuilder {
    fn build(self) -> AppState {
        let routes = match self.config.admin_base_url.clone() {
            Some(base) => self.routes.with_base_url(base),
            None => self.routes,
        };
        let columns = self.config.view.visible_columns();
        tracing::debug!(columns = columns.len(), page_size = self.config.page_size, "list view configured");

        Arc::new(AppStateInner {
            store: self.store,
            routes,
            columns,
            page_size: self.config.page_size,
            metrics: Metrics::new(),
        })
    }
}

pub fn build_state(config: &Config) -> Result<AppState> {
    Ok(StateBuilder {
        store: LogStore::open(&config.db_path)?,
        routes: RouteTable::from_file_or_default(config.routes_file.as_deref()),
        config: config.clone(),
    }
    .build())
}

#[cfg(test)]
pub fn build_test_state(config: Config) -> Result<AppState> {
    Ok(StateBuilder {
        store: LogStore::open_in_memory()?,
        routes: RouteTable::default(),
        config,
    }
    .build())
}
