mod api;
mod config;
mod db;
mod engine;
mod helper_model;
mod methods;
mod model;
mod scheduled_tasks;
mod schema;
mod store;

use once_cell::sync::Lazy;
use std::sync::Arc;
use warp::Filter;

use crate::engine::BookingEngine;
use crate::store::pg::PgStore;
use crate::store::SystemClock;

pub static POOL: Lazy<db::PgPool> = Lazy::new(db::get_connection_pool);

pub static ENGINE: Lazy<BookingEngine> = Lazy::new(|| {
    let store = Arc::new(PgStore::new(POOL.clone()));
    BookingEngine::new(
        store.clone(),
        store,
        Arc::new(SystemClock),
        config::EngineConfig::from_env(),
    )
});

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    tokio::spawn(scheduled_tasks::nightly_task());

    // routing for the server
    let httpd = api::api().and(warp::path::end());
    tracing::info!("listening on 127.0.0.1:3030");
    warp::serve(httpd).run(([127, 0, 0, 1], 3030)).await;
}
