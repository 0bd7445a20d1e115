//! Binary entry point: bring up structured logging, scan the data
//! directory, and serve the four routes.

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let base_dir = calc_server::config::base_dir();
    let state = calc_server::init_state(base_dir).await;
    let app = calc_server::router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("failed to bind 0.0.0.0:8080");
    tracing::info!("listening on {:?}", listener.local_addr());

    axum::serve(listener, app).await.expect("server error");
}
