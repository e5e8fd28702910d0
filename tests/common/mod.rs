#![allow(dead_code)]

use axum::Router;
use sensor_dashboard::api::HttpSensorApi;
use sensor_dashboard::config::Config;
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral local port and return the `/api/v1` base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub upstream");
    let addr = listener.local_addr().expect("stub upstream address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("stub upstream server");
    });
    format!("http://{addr}/api/v1")
}

pub fn config_for(base_url: &str) -> Config {
    Config {
        api_base_url: base_url.to_string(),
        ..Config::default()
    }
}

pub async fn client_for(router: Router) -> HttpSensorApi {
    let base_url = spawn_upstream(router).await;
    HttpSensorApi::new(&config_for(&base_url)).expect("http client")
}
