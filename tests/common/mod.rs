// File: common/mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(dead_code)]

use hdrcensus::getstate::GetState;
use hdrcensus::probe::Prober;
use hdrcensus::scheduler::Scheduler;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn create_mock_response(status: u16, headers: &[(&str, &str)]) -> ResponseTemplate {
    let mut response = ResponseTemplate::new(status).set_body_string("<html></html>");
    for (key, value) in headers {
        response = response.append_header(*key, *value);
    }
    response
}

pub async fn mount_site(server: &MockServer, route: &str, status: u16, headers: &[(&str, &str)]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(create_mock_response(status, headers))
        .mount(server)
        .await;
}

pub async fn mount_slow_site(server: &MockServer, route: &str, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(create_mock_response(200, &[("server", "slowpoke")]).set_delay(delay))
        .mount(server)
        .await;
}

pub fn test_prober(timeout_secs: u64) -> Prober {
    Prober::new(Duration::from_secs(timeout_secs)).unwrap()
}

pub fn test_scheduler(workers: usize, timeout_secs: u64) -> (Scheduler, Arc<GetState>) {
    let state = Arc::new(GetState::new());
    let scheduler = Scheduler::with_prober(
        test_prober(timeout_secs),
        Arc::clone(&state),
        workers,
        NonZeroU32::new(1000).unwrap(),
    );
    (scheduler, state)
}

/// A URL on a local port nobody listens on.
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

pub fn security_headers() -> Vec<(&'static str, &'static str)> {
    vec![
        ("server", "nginx/1.18.0"),
        ("X-Frame-Options", "DENY"),
        ("X-Content-Type-Options", "nosniff"),
        ("Referrer-Policy", "no-referrer"),
        ("X-XSS-Protection", "1; mode=block"),
    ]
}
