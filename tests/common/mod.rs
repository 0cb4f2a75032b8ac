//! Shared fixtures for the integration tests: a wiremock backend and JSON
//! builders in the shape the profile endpoints use.

#![allow(dead_code)]

use rosterline::{HttpProfileService, QueryCache, Services};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub async fn backend() -> MockServer {
    MockServer::start().await
}

pub fn service(server: &MockServer) -> HttpProfileService {
    HttpProfileService::new(&server.uri(), Some(Duration::from_secs(5))).unwrap()
}

pub fn services(server: &MockServer) -> Services {
    Services::new(Arc::new(service(server)), QueryCache::default())
}

pub fn profile_json(id: i64, username: &str, age: i64, hometown: &str, gender: &str) -> Value {
    json!({
        "user": {"username": username, "email": format!("{username}@example.com"), "id": id},
        "hometown": hometown,
        "age": age,
        "gender": gender,
        "id": id
    })
}

pub fn page_json(data: Vec<Value>, count: u64, num_pages: u32, current_page: u32) -> Value {
    json!({
        "data": data,
        "count": count,
        "num_pages": num_pages,
        "current_page": current_page
    })
}
