//! Heart-disease risk service: session-gated prediction form backed by a
//! fitted linear model and an append-only SQLite prediction log.

pub mod app;
pub mod config;
pub mod credentials;
pub mod db;
pub mod error;
pub mod inference;
pub mod session_store;
pub mod state;

pub mod models {
    pub mod features;
    pub mod patient;
    pub mod prediction;
    pub mod session;
}

pub mod repositories {
    pub mod prediction;
}

pub mod services {
    pub mod auth;
    pub mod predictions;
}

pub mod handlers {
    pub mod auth;
    pub mod predictions;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod prediction;
}
