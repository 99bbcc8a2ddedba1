pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod media;
pub mod models;
pub mod pages;
pub mod prelude;
pub mod routes;
pub mod seed;
pub mod slug;
pub mod storage;
pub mod store;
pub mod testing;
pub mod validation;
pub mod views;

pub use config::Config;
pub use error::QuillError;
pub use pages::{App, Screen, Toast};
pub use routes::Route;
pub use store::RecordStore;
pub use testing::TestApp;
