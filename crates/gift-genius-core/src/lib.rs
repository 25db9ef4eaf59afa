pub mod app;
pub mod config;
pub mod error;
pub mod greeting;
pub mod history;
pub mod i18n;
pub mod llm;
pub mod model;
pub mod preferences;
pub mod prompt;
pub mod recommend;
pub mod saved;
pub mod shopping;
pub mod state;
pub mod storage;
