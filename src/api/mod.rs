pub mod conversation;
pub mod describe;
pub mod documents;
pub mod error;
pub mod handler_utils;
pub mod pages;
pub mod preferences;
pub mod records;
pub mod routes;
pub mod server;
pub mod texts;
pub mod uploads;
