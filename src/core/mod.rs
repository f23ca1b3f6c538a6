pub mod backend;
pub mod conversation;
pub mod credit;
pub mod error;
pub mod message;
pub mod ui;
