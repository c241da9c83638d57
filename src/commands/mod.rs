pub mod auth;
pub mod clear;
pub mod create;
