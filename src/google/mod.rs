//! Google Calendar side of dosecal: OAuth session handling and the
//! `CalendarGateway` implementation backed by the Google Calendar API.

pub mod auth;
pub mod convert;
pub mod gateway;
pub mod session;
