//! Streamflow forecast service.
//!
//! Each endpoint is a plain function taking the shared [`state::AppState`]
//! and the request's query parameters and returning an
//! [`response::ApiResponse`]. Hosts route paths with [`handlers::dispatch`].

pub mod config;
pub mod handlers;
pub mod params;
pub mod response;
pub mod state;
