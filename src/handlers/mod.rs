//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, form body, URL params)
//! 2. Performs business logic via the service layer
//! 3. Returns an HTTP response (JSON, HTML, redirect, status code)

/// Registration and login endpoints
pub mod auth;
/// Universal provider data fetch endpoint
pub mod data;
/// Data endpoint management endpoints
pub mod endpoints;
/// Liveness endpoint
pub mod health;
/// Session-cookie web UI
pub mod web;
