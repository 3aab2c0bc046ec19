//! kwt-sms HTTP surface.
//!
//! Endpoints:
//! - GET  /health
//! - POST /api/orders/{status}/events: order-status trigger from the shop
//! - POST /api/auth/login: admin login, returns a JWT
//! - GET  /api/settings, PUT /api/settings: SMS credentials and templates

pub mod middleware;
pub mod routes;
pub mod state;
