//! Data Transfer Objects (DTOs) for the HTTP API.
//!
//! The WebSocket wire format is the domain `ChatMessage` itself, so only the
//! HTTP responses need dedicated types.

pub mod http;
