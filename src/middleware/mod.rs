// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Middleware modules (authentication, response headers).

pub mod auth;
pub mod security;

pub use auth::{create_jwt, require_auth, AuthUser, AUTH_COOKIE};
