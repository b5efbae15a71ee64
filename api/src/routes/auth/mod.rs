//! Authentication route handlers
//!
//! This module contains the unauthenticated endpoints:
//! - Account registration
//! - Password sign-in
//! - Refresh token rotation

pub mod sign_in;
pub mod sign_up;
pub mod token;
