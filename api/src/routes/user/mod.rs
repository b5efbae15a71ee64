//! Profile endpoints for the authorized user
//!
//! Every handler here sits behind `JwtAuth` and reads the subject from
//! `AuthContext`.

pub mod info;
pub mod update;
