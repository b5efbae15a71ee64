//! Tests for the token lifecycle

mod codec_tests;
mod rotation_tests;
mod service_tests;
