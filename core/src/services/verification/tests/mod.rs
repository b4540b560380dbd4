//! Tests for the verification state machine

mod service_tests;
