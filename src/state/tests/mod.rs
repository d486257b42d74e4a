//! Session tests.
//!
//! These drive a `MarkerSession` over synthetic frames and check what ends up
//! on disk.

mod session_tests;
