//! Tests for the marker file format.
//!
//! These tests write real files and read them back the way the tracker does.
