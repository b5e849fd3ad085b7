//! Calculation features
//!
//! Each mode is a set of pure functions (plus the keypad state machine for the
//! programmer calculator). The web API and CLI are thin shells over these.

pub mod calculator;
pub mod graphing;
pub mod programmer;
pub mod unit_converter;
