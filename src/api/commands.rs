//! Request handlers, one submodule per feature
//!
//! Handlers only decode the request, call into `core::features` and wrap the
//! outcome in the JSON envelope from `api::error`.

pub mod calculator;
pub mod catalog;
pub mod converter;
pub mod graphing;
pub mod programmer;
