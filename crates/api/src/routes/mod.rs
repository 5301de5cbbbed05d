//! HTTP Routes

pub mod predict;
