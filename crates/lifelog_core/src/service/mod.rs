//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Hold the input guards (blank names, non-positive quantities, inverted
//!   date ranges) that UI layers are expected to enforce preemptively.
//! - Keep UI layers decoupled from storage details.

pub mod catalog_service;
pub mod meal_service;
pub mod packing_board;
pub mod trip_service;
