//! Business logic services

pub mod derivative;
