//! Traits and implementations for managing a holder's certificate collection.

pub mod certificate_decoder;
pub mod certificate_status;
pub mod common_models;
pub mod wallet_storage;
