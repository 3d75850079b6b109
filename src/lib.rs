//! Studio Lifecycle
//!
//! Booking lifecycle, pricing and print fulfilment for a photo studio: role-gated status
//! transitions, quotes with add-ons and discounts, payment reconciliation, and the customer
//! facing timeline.

pub mod add_ons;
pub mod booking;
pub mod config;
pub mod fixtures;
pub mod identity;
pub mod payment;
pub mod prelude;
pub mod pricing;
pub mod print;
pub mod receipt;
pub mod records;
pub mod roles;
pub mod status;
pub mod timeline;
pub mod transitions;
pub mod utils;
pub mod vouchers;
