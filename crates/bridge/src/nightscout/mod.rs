//! Nightscout API integration
//!
//! Reads sensor glucose values from the entries collection and food and
//! insulin records from the treatments collection.

mod client;

pub use client::NightscoutClient;
