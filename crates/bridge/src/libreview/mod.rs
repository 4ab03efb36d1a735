//! LibreView API integration
//!
//! This module provides:
//! - Authentication of a LibreView account for a device id
//! - Upload of a measurement log for that device
//! - Conversion of Nightscout records to LibreView measurements

mod auth;
mod client;
mod convert;

pub use client::{DEFAULT_BASE_URL, LibreViewClient};
pub use convert::{food_entries, glucose_entries, insulin_entries};

/// LibreView API request and response types
pub mod api {
    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    /// Gateway the uploads are attributed to
    pub const GATEWAY_TYPE: &str = "FSLibreLink.iOS";

    /// Account domain
    pub const DOMAIN: &str = "Libreview";

    /// Body of the authentication request
    #[derive(Debug, Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct AuthRequest<'a> {
        pub culture: &'a str,
        pub device_id: &'a str,
        pub gateway_type: &'a str,
        pub set_device: bool,
        pub user_name: &'a str,
        pub domain: &'a str,
        pub password: &'a str,
    }

    /// Envelope of every LibreView response; `status` 0 means success
    #[derive(Debug, Deserialize)]
    pub struct Envelope<T> {
        pub status: i64,
        pub result: Option<T>,
        #[serde(default)]
        pub reason: Option<String>,
    }

    /// Result part of a successful authentication
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct AuthResult {
        pub user_token: Option<String>,
        pub account_id: Option<String>,
    }

    /// Body of the measurement upload
    #[derive(Debug, Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct MeasurementsRequest<'a> {
        pub user_token: &'a str,
        pub gateway_type: &'a str,
        pub device_data: DeviceData<'a>,
        pub domain: &'a str,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DeviceData<'a> {
        pub header: DeviceHeader<'a>,
        pub measurement_log: MeasurementLog,
    }

    #[derive(Debug, Serialize)]
    pub struct DeviceHeader<'a> {
        pub device: Device<'a>,
    }

    /// Identity of the uploading device
    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Device<'a> {
        pub hardware_descriptor: &'a str,
        pub os_version: &'a str,
        pub model_name: &'a str,
        pub os_type: &'a str,
        pub unique_identifier: &'a str,
        pub hardware_name: &'a str,
    }

    /// The measurements themselves
    #[derive(Debug, Default, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MeasurementLog {
        pub capabilities: Vec<String>,
        pub blood_glucose_entries: Vec<Value>,
        pub generic_entries: Vec<Value>,
        pub ketone_entries: Vec<Value>,
        pub scheduled_continuous_glucose_entries: Vec<Value>,
        pub unscheduled_continuous_glucose_entries: Vec<Value>,
        pub insulin_entries: Vec<Value>,
        pub food_entries: Vec<Value>,
    }
}
