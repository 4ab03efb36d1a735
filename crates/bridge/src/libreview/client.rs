//! LibreView API HTTP client

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::api::{
    DOMAIN, Device, DeviceData, DeviceHeader, Envelope, GATEWAY_TYPE, MeasurementLog,
    MeasurementsRequest,
};
use super::{auth, convert};
use crate::models::EntryBatch;
use crate::sync::{AuthSession, Credentials, EntrySink};

/// Production API host
pub const DEFAULT_BASE_URL: &str = "https://api.libreview.io/";

/// LibreView API client for authentication and measurement upload
pub struct LibreViewClient {
    base: Url,
    agent: ureq::Agent,
}

impl LibreViewClient {
    /// Request timeout
    const TIMEOUT: Duration = Duration::from_secs(60);

    /// Create a client for the production API
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client for the API at `base_url`
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let mut base =
            Url::parse(base_url).with_context(|| format!("Invalid LibreView url: {base_url}"))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Self::TIMEOUT))
            .build()
            .into();

        Ok(Self { base, agent })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }
}

/// Build the upload body for `batch`
pub(super) fn measurements_request<'a>(
    device_id: &'a str,
    session: &'a AuthSession,
    batch: &EntryBatch,
) -> MeasurementsRequest<'a> {
    let measurement_log = MeasurementLog {
        scheduled_continuous_glucose_entries: convert::glucose_entries(&batch.glucose),
        food_entries: convert::food_entries(&batch.food),
        insulin_entries: convert::insulin_entries(&batch.insulin),
        ..MeasurementLog::default()
    };

    MeasurementsRequest {
        user_token: session.token(),
        gateway_type: GATEWAY_TYPE,
        device_data: DeviceData {
            header: DeviceHeader {
                device: Device {
                    hardware_descriptor: "iPhone14,2",
                    os_version: "15.4.1",
                    model_name: "com.abbott.librelink.de",
                    os_type: "iOS",
                    unique_identifier: device_id,
                    hardware_name: "iPhone",
                },
            },
            measurement_log,
        },
        domain: DOMAIN,
    }
}

impl EntrySink for LibreViewClient {
    fn authenticate(&self, credentials: &Credentials) -> Result<Option<AuthSession>> {
        let url = self.endpoint("lsl/api/nisperson/getauthentication")?;
        auth::authenticate(&self.agent, url.as_str(), credentials)
    }

    fn transfer(&self, device_id: &str, session: &AuthSession, batch: &EntryBatch) -> Result<()> {
        let url = self.endpoint("lsl/api/measurements")?;
        let body = measurements_request(device_id, session, batch);
        log::debug!("Uploading {} to LibreView", batch.counts());

        let mut response = self
            .agent
            .post(url.as_str())
            .send_json(&body)
            .context("Failed to send measurements to LibreView")?;

        let envelope: Envelope<Value> = response
            .body_mut()
            .read_json()
            .context("Failed to parse LibreView measurements response")?;

        if envelope.status != 0 {
            bail!(
                "LibreView refused the measurements (status {}): {}",
                envelope.status,
                envelope.reason.unwrap_or_else(|| "no reason given".into())
            );
        }
        Ok(())
    }
}
