//! LibreView account authentication

use anyhow::{Context, Result};

use super::api::{AuthRequest, AuthResult, DOMAIN, Envelope, GATEWAY_TYPE};
use crate::sync::{AuthSession, Credentials};

/// Build the authentication body for `credentials`
pub(super) fn auth_request(credentials: &Credentials) -> AuthRequest<'_> {
    AuthRequest {
        culture: "en-us",
        device_id: &credentials.device_id,
        gateway_type: GATEWAY_TYPE,
        set_device: credentials.reset_device,
        user_name: &credentials.username,
        domain: DOMAIN,
        password: &credentials.password,
    }
}

/// Turn an authentication response into a session
///
/// A non-zero status or a missing token is a rejection, not an error.
pub(super) fn session_from(envelope: Envelope<AuthResult>) -> Option<AuthSession> {
    if envelope.status != 0 {
        log::warn!(
            "LibreView rejected authentication (status {}{})",
            envelope.status,
            envelope
                .reason
                .map(|r| format!(": {r}"))
                .unwrap_or_default()
        );
        return None;
    }

    let result = envelope.result?;
    let token = result.user_token.filter(|t| !t.is_empty())?;
    Some(AuthSession::new(token, result.account_id))
}

/// Authenticate against the endpoint at `url`
pub(super) fn authenticate(agent: &ureq::Agent, url: &str, credentials: &Credentials) -> Result<Option<AuthSession>> {
    log::debug!(
        "Authenticating {} for device {}",
        credentials.username,
        credentials.device_id
    );

    let mut response = agent
        .post(url)
        .send_json(auth_request(credentials))
        .context("Failed to send LibreView authentication request")?;

    let envelope: Envelope<AuthResult> = response
        .body_mut()
        .read_json()
        .context("Failed to parse LibreView authentication response")?;

    Ok(session_from(envelope))
}
