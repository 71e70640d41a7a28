use std::net::IpAddr;

use serde::Deserialize;

use crate::domain::{ChallengeToken, ChallengeVerification, RecaptchaSecret};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
struct SiteVerifyJsonResponse {
    success: bool,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    hostname: Option<String>,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

pub fn encode_siteverify_form(
    secret: &RecaptchaSecret,
    token: &ChallengeToken,
    remote_ip: Option<IpAddr>,
) -> Vec<(String, String)> {
    let mut params = vec![
        (RecaptchaSecret::FIELD.to_owned(), secret.as_str().to_owned()),
        ("response".to_owned(), token.as_str().to_owned()),
    ];
    if let Some(ip) = remote_ip {
        params.push(("remoteip".to_owned(), ip.to_string()));
    }
    params
}

pub fn decode_siteverify_json_response(
    json: &str,
) -> Result<ChallengeVerification, TransportError> {
    let parsed: SiteVerifyJsonResponse = serde_json::from_str(json)?;
    Ok(ChallengeVerification {
        success: parsed.success,
        score: parsed.score,
        action: parsed.action,
        hostname: parsed.hostname,
        error_codes: parsed.error_codes,
    })
}
