//! One-shot notices carried across a redirect
//!
//! Messages are serialized to JSON, base64url-encoded and signed with
//! HMAC-SHA256 under the configured secret key. The cookie is written by the
//! redirecting handler and cleared by the next page that renders it.

use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::convert::Infallible;
use std::sync::Arc;
use subtle::ConstantTimeEq;

pub const FLASH_COOKIE: &str = "pixform_flash";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Danger,
}

impl FlashLevel {
    pub fn css_class(self) -> &'static str {
        match self {
            FlashLevel::Success => "alert alert-success",
            FlashLevel::Danger => "alert alert-danger",
        }
    }
}

/// Trailing hyperlink rendered after the message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashLink {
    pub href: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<FlashLink>,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            text: text.into(),
            link: None,
        }
    }

    pub fn danger(text: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Danger,
            text: text.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, href: impl Into<String>, label: impl Into<String>) -> Self {
        self.link = Some(FlashLink {
            href: href.into(),
            label: label.into(),
        });
        self
    }
}

/// Signs and verifies flash cookie payloads.
#[derive(Clone)]
pub struct FlashSigner {
    key: Arc<[u8]>,
    secure: bool,
}

impl FlashSigner {
    /// `secure` adds the `Secure` attribute to emitted cookies.
    pub fn new(key: &[u8], secure: bool) -> Self {
        Self {
            key: Arc::from(key),
            secure,
        }
    }

    fn mac(&self, payload: &str) -> Option<String> {
        let mut mac = HmacSha256::new_from_slice(&self.key).ok()?;
        mac.update(payload.as_bytes());
        Some(hex::encode(mac.finalize().into_bytes()))
    }

    /// Cookie value for `messages`: `{payload}.{hex hmac}`.
    pub fn encode(&self, messages: &[FlashMessage]) -> Option<String> {
        let json = serde_json::to_vec(messages).ok()?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = self.mac(&payload)?;
        Some(format!("{}.{}", payload, signature))
    }

    /// Verify and decode a cookie value. Tampered or malformed values yield `None`.
    pub fn decode(&self, value: &str) -> Option<Vec<FlashMessage>> {
        let (payload, signature) = value.split_once('.')?;
        let expected = self.mac(payload)?;
        if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            tracing::debug!("Discarding flash cookie with bad signature");
            return None;
        }
        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }

    pub fn set_cookie(&self, value: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax{}",
            FLASH_COOKIE,
            value,
            if self.secure { "; Secure" } else { "" }
        )
    }

    pub fn clear_cookie(&self) -> String {
        format!(
            "{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax{}",
            FLASH_COOKIE,
            if self.secure { "; Secure" } else { "" }
        )
    }

    /// 303 See Other to `location` carrying `messages`.
    pub fn redirect(&self, location: &str, messages: &[FlashMessage]) -> Response {
        let mut response = (StatusCode::SEE_OTHER, [(header::LOCATION, location.to_string())])
            .into_response();

        match self.encode(messages).map(|v| HeaderValue::from_str(&self.set_cookie(&v))) {
            Some(Ok(cookie)) => {
                response.headers_mut().append(header::SET_COOKIE, cookie);
            }
            _ => tracing::warn!("Failed to encode flash cookie"),
        }

        response
    }
}

/// Read a cookie value from the `Cookie` request headers.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Flash messages sent with the current request, if any.
///
/// `present` is set whenever a flash cookie arrived, valid or not, so the
/// rendering page knows to clear it.
#[derive(Debug, Default)]
pub struct IncomingFlash {
    pub messages: Vec<FlashMessage>,
    pub present: bool,
}

impl FromRequestParts<Arc<AppState>> for IncomingFlash {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(value) = read_cookie(&parts.headers, FLASH_COOKIE) else {
            return Ok(IncomingFlash::default());
        };

        Ok(IncomingFlash {
            messages: state.flash.decode(value).unwrap_or_default(),
            present: true,
        })
    }
}
