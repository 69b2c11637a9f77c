//! Web Push delivery client.
//!
//! Encrypts a notification payload for a stored subscription and posts it
//! to the browser endpoint with a VAPID-signed authorization header.

use std::future::Future;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL, Engine};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Url;

use crate::{
    configuration::Config,
    error::Error,
    model::PushSubscription,
    provider::HTTP,
    types::{Claims, PushHeader, PushPayload, Urgency},
};

/// Seam between the dispatch loop and the wire. The loop only cares
/// whether a send succeeded; tests substitute a stub.
pub trait PushClient: Send + Sync {
    fn send(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

#[derive(Debug)]
pub struct WebPushClient {
    http: HTTP,
    mail_to: String,
    vapid_private_key: Vec<u8>,
}

impl WebPushClient {
    pub fn new(config: &Config) -> Result<WebPushClient, Error> {
        Ok(WebPushClient {
            http: HTTP::new(config)?,
            mail_to: config.mail_to.clone(),
            vapid_private_key: config.vapid_private_key.clone(),
        })
    }
}

impl PushClient for WebPushClient {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> Result<(), Error> {
        let push_header = PushHeader {
            ttl: 24 * 60 * 60,
            urgency: Urgency::High,
        };

        let url = Url::parse(&subscription.endpoint)?;
        let exp = Utc::now().timestamp() + push_header.ttl;

        let scheme = url.scheme();
        let host = if let Some(h) = url.host() {
            h.to_string()
        } else {
            return Err(Error::InvalidOption {
                option: String::from("host"),
            });
        };

        let aud = format!("{}://{}", scheme, host);
        let sub = format!("mailto:{}", &self.mail_to);

        let key = EncodingKey::from_ec_pem(&self.vapid_private_key)?;
        let claims = Claims { aud, sub, exp };
        let token = encode(&Header::new(Algorithm::ES256), &claims, &key)?;

        let p256dh = BASE64_URL.decode(&subscription.p256dh)?;
        let auth = BASE64_URL.decode(&subscription.auth)?;

        let body = serde_json::to_string(payload)?;
        let data = ece::encrypt(&p256dh, &auth, body.as_bytes())?;

        let status = self
            .http
            .post_push(
                subscription.endpoint.to_owned(),
                token,
                push_header,
                data,
            )
            .await?;

        if !(200..300).contains(&status) {
            return Err(Error::PushRejected(status));
        }

        Ok(())
    }
}
