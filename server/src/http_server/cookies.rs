use std::{fmt::Debug, ops::Deref};

use base64::Engine;
use color_eyre::eyre::{bail, Context};

/// Signing and encryption halves of the key, 32 bytes each.
const MIN_KEY_BYTES: usize = 64;

/// Key for the private (encrypted) cookies that carry admin sessions.
#[derive(Clone)]
pub struct CookieKey(pub tower_cookies::Key);

impl Deref for CookieKey {
    type Target = tower_cookies::Key;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl CookieKey {
    /// `COOKIE_KEY` is base64. Without it a fresh key is generated, so
    /// sessions don't survive a restart.
    pub fn from_env_or_generate() -> crate::Result<Self> {
        let cookie_key = match std::env::var("COOKIE_KEY") {
            Ok(encoded) => Self::from_base64(&encoded)?,
            Err(_) => {
                tracing::info!("COOKIE_KEY not set, generating a new cookie key");
                Self(tower_cookies::Key::generate())
            }
        };

        Ok(cookie_key)
    }

    pub fn from_base64(encoded: &str) -> crate::Result<Self> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim().as_bytes())
            .wrap_err("COOKIE_KEY is not valid base64")?;
        if bytes.len() < MIN_KEY_BYTES {
            bail!("COOKIE_KEY must decode to at least {MIN_KEY_BYTES} bytes");
        }

        let key = tower_cookies::Key::try_from(bytes.as_slice())
            .map_err(|e| color_eyre::eyre::eyre!("COOKIE_KEY is unusable: {e:?}"))?;

        Ok(Self(key))
    }
}

impl Debug for CookieKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieKey")
            .field("value", &"[omitted]")
            .finish()
    }
}
