//! Account credentials held by a `WebRequestService`.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{Error, Result};

/// Teapplix account identity.
///
/// Only `account_name` is read by this crate, for attributing log entries.
/// Requests are never signed with these values.
#[derive(Clone)]
pub struct TeapplixCredentials {
    account_name: String,
    user_name: String,
    password: SecretString,
}

impl TeapplixCredentials {
    pub fn new(
        account_name: impl Into<String>,
        user_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let account_name = account_name.into();
        if account_name.trim().is_empty() {
            return Err(Error::Config {
                message: "account name must not be empty".to_string(),
                key: Some("account_name".to_string()),
            });
        }
        Ok(Self {
            account_name,
            user_name: user_name.into(),
            password: SecretString::from(password.into()),
        })
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    /// Login carried for callers that build the upload form body.
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Password carried for callers that build the upload form body.
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl fmt::Debug for TeapplixCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeapplixCredentials")
            .field("account_name", &self.account_name)
            .field("user_name", &self.user_name)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
