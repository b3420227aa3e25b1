//! Login credentials.
//!
//! Handlers build [`LoginCredentials`] from the raw request body before
//! calling the login port, so the port never sees blank input.

use zeroize::Zeroizing;

/// Rejection of a login payload before it reaches the login port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// The username is trimmed; the password is kept verbatim and wiped from
/// memory on drop.
///
/// # Examples
/// ```
/// use tenant_customers::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" user ", "password").expect("valid");
/// assert_eq!(creds.username(), "user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalised = username.trim();
        if normalised.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalised.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Trimmed account name.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password as submitted.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
