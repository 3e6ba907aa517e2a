//! Application state.
//!
//! [`AppState`] is an immutable value: every transition returns a new
//! state and leaves the receiver untouched. The [`Store`](crate::Store)
//! owned by a [`Service`](crate::Service) holds the current one.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use strum::{Display, EnumIter, EnumString};

use crate::error::ServiceError;

/// Where the session is in its authorization lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthStage {
    Connected,
    Connecting,
    Registering,
    #[default]
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Authorization {
    pub token: Option<String>,
    pub stage: AuthStage,
    pub error: Option<ServiceError>,
}

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub error: Option<ServiceError>,
}

impl Account {
    /// An account with no identity, both timestamps set to `at`.
    pub fn empty(at: DateTime<Utc>) -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            email: String::new(),
            created: at,
            modified: at,
            error: None,
        }
    }
}

/// Account fields as returned by the service. Absent fields keep their
/// previous value when applied with [`AppState::with_account`].
///
/// Timestamps are RFC 3339 strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountUpdate {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
}

/// The whole application state.
///
/// ## Examples
///
/// ```
/// use grafter::{AccountUpdate, AppState, AuthStage};
///
/// let state = AppState::new().connected("token-1").with_account(AccountUpdate {
///     id: Some("a1".into()),
///     created: Some("2024-03-01T12:00:00Z".into()),
///     ..Default::default()
/// });
///
/// assert_eq!(state.authorization.stage, AuthStage::Connected);
/// assert_eq!(state.account.id, "a1");
/// assert_eq!(state.account.created.to_rfc3339(), "2024-03-01T12:00:00+00:00");
///
/// let signed_out = state.disconnected();
/// assert!(signed_out.authorization.token.is_none());
/// assert_eq!(state.account.id, "a1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub authorization: Authorization,
    pub account: Account,
    pub error: Option<ServiceError>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// A disconnected state with an empty account stamped with the current
    /// time.
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// A disconnected state with an empty account stamped with `at`.
    pub fn at(at: DateTime<Utc>) -> Self {
        Self {
            authorization: Authorization::default(),
            account: Account::empty(at),
            error: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.authorization.stage == AuthStage::Connected
    }

    /// Records an operation-level error.
    pub fn with_error(&self, error: ServiceError) -> Self {
        Self {
            error: Some(error),
            ..self.clone()
        }
    }

    /// Clears the operation-level error.
    pub fn without_error(&self) -> Self {
        Self {
            error: None,
            ..self.clone()
        }
    }

    /// Moves to `stage`, clearing any authorization error.
    pub fn with_stage(&self, stage: AuthStage) -> Self {
        let mut next = self.clone();
        next.authorization.stage = stage;
        next.authorization.error = None;
        next
    }

    /// Stores `token` and marks the session connected.
    pub fn connected(&self, token: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.authorization = Authorization {
            token: Some(token.into()),
            stage: AuthStage::Connected,
            error: None,
        };
        next.error = None;
        next
    }

    /// Drops the token and the account identity.
    pub fn disconnected(&self) -> Self {
        let mut next = self.clone();
        next.authorization = Authorization::default();
        next.account.id.clear();
        next.account.name.clear();
        next.account.email.clear();
        next.account.error = None;
        next
    }

    /// Applies an account update. Fields absent from `update` keep their
    /// previous value. A timestamp that is not valid RFC 3339 leaves both
    /// timestamps unchanged and records a
    /// [`ServiceError::ProgrammerFailure`] on the account.
    pub fn with_account(&self, update: AccountUpdate) -> Self {
        let mut next = self.clone();
        let account = &mut next.account;

        match (parse_timestamp(update.created.as_deref()), parse_timestamp(update.modified.as_deref())) {
            (Ok(created), Ok(modified)) => {
                if let Some(created) = created {
                    account.created = created;
                }
                if let Some(modified) = modified {
                    account.modified = modified;
                }
                account.error = None;
            }
            (Err(error), _) | (_, Err(error)) => account.error = Some(error),
        }

        if let Some(id) = update.id {
            account.id = id;
        }
        if let Some(name) = update.name {
            account.name = name;
        }
        if let Some(email) = update.email {
            account.email = email;
        }
        next
    }

    pub fn with_account_error(&self, error: ServiceError) -> Self {
        let mut next = self.clone();
        next.account.error = Some(error);
        next
    }

    pub fn with_authorization_error(&self, error: ServiceError) -> Self {
        let mut next = self.clone();
        next.authorization.error = Some(error);
        next
    }
}

fn parse_timestamp(value: Option<&str>) -> Result<Option<DateTime<Utc>>, ServiceError> {
    value
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| ServiceError::ProgrammerFailure(format!("invalid timestamp `{raw}`: {e}")))
        })
        .transpose()
}
