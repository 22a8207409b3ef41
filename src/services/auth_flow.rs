//! Login, registration, logout and the auth-gated booking step.

use serde::Serialize;
use tracing::info;

use crate::managers::session_manager::{SessionManager, SessionManagerTrait};
use crate::managers::storage_manager::KeyValueStore;
use crate::services::api_client::ApiClient;
use crate::types::errors::AuthError;
use crate::types::listing::{ItemKind, Package};
use crate::types::session::{RegisterRequest, Session};

/// Where to go after login when no page asked for a redirect.
pub const DEFAULT_LANDING: &str = "/";
pub const LOGIN_PAGE: &str = "auth.html";
pub const BOOKING_LOGIN_MESSAGE: &str = "Please log in to book this trip";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoginOutcome {
    pub session: Session,
    pub redirect: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BookingOutcome {
    LoginRequired { message: String, redirect: String },
    Checkout { redirect: String },
}

pub struct AuthFlow<S: KeyValueStore> {
    api: ApiClient,
    session: SessionManager<S>,
}

impl<S: KeyValueStore> AuthFlow<S> {
    pub fn new(api: ApiClient, store: S) -> Self {
        Self {
            api,
            session: SessionManager::new(store),
        }
    }

    /// Logs in with the email as username, stores the session and consumes
    /// the pending redirect.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let response = self.api.login(email.trim(), password).await?;
        let session = self.session.login(&response)?;
        let redirect = self
            .session
            .take_redirect()?
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANDING.to_string());

        info!(user = %session.user_email, "logged in");
        Ok(LoginOutcome { session, redirect })
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), AuthError> {
        let request = RegisterRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        self.api.register(&request).await?;
        info!(user = %request.email, "registered");
        Ok(())
    }

    /// Clears the session and remembers where the page was scrolled to.
    pub fn logout(&self, scroll_position: Option<f64>) -> Result<(), AuthError> {
        self.session.logout()?;
        if let Some(offset) = scroll_position {
            self.session.save_scroll_position(offset)?;
        }
        info!("logged out");
        Ok(())
    }

    /// Without a session, remembers the package page and sends the user to
    /// log in. With one, stashes the package for checkout.
    pub fn book_package(&self, package: &Package) -> Result<BookingOutcome, AuthError> {
        if !self.session.is_logged_in() {
            let back = format!("{}?id={}", ItemKind::Package.detail_page(), package.id);
            self.session.remember_redirect(&back)?;
            return Ok(BookingOutcome::LoginRequired {
                message: BOOKING_LOGIN_MESSAGE.to_string(),
                redirect: LOGIN_PAGE.to_string(),
            });
        }

        self.session.stash_booking(package)?;
        Ok(BookingOutcome::Checkout {
            redirect: format!("checkout.html?package={}", package.id),
        })
    }

    pub fn session(&self) -> &SessionManager<S> {
        &self.session
    }
}
