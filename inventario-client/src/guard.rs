//! Session guard: page-load authentication/authorization check
//!
//! Evaluated once per protected screen entry, before any product
//! fetch. Fails closed: a transport failure counts as unauthenticated.

use crate::ApiClient;
use shared::client::CurrentUser;

/// Access level a protected screen demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredAccess {
    /// Any valid session
    User,
    /// Session must carry elevated privilege
    Admin,
}

/// Terminal outcome of the guard check.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    /// Session is valid and sufficient; proceed with initialization.
    Proceed(CurrentUser),
    /// No valid session (or the check itself failed): go to login.
    RedirectToLogin,
    /// Valid session without elevated privilege on an admin-only
    /// screen: go to the public catalog, keeping the session.
    RedirectToCatalog(CurrentUser),
}

/// Query the session introspection endpoint and decide navigation.
pub async fn check_session(client: &ApiClient, required: RequiredAccess) -> GuardOutcome {
    match client.me().await {
        Ok(user) => {
            if required == RequiredAccess::Admin && !user.is_admin {
                tracing::debug!(username = %user.username, "Session lacks admin access");
                return GuardOutcome::RedirectToCatalog(user);
            }
            GuardOutcome::Proceed(user)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Session check failed, redirecting to login");
            GuardOutcome::RedirectToLogin
        }
    }
}
