use shared::dto::auth::UserInfo;

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/auth";
/// Where authenticated visitors without the required role are sent.
pub const HOME_PATH: &str = "/";

/// Session state as seen by the guard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub loading: bool,
    pub user: Option<UserInfo>,
}

impl AuthState {
    pub fn loading() -> Self {
        Self { loading: true, user: None }
    }

    pub fn signed_in(user: UserInfo) -> Self {
        Self { loading: false, user: Some(user) }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }
}

/// What to do with a protected page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show a placeholder until the session resolves.
    Loading,
    Redirect(&'static str),
    Render,
}

/// Role requirements of a protected page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteGuard {
    pub admin: bool,
    pub superadmin: bool,
}

impl RouteGuard {
    /// Any signed-in user.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admin() -> Self {
        Self { admin: true, superadmin: false }
    }

    pub fn superadmin() -> Self {
        Self { admin: false, superadmin: true }
    }

    pub fn decide(&self, state: &AuthState) -> GuardDecision {
        if state.loading {
            return GuardDecision::Loading;
        }

        let Some(user) = &state.user else {
            return GuardDecision::Redirect(LOGIN_PATH);
        };

        if self.admin && !user.role.is_admin() {
            return GuardDecision::Redirect(HOME_PATH);
        }
        if self.superadmin && !user.role.is_superadmin() {
            return GuardDecision::Redirect(HOME_PATH);
        }

        GuardDecision::Render
    }
}
