//! Screens and the navigate capability.

use std::fmt;

/// A screen the console can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Entry point; always redirects to [`Route::Users`].
    Root,
    /// Sign-in prompt.
    Login,
    /// The user list. Requires a session.
    Users,
}

impl Route {
    /// Returns the route's path.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Login => "/login",
            Route::Users => "/users",
        }
    }

    /// Returns whether the route requires a session.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Users)
    }

    /// Resolves redirects: the root goes to the user list, and protected
    /// routes go to sign-in without a session.
    pub fn resolve(self, has_session: bool) -> Route {
        let route = match self {
            Route::Root => Route::Users,
            other => other,
        };
        if route.is_protected() && !has_session {
            Route::Login
        } else {
            route
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Moves the view to another screen.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_redirects_to_users() {
        assert_eq!(Route::Root.resolve(true), Route::Users);
    }

    #[test]
    fn protected_route_without_session() {
        assert_eq!(Route::Users.resolve(false), Route::Login);
        assert_eq!(Route::Root.resolve(false), Route::Login);
    }

    #[test]
    fn login_is_always_reachable() {
        assert_eq!(Route::Login.resolve(false), Route::Login);
        assert_eq!(Route::Login.resolve(true), Route::Login);
    }

    #[test]
    fn paths() {
        assert_eq!(Route::Users.to_string(), "/users");
        assert_eq!(Route::Login.path(), "/login");
    }
}
