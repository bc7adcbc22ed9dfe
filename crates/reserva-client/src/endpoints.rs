//! Fixed auth endpoint paths
//!
//! These match the Django backend's URL configuration. Trailing slashes
//! are significant: the backend runs with APPEND_SLASH redirects disabled
//! for POST, so a path without one would 404.

/// Login: POST email + password, returns tokens + user summary
pub const LOGIN: &str = "api/users/login/";

/// Logout: POST, invalidates the refresh cookie server-side
pub const LOGOUT: &str = "api/users/logout/";

/// Register: POST a new user account
pub const REGISTER: &str = "api/users/register/";

/// Refresh: POST with the httpOnly refresh cookie, no body, no bearer.
/// Returns `{ "access": "<token>" }` on success.
pub const REFRESH: &str = "api/users/refresh/";

/// Current user profile: GET, requires a bearer token
pub const CURRENT_USER: &str = "api/users/me/";
