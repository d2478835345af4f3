//! Client-side routes and the checks run before entering them.

use std::fmt;

use chrono::{DateTime, Utc};
use log::debug;

use crate::models::Role;
use crate::session::Session;

pub const LOGIN_PATH: &str = "/login";
pub const FALLBACK_PATH: &str = "/search";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientRoute {
    Login,
    Register,
    Search,
    Booking(String),
    MyBookings,
    Profile,
    CompanyDashboard,
    CompanyRoutes,
    CompanySchedules,
    CompanyBookings,
    AdminDashboard,
    AdminCompanies,
    AdminUsers,
    AdminLocations,
    AdminBookings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Role(Role),
}

impl ClientRoute {
    /// Maps a path (query string and trailing slash ignored) to a known route.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split('?').next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            [] | ["search"] => Self::Search,
            ["booking", id] => Self::Booking(id.to_string()),
            ["my-bookings"] => Self::MyBookings,
            ["profile"] => Self::Profile,
            ["company"] | ["company", "dashboard"] => Self::CompanyDashboard,
            ["company", "routes"] => Self::CompanyRoutes,
            ["company", "schedules"] => Self::CompanySchedules,
            ["company", "bookings"] => Self::CompanyBookings,
            ["admin"] | ["admin", "dashboard"] => Self::AdminDashboard,
            ["admin", "companies"] => Self::AdminCompanies,
            ["admin", "users"] => Self::AdminUsers,
            ["admin", "locations"] => Self::AdminLocations,
            ["admin", "bookings"] => Self::AdminBookings,
            _ => return None,
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Search => "/search".to_string(),
            Self::Booking(id) => format!("/booking/{}", id),
            Self::MyBookings => "/my-bookings".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::CompanyDashboard => "/company/dashboard".to_string(),
            Self::CompanyRoutes => "/company/routes".to_string(),
            Self::CompanySchedules => "/company/schedules".to_string(),
            Self::CompanyBookings => "/company/bookings".to_string(),
            Self::AdminDashboard => "/admin/dashboard".to_string(),
            Self::AdminCompanies => "/admin/companies".to_string(),
            Self::AdminUsers => "/admin/users".to_string(),
            Self::AdminLocations => "/admin/locations".to_string(),
            Self::AdminBookings => "/admin/bookings".to_string(),
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Self::Login | Self::Register | Self::Search => Access::Public,
            Self::Booking(_) | Self::Profile => Access::Authenticated,
            Self::MyBookings => Access::Role(Role::Rider),
            Self::CompanyDashboard
            | Self::CompanyRoutes
            | Self::CompanySchedules
            | Self::CompanyBookings => Access::Role(Role::Company),
            Self::AdminDashboard
            | Self::AdminCompanies
            | Self::AdminUsers
            | Self::AdminLocations
            | Self::AdminBookings => Access::Role(Role::Admin),
        }
    }
}

impl fmt::Display for ClientRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(String),
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardOutcome::Allow)
    }
}

/// Decides whether the current session may enter a route.
pub struct Guard;

impl Guard {
    pub fn check(route: &ClientRoute, session: Option<&Session>, now: DateTime<Utc>) -> GuardOutcome {
        let access = route.access();
        if access == Access::Public {
            return GuardOutcome::Allow;
        }

        let session = match session {
            Some(s) if !s.is_expired(now) => s,
            _ => {
                debug!("No valid session for {}, redirecting to login", route);
                return GuardOutcome::Redirect(login_redirect(&route.path()));
            }
        };

        match access {
            Access::Role(required) if session.role != required => {
                debug!(
                    "{} requires {} but session is {}, redirecting",
                    route, required, session.role
                );
                GuardOutcome::Redirect(session.role.home_path().to_string())
            }
            _ => GuardOutcome::Allow,
        }
    }

    /// Same as [`Guard::check`] for a raw path; unknown paths go to the search page.
    pub fn check_path(path: &str, session: Option<&Session>, now: DateTime<Utc>) -> GuardOutcome {
        match ClientRoute::parse(path) {
            Some(route) => Self::check(&route, session, now),
            None => GuardOutcome::Redirect(FALLBACK_PATH.to_string()),
        }
    }
}

fn login_redirect(return_path: &str) -> String {
    format!("{}?returnUrl={}", LOGIN_PATH, urlencoding::encode(return_path))
}
