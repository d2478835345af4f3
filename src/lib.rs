//! Client for the bus-ticketing platform: typed REST services, form
//! validation, table state, role guards and the panels built on them.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod dialog;
pub mod error;
pub mod forms;
pub mod guard;
pub mod models;
pub mod notify;
pub mod render;
pub mod search;
pub mod session;
pub mod table;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, Result, ValidationError, ValidationErrors};
pub use notify::{Notifier, Toast};
pub use session::{Session, SessionStore};

use api::{
    AdminService, AuthService, BookingService, CompanyService, LocationService, PaymentService,
    RouteService, ScheduleService, UserService,
};

/// Every service wired to one shared client (and therefore one token).
#[derive(Clone)]
pub struct Services {
    pub api: ApiClient,
    pub auth: AuthService,
    pub users: UserService,
    pub routes: RouteService,
    pub schedules: ScheduleService,
    pub bookings: BookingService,
    pub payments: PaymentService,
    pub companies: CompanyService,
    pub locations: LocationService,
    pub admin: AdminService,
}

impl Services {
    pub fn new(api: ApiClient) -> Self {
        Self {
            auth: AuthService::new(api.clone()),
            users: UserService::new(api.clone()),
            routes: RouteService::new(api.clone()),
            schedules: ScheduleService::new(api.clone()),
            bookings: BookingService::new(api.clone()),
            payments: PaymentService::new(api.clone()),
            companies: CompanyService::new(api.clone()),
            locations: LocationService::new(api.clone()),
            admin: AdminService::new(api.clone()),
            api,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(ApiClient::new(config)?))
    }
}
