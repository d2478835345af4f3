//! One service per backend resource, each a 1:1 mapping of REST endpoints.

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod client;
pub mod companies;
pub mod locations;
pub mod payments;
pub mod routes;
pub mod schedules;
pub mod users;

pub use admin::AdminService;
pub use auth::AuthService;
pub use bookings::BookingService;
pub use client::ApiClient;
pub use companies::CompanyService;
pub use locations::LocationService;
pub use payments::PaymentService;
pub use routes::RouteService;
pub use schedules::{ScheduleQuery, ScheduleService};
pub use users::UserService;
