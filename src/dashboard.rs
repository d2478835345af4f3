//! Panel landing pages. Each loads its independent reads concurrently and
//! fails as a whole if any of them fails.

use chrono::{DateTime, Utc};
use futures::try_join;
use log::info;

use crate::api::{
    AdminService, BookingService, CompanyService, PaymentService, RouteService, ScheduleService,
};
use crate::error::Result;
use crate::models::{
    AdminStats, Booking, BookingStatus, Company, CompanyStatus, Payment, PaymentStatus, Route, Schedule,
    ScheduleStatus, User,
};

#[derive(Debug, Clone)]
pub struct CompanyDashboard {
    pub company: Company,
    pub routes: Vec<Route>,
    pub schedules: Vec<Schedule>,
    pub bookings: Vec<Booking>,
}

impl CompanyDashboard {
    pub async fn load(
        company_id: &str,
        companies: &CompanyService,
        routes: &RouteService,
        schedules: &ScheduleService,
        bookings: &BookingService,
    ) -> Result<Self> {
        let (company, routes, schedules, bookings) = try_join!(
            companies.get(company_id),
            routes.by_company(company_id),
            schedules.by_company(company_id),
            bookings.by_company(company_id),
        )?;
        info!(
            "Loaded dashboard for {}: {} routes, {} schedules, {} bookings",
            company.name,
            routes.len(),
            schedules.len(),
            bookings.len()
        );

        Ok(Self {
            company,
            routes,
            schedules,
            bookings,
        })
    }

    pub fn active_routes(&self) -> usize {
        self.routes.iter().filter(|r| r.active).count()
    }

    pub fn upcoming(&self, now: DateTime<Utc>) -> Vec<&Schedule> {
        let mut upcoming: Vec<&Schedule> = self
            .schedules
            .iter()
            .filter(|s| s.departure > now && s.status == ScheduleStatus::Scheduled)
            .collect();
        upcoming.sort_by_key(|s| s.departure);
        upcoming
    }

    /// Takings from bookings that were not cancelled or left pending.
    pub fn revenue(&self) -> f64 {
        self.bookings
            .iter()
            .filter(|b| matches!(b.status, BookingStatus::Confirmed | BookingStatus::Completed))
            .map(|b| b.total_amount)
            .sum()
    }

    /// Mean seat occupancy across upcoming departures, 0.0 to 1.0.
    pub fn average_occupancy(&self, now: DateTime<Utc>) -> f64 {
        let upcoming = self.upcoming(now);
        if upcoming.is_empty() {
            return 0.0;
        }
        upcoming.iter().map(|s| s.occupancy()).sum::<f64>() / upcoming.len() as f64
    }
}

#[derive(Debug, Clone)]
pub struct RiderDashboard {
    pub bookings: Vec<Booking>,
    pub payments: Vec<Payment>,
}

impl RiderDashboard {
    pub async fn load(user_id: &str, bookings: &BookingService, payments: &PaymentService) -> Result<Self> {
        let (bookings, payments) = try_join!(bookings.by_user(user_id), payments.by_user(user_id))?;
        Ok(Self { bookings, payments })
    }

    pub fn upcoming(&self, now: DateTime<Utc>) -> Vec<&Booking> {
        let mut upcoming: Vec<&Booking> = self
            .bookings
            .iter()
            .filter(|b| b.status != BookingStatus::Cancelled && b.departure.map_or(false, |d| d > now))
            .collect();
        upcoming.sort_by_key(|b| b.departure);
        upcoming
    }

    /// Bookings still waiting on a completed payment.
    pub fn unpaid(&self) -> Vec<&Booking> {
        self.bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Pending)
            .filter(|b| {
                !self.payments.iter().any(|p| {
                    p.booking_id == b.id && p.status == PaymentStatus::Completed
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct AdminDashboard {
    pub stats: AdminStats,
    pub companies: Vec<Company>,
    pub users: Vec<User>,
}

impl AdminDashboard {
    pub async fn load(admin: &AdminService, companies: &CompanyService) -> Result<Self> {
        let (stats, companies, users) = try_join!(admin.stats(), companies.list(), admin.users())?;
        Ok(Self {
            stats,
            companies,
            users,
        })
    }

    /// Operators waiting for approval.
    pub fn pending_companies(&self) -> Vec<&Company> {
        self.companies
            .iter()
            .filter(|c| c.status == CompanyStatus::Pending)
            .collect()
    }

    pub fn inactive_users(&self) -> usize {
        self.users.iter().filter(|u| !u.active).count()
    }
}
