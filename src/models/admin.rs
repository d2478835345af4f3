use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsDto {
    #[serde(default, alias = "userCount")]
    pub total_users: u64,
    #[serde(default, alias = "companyCount")]
    pub total_companies: u64,
    #[serde(default, alias = "bookingCount")]
    pub total_bookings: u64,
    #[serde(default, alias = "revenue")]
    pub total_revenue: f64,
    #[serde(default)]
    pub pending_companies: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminStats {
    pub users: u64,
    pub companies: u64,
    pub bookings: u64,
    pub revenue: f64,
    pub pending_companies: u64,
}

impl From<AdminStatsDto> for AdminStats {
    fn from(dto: AdminStatsDto) -> Self {
        Self {
            users: dto.total_users,
            companies: dto.total_companies,
            bookings: dto.total_bookings,
            revenue: dto.total_revenue,
            pending_companies: dto.pending_companies.unwrap_or_default(),
        }
    }
}
