//! Client-side table state: sort, filter and paginate whatever a list call returned.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::models::{BusLocation, Booking, Company, Payment, Route, Schedule, User};

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Time(DateTime<Utc>),
    Null,
}

impl Cell {
    fn compare(&self, other: &Cell) -> Ordering {
        match (self, other) {
            (Cell::Null, Cell::Null) => Ordering::Equal,
            (Cell::Null, _) => Ordering::Greater,
            (_, Cell::Null) => Ordering::Less,
            (Cell::Number(a), Cell::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Cell::Time(a), Cell::Time(b)) => a.cmp(b),
            (a, b) => a.to_string().to_lowercase().cmp(&b.to_string().to_lowercase()),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        match self {
            Cell::Null => false,
            other => other.to_string().to_lowercase().contains(needle),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) if n.fract() == 0.0 => write!(f, "{:.0}", n),
            Cell::Number(n) => write!(f, "{:.2}", n),
            Cell::Time(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M")),
            Cell::Null => f.write_str("-"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Null, Into::into)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<u32> for Cell {
    fn from(n: u32) -> Self {
        Cell::Number(f64::from(n))
    }
}

impl From<DateTime<Utc>> for Cell {
    fn from(t: DateTime<Utc>) -> Self {
        Cell::Time(t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub header: &'static str,
    pub filterable: bool,
}

impl Column {
    pub const fn new(key: &'static str, header: &'static str) -> Self {
        Self {
            key,
            header,
            filterable: true,
        }
    }

    pub const fn unfiltered(key: &'static str, header: &'static str) -> Self {
        Self {
            key,
            header,
            filterable: false,
        }
    }
}

pub trait TableRow {
    fn columns() -> &'static [Column];
    fn cell(&self, key: &str) -> Cell;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub key: String,
    pub direction: SortDirection,
}

#[derive(Debug)]
pub struct Page<'a, T> {
    pub rows: Vec<&'a T>,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// Rows left after filtering.
    pub total_rows: usize,
    pub unfiltered_rows: usize,
}

impl<'a, T> Page<'a, T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// "11-20 of 42"
    pub fn range_label(&self) -> String {
        if self.rows.is_empty() {
            return format!("0 of {}", self.total_rows);
        }
        let first = (self.page - 1) * self.page_size + 1;
        let last = first + self.rows.len() - 1;
        format!("{}-{} of {}", first, last, self.total_rows)
    }
}

#[derive(Debug, Clone)]
pub struct TableState<T> {
    rows: Vec<T>,
    sort: Option<Sort>,
    filter: String,
    page: usize,
    page_size: usize,
}

impl<T: TableRow> TableState<T> {
    pub fn new(rows: Vec<T>, page_size: usize) -> Self {
        Self {
            rows,
            sort: None,
            filter: String::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Swaps in freshly loaded rows, keeping sort and filter.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.clamp_page();
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    /// Header click: ascending, then descending, then unsorted.
    pub fn toggle_sort(&mut self, key: &str) {
        self.sort = match self.sort.take() {
            Some(Sort {
                key: current,
                direction: SortDirection::Asc,
            }) if current == key => Some(Sort {
                key: current,
                direction: SortDirection::Desc,
            }),
            Some(Sort {
                key: current,
                direction: SortDirection::Desc,
            }) if current == key => None,
            _ => Some(Sort {
                key: key.to_string(),
                direction: SortDirection::Asc,
            }),
        };
    }

    pub fn set_sort(&mut self, key: &str, direction: SortDirection) {
        self.sort = Some(Sort {
            key: key.to_string(),
            direction,
        });
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// A new filter always starts back on the first page.
    pub fn set_filter(&mut self, filter: &str) {
        self.filter = filter.trim().to_lowercase();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.clamp_page();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    fn clamp_page(&mut self) {
        let total_pages = self.total_pages_for(self.filtered().len());
        self.page = self.page.clamp(1, total_pages);
    }

    fn total_pages_for(&self, rows: usize) -> usize {
        rows.div_ceil(self.page_size).max(1)
    }

    fn row_matches(&self, row: &T) -> bool {
        self.filter.is_empty()
            || T::columns()
                .iter()
                .filter(|c| c.filterable)
                .any(|c| row.cell(c.key).matches(&self.filter))
    }

    /// Filtered and sorted rows, unpaginated.
    pub fn filtered(&self) -> Vec<&T> {
        let mut rows: Vec<&T> = self.rows.iter().filter(|r| self.row_matches(r)).collect();

        if let Some(sort) = &self.sort {
            // Stable sort; unknown cells (Null) stay at the end either way.
            rows.sort_by(|a, b| {
                let (ca, cb) = (a.cell(&sort.key), b.cell(&sort.key));
                match (&ca, &cb, sort.direction) {
                    (Cell::Null, Cell::Null, _) => Ordering::Equal,
                    (Cell::Null, _, _) => Ordering::Greater,
                    (_, Cell::Null, _) => Ordering::Less,
                    (_, _, SortDirection::Asc) => ca.compare(&cb),
                    (_, _, SortDirection::Desc) => cb.compare(&ca),
                }
            });
        }
        rows
    }

    pub fn view(&self) -> Page<'_, T> {
        let filtered = self.filtered();
        let total_rows = filtered.len();
        let total_pages = self.total_pages_for(total_rows);
        let page = self.page.clamp(1, total_pages);

        let rows = filtered
            .into_iter()
            .skip((page - 1) * self.page_size)
            .take(self.page_size)
            .collect();

        Page {
            rows,
            page,
            page_size: self.page_size,
            total_pages,
            total_rows,
            unfiltered_rows: self.rows.len(),
        }
    }
}

// =============================================================================
// Row definitions
// =============================================================================

impl TableRow for Route {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::unfiltered("id", "ID"),
            Column::new("origin", "From"),
            Column::new("destination", "To"),
            Column::new("company", "Company"),
            Column::unfiltered("duration", "Minutes"),
            Column::unfiltered("price", "Base price"),
            Column::new("active", "Active"),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> Cell {
        match key {
            "id" => self.id.as_str().into(),
            "origin" => self.origin.as_str().into(),
            "destination" => self.destination.as_str().into(),
            "company" => self.company_name.clone().into(),
            "duration" => self.duration_minutes.into(),
            "price" => self.base_price.into(),
            "active" => (if self.active { "yes" } else { "no" }).into(),
            _ => Cell::Null,
        }
    }
}

impl TableRow for Schedule {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::unfiltered("id", "ID"),
            Column::new("origin", "From"),
            Column::new("destination", "To"),
            Column::new("departure", "Departs"),
            Column::unfiltered("arrival", "Arrives"),
            Column::new("bus", "Bus"),
            Column::unfiltered("seats", "Seats left"),
            Column::unfiltered("price", "Price"),
            Column::new("status", "Status"),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> Cell {
        match key {
            "id" => self.id.as_str().into(),
            "origin" => self.origin.as_str().into(),
            "destination" => self.destination.as_str().into(),
            "departure" => self.departure.into(),
            "arrival" => self.arrival.into(),
            "duration" => Cell::Number(self.duration().num_minutes() as f64),
            "bus" => self.bus_number.as_str().into(),
            "seats" => self.available_seats.into(),
            "price" => self.price.into(),
            "status" => self.status.as_str().into(),
            _ => Cell::Null,
        }
    }
}

impl TableRow for Booking {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("reference", "Reference"),
            Column::new("trip", "Trip"),
            Column::new("departure", "Departs"),
            Column::new("passenger", "Passenger"),
            Column::new("seats", "Seats"),
            Column::unfiltered("amount", "Amount"),
            Column::new("status", "Status"),
            Column::unfiltered("booked", "Booked"),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> Cell {
        match key {
            "reference" => self.reference.as_str().into(),
            "trip" => self.trip().into(),
            "departure" => self.departure.into(),
            "passenger" => self.passenger_name.as_str().into(),
            "seats" => self.seats.join(", ").into(),
            "amount" => self.total_amount.into(),
            "status" => self.status.as_str().into(),
            "booked" => self.booked_at.into(),
            _ => Cell::Null,
        }
    }
}

impl TableRow for Company {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::unfiltered("id", "ID"),
            Column::new("name", "Name"),
            Column::new("email", "Email"),
            Column::new("phone", "Phone"),
            Column::unfiltered("fleet", "Fleet"),
            Column::new("status", "Status"),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> Cell {
        match key {
            "id" => self.id.as_str().into(),
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            "phone" => self.phone.clone().into(),
            "fleet" => self.fleet_size.into(),
            "status" => self.status.as_str().into(),
            _ => Cell::Null,
        }
    }
}

impl TableRow for User {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::unfiltered("id", "ID"),
            Column::new("name", "Name"),
            Column::new("email", "Email"),
            Column::new("role", "Role"),
            Column::new("active", "Active"),
            Column::unfiltered("joined", "Joined"),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> Cell {
        match key {
            "id" => self.id.as_str().into(),
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            "role" => self.role.as_str().into(),
            "active" => (if self.active { "yes" } else { "no" }).into(),
            "joined" => self.created_at.into(),
            _ => Cell::Null,
        }
    }
}

impl TableRow for BusLocation {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::unfiltered("id", "ID"),
            Column::new("name", "Name"),
            Column::new("city", "City"),
            Column::new("region", "Region"),
            Column::new("code", "Code"),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> Cell {
        match key {
            "id" => self.id.as_str().into(),
            "name" => self.name.as_str().into(),
            "city" => self.city.as_str().into(),
            "region" => self.region.clone().into(),
            "code" => self.code.clone().into(),
            _ => Cell::Null,
        }
    }
}

impl TableRow for Payment {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::unfiltered("id", "ID"),
            Column::new("booking", "Booking"),
            Column::unfiltered("amount", "Amount"),
            Column::new("method", "Method"),
            Column::new("status", "Status"),
            Column::new("reference", "Transaction"),
            Column::unfiltered("paid", "Paid"),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> Cell {
        match key {
            "id" => self.id.as_str().into(),
            "booking" => self.booking_id.as_str().into(),
            "amount" => self.amount.into(),
            "method" => self.method.as_str().into(),
            "status" => self.status.as_str().into(),
            "reference" => self.transaction_ref.clone().into(),
            "paid" => self.paid_at.into(),
            _ => Cell::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: &'static str,
        city: &'static str,
        fare: Option<f64>,
    }

    impl TableRow for Row {
        fn columns() -> &'static [Column] {
            const COLUMNS: &[Column] = &[
                Column::new("name", "Name"),
                Column::new("city", "City"),
                Column::unfiltered("fare", "Fare"),
            ];
            COLUMNS
        }

        fn cell(&self, key: &str) -> Cell {
            match key {
                "name" => self.name.into(),
                "city" => self.city.into(),
                "fare" => self.fare.into(),
                _ => Cell::Null,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "Easy Coach", city: "Nairobi", fare: Some(1450.0) },
            Row { name: "Dreamline", city: "Mombasa", fare: None },
            Row { name: "Tahmeed", city: "Mombasa", fare: Some(1600.0) },
            Row { name: "Guardian", city: "Busia", fare: Some(1500.0) },
            Row { name: "modern coast", city: "Nairobi", fare: Some(2500.0) },
        ]
    }

    fn names(state: &TableState<Row>) -> Vec<&'static str> {
        state.view().rows.iter().map(|r| r.name).collect()
    }

    #[test]
    fn test_filter_is_case_insensitive_over_filterable_columns() {
        let mut state = TableState::new(rows(), 10);
        state.set_filter("  MOMBASA ");
        assert_eq!(names(&state), vec!["Dreamline", "Tahmeed"]);

        state.set_filter("co");
        assert_eq!(names(&state), vec!["Easy Coach", "modern coast"]);

        // Fare is not filterable.
        state.set_filter("1450");
        assert!(names(&state).is_empty());
        assert_eq!(state.view().unfiltered_rows, 5);
    }

    #[test]
    fn test_sort_toggle_cycle_and_nulls_last() {
        let mut state = TableState::new(rows(), 10);
        state.toggle_sort("fare");
        assert_eq!(
            names(&state),
            vec!["Easy Coach", "Guardian", "Tahmeed", "modern coast", "Dreamline"]
        );

        state.toggle_sort("fare");
        assert_eq!(state.sort().unwrap().direction, SortDirection::Desc);
        assert_eq!(
            names(&state),
            vec!["modern coast", "Tahmeed", "Guardian", "Easy Coach", "Dreamline"]
        );

        state.toggle_sort("fare");
        assert!(state.sort().is_none());
        assert_eq!(names(&state)[0], "Easy Coach");
    }

    #[test]
    fn test_text_sort_ignores_case_and_is_stable() {
        let mut state = TableState::new(rows(), 10);
        state.set_sort("name", SortDirection::Asc);
        assert_eq!(
            names(&state),
            vec!["Dreamline", "Easy Coach", "Guardian", "modern coast", "Tahmeed"]
        );

        state.set_sort("city", SortDirection::Asc);
        assert_eq!(
            names(&state),
            vec!["Guardian", "Dreamline", "Tahmeed", "Easy Coach", "modern coast"]
        );
    }

    #[test]
    fn test_pagination_and_clamping() {
        let mut state = TableState::new(rows(), 2);
        let page = state.view();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.range_label(), "1-2 of 5");
        assert!(!page.has_previous());

        state.set_page(3);
        let page = state.view();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.range_label(), "5-5 of 5");
        assert!(!page.has_next());

        state.set_page(99);
        assert_eq!(state.view().page, 3);

        state.set_page(0);
        assert_eq!(state.view().page, 1);
    }

    #[test]
    fn test_filter_resets_page() {
        let mut state = TableState::new(rows(), 2);
        state.set_page(2);
        state.set_filter("nairobi");
        let page = state.view();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_rows, 2);
    }

    #[test]
    fn test_shrinking_rows_clamps_page() {
        let mut state = TableState::new(rows(), 2);
        state.set_page(3);
        state.set_rows(rows().into_iter().take(2).collect());
        assert_eq!(state.view().page, 1);
    }

    #[test]
    fn test_empty_table() {
        let state: TableState<Row> = TableState::new(Vec::new(), 0);
        let page = state.view();
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.range_label(), "0 of 0");
    }
}
