//! bus-book - terminal front-end for the bus-ticketing platform

use std::process;

use bus_book_client::dashboard::{AdminDashboard, CompanyDashboard, RiderDashboard};
use bus_book_client::dialog::Confirm;
use bus_book_client::forms::{
    BookingForm, CompanyForm, Form, LocationForm, LoginForm, PasswordForm, PaymentForm, ProfileForm,
    RegisterForm, RouteForm, ScheduleForm, SearchForm,
};
use bus_book_client::guard::{ClientRoute, Guard, GuardOutcome};
use bus_book_client::models::{CompanyStatus, PaymentMethod, Role};
use bus_book_client::notify::{report, LogNotifier, Toast};
use bus_book_client::render::{money, render_table};
use bus_book_client::search::{LocationAutocomplete, ScheduleSearch, SearchSort};
use bus_book_client::session::{forget_if_unauthorized, FileSessionStore};
use bus_book_client::table::{SortDirection, TableRow, TableState};
use bus_book_client::{
    ApiError, ClientConfig, Notifier, Result, Services, Session, SessionStore, ValidationError,
    ValidationErrors,
};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use log::{debug, info};

#[derive(Parser)]
#[command(name = "bus-book")]
#[command(author, version, about = "Book bus tickets and manage operators from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL (overrides BUS_BOOK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    yes: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Sign in with a Google ID token
    GoogleLogin {
        id_token: String,
    },

    /// Create a rider account
    Register {
        #[arg(long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// Repeat the password
        #[arg(long)]
        confirm: String,
        #[arg(long, default_value = "")]
        phone: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Search departures between two stops
    Search {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Travel date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        #[arg(short = 'n', long, default_value_t = 1)]
        passengers: u32,
        /// departure, price, duration or seats
        #[arg(long, default_value = "departure")]
        sort: String,
        #[command(flatten)]
        table: TableArgs,
    },

    /// Suggest stops matching what you typed
    Locations {
        term: String,
    },

    /// Show the seat map of a departure
    Seats {
        schedule_id: String,
    },

    /// Book seats on a departure
    Book {
        schedule_id: String,
        #[arg(short, long = "seat", required = true)]
        seats: Vec<String>,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        phone: String,
    },

    /// Pay for a booking
    Pay {
        booking_id: String,
        /// card, mobile-money or cash
        #[arg(short, long)]
        method: String,
        #[arg(long, default_value = "")]
        card_number: String,
        #[arg(long, default_value = "")]
        card_expiry: String,
        #[arg(long, default_value = "")]
        card_cvv: String,
        #[arg(long, default_value = "")]
        phone: String,
    },

    /// Your bookings
    Bookings {
        #[command(subcommand)]
        action: BookingAction,
    },

    /// Your profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Company panel
    Company {
        #[command(subcommand)]
        action: CompanyAction,
    },

    /// Platform admin panel
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Args, Clone, Default)]
struct TableArgs {
    /// Only rows containing this text
    #[arg(long)]
    filter: Option<String>,
    /// Column key to sort by
    #[arg(long = "order-by")]
    order_by: Option<String>,
    /// Sort descending
    #[arg(long)]
    desc: bool,
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long)]
    page_size: Option<usize>,
}

#[derive(Subcommand)]
enum BookingAction {
    /// List your bookings
    List {
        #[command(flatten)]
        table: TableArgs,
    },
    /// Show one booking with its payments
    Show { id: String },
    /// Cancel a booking
    Cancel { id: String },
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,
    Update {
        #[arg(long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
}

#[derive(Subcommand)]
enum CompanyAction {
    Dashboard,
    Routes {
        #[command(subcommand)]
        action: RouteAction,
    },
    Schedules {
        #[command(subcommand)]
        action: ScheduleAction,
    },
    Bookings {
        #[command(flatten)]
        table: TableArgs,
    },
}

#[derive(Subcommand)]
enum RouteAction {
    List {
        #[command(flatten)]
        table: TableArgs,
    },
    Create {
        #[command(flatten)]
        route: RouteArgs,
    },
    Update {
        id: String,
        #[command(flatten)]
        route: RouteArgs,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Clone)]
struct RouteArgs {
    #[arg(long)]
    from: String,
    #[arg(long)]
    to: String,
    #[arg(long)]
    distance_km: Option<f64>,
    #[arg(long)]
    minutes: u32,
    #[arg(long)]
    price: f64,
    #[arg(long)]
    inactive: bool,
}

#[derive(Subcommand)]
enum ScheduleAction {
    List {
        #[command(flatten)]
        table: TableArgs,
    },
    Create {
        #[command(flatten)]
        schedule: ScheduleArgs,
    },
    Update {
        id: String,
        #[command(flatten)]
        schedule: ScheduleArgs,
    },
    Cancel {
        id: String,
    },
    Delete {
        id: String,
    },
    /// Passenger list of a departure
    Manifest {
        id: String,
    },
}

#[derive(Args, Clone)]
struct ScheduleArgs {
    #[arg(long)]
    route_id: String,
    /// e.g. 2026-11-03T22:00
    #[arg(long)]
    departure: String,
    #[arg(long)]
    arrival: String,
    #[arg(long)]
    bus: String,
    #[arg(long)]
    seats: u32,
    #[arg(long)]
    price: f64,
}

#[derive(Subcommand)]
enum AdminAction {
    Dashboard,
    Companies {
        #[command(subcommand)]
        action: AdminCompanyAction,
    },
    Users {
        #[command(subcommand)]
        action: AdminUserAction,
    },
    Locations {
        #[command(subcommand)]
        action: AdminLocationAction,
    },
    Bookings {
        #[command(flatten)]
        table: TableArgs,
    },
    /// Refund a completed payment
    Refund { payment_id: String },
}

#[derive(Subcommand)]
enum AdminCompanyAction {
    List {
        #[command(flatten)]
        table: TableArgs,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        address: String,
    },
    Approve { id: String },
    Suspend { id: String },
    Delete { id: String },
}

#[derive(Subcommand)]
enum AdminUserAction {
    List {
        #[command(flatten)]
        table: TableArgs,
    },
    Role { id: String, role: String },
    Activate { id: String },
    Deactivate { id: String },
}

#[derive(Subcommand)]
enum AdminLocationAction {
    List {
        #[command(flatten)]
        table: TableArgs,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        city: String,
        #[arg(long, default_value = "")]
        region: String,
        #[arg(long, default_value = "")]
        code: String,
    },
    Delete { id: String },
}

struct App {
    config: ClientConfig,
    services: Services,
    notifier: LogNotifier,
    store: FileSessionStore,
    session: Option<Session>,
    assume_yes: bool,
}

impl App {
    fn new(config: ClientConfig, assume_yes: bool) -> Result<Self> {
        let services = Services::from_config(&config)?;
        let store = FileSessionStore::new(config.session_file.clone());
        let session = store.load()?;
        if let Some(s) = &session {
            debug!("Restored session for {} ({})", s.email, s.role);
            services.api.set_token(Some(s.token.clone()));
        }

        Ok(Self {
            notifier: LogNotifier {
                life: Some(config.toast_life),
            },
            config,
            services,
            store,
            session,
            assume_yes,
        })
    }

    /// Runs the guard for `route`; a redirect becomes an error naming where to go.
    fn enter(&self, route: ClientRoute) -> Result<&Session> {
        match Guard::check(&route, self.session.as_ref(), Utc::now()) {
            GuardOutcome::Allow => self
                .session
                .as_ref()
                .ok_or_else(|| ApiError::Session("sign in first".to_string())),
            GuardOutcome::Redirect(path) if path.starts_with("/login") => Err(ApiError::Session(
                format!("sign in to open {} (redirected to {})", route, path),
            )),
            GuardOutcome::Redirect(path) => Err(ApiError::Forbidden(format!(
                "{} is not available to your account (redirected to {})",
                route, path
            ))),
        }
    }

    fn company_id(&self) -> Result<String> {
        let session = self.enter(ClientRoute::CompanyDashboard)?;
        session
            .company_id
            .clone()
            .ok_or_else(|| ApiError::Session("this account is not linked to a company".to_string()))
    }

    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        Confirm::stdio().ask(question).unwrap_or(false)
    }

    fn success(&self, summary: &str, detail: impl Into<String>) {
        self.notifier.notify(Toast::success(summary, detail));
    }

    fn table<T: TableRow>(&self, rows: Vec<T>, args: &TableArgs) -> String {
        let mut state = TableState::new(rows, args.page_size.unwrap_or(self.config.page_size));
        if let Some(filter) = &args.filter {
            state.set_filter(filter);
        }
        if let Some(key) = &args.order_by {
            let direction = if args.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            state.set_sort(key, direction);
        }
        state.set_page(args.page);
        render_table(&state)
    }

    fn sign_in(&mut self, session: Session) -> Result<()> {
        self.store.save(&session)?;
        self.success("Signed in", format!("Welcome, {}", session.name));
        println!("Signed in as {} ({}). Home: {}", session.email, session.role, session.role.home_path());
        self.session = Some(session);
        Ok(())
    }

    async fn dispatch(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Login { email, password } => {
                let request = LoginForm { email, password }.validate()?;
                let auth = self.services.auth.login(&request).await?;
                self.sign_in(Session::from_auth(&auth))
            }
            Commands::GoogleLogin { id_token } => {
                let auth = self.services.auth.google_login(&id_token).await?;
                self.sign_in(Session::from_auth(&auth))
            }
            Commands::Register {
                name,
                email,
                password,
                confirm,
                phone,
            } => {
                let request = RegisterForm {
                    name,
                    email,
                    phone,
                    password,
                    confirm_password: confirm,
                }
                .validate()?;
                let auth = self.services.auth.register(&request).await?;
                self.sign_in(Session::from_auth(&auth))
            }
            Commands::Logout => {
                self.services.auth.logout();
                self.store.clear()?;
                self.session = None;
                self.success("Signed out", "See you soon");
                Ok(())
            }
            Commands::Whoami => {
                match &self.session {
                    Some(s) => println!(
                        "{} <{}> role={} expires={}",
                        s.name,
                        s.email,
                        s.role,
                        s.expires_at
                            .map(|e| e.to_rfc3339())
                            .unwrap_or_else(|| "never".to_string())
                    ),
                    None => println!("Not signed in"),
                }
                Ok(())
            }
            Commands::Search {
                from,
                to,
                date,
                passengers,
                sort,
                table,
            } => {
                let sort: SearchSort = sort.parse()?;
                let mut form = SearchForm::new(Utc::now().date_naive());
                form.origin = from;
                form.destination = to;
                form.passengers = passengers;
                if let Some(date) = date {
                    form.date = date;
                }
                let search = ScheduleSearch::new(self.services.schedules.clone());
                let results = search.run(&form, sort, Utc::now()).await?;
                if results.is_empty() {
                    println!("No departures found");
                    return Ok(());
                }
                println!("{}", self.table(results, &table));
                Ok(())
            }
            Commands::Locations { term } => {
                let locations = self.services.locations.list().await?;
                let autocomplete = LocationAutocomplete::new(locations);
                for location in autocomplete.suggest(&term) {
                    println!("{}", location.label());
                }
                Ok(())
            }
            Commands::Seats { schedule_id } => {
                let map = self.services.schedules.seats(&schedule_id).await?;
                let free: Vec<&str> = map.available().map(|s| s.label.as_str()).collect();
                println!(
                    "{} of {} seats free: {}",
                    free.len(),
                    map.seats.len(),
                    free.join(" ")
                );
                Ok(())
            }
            Commands::Book {
                schedule_id,
                seats,
                name,
                phone,
            } => {
                self.enter(ClientRoute::Booking(schedule_id.clone()))?;
                let (schedule, seat_map) = futures::try_join!(
                    self.services.schedules.get(&schedule_id),
                    self.services.schedules.seats(&schedule_id),
                )?;
                if !schedule.is_bookable(Utc::now(), seats.len() as u32) {
                    let mut errors = ValidationErrors::new();
                    errors.push(ValidationError::InvalidFormat {
                        field: "scheduleId".to_string(),
                        reason: "departure is no longer bookable".to_string(),
                    });
                    return Err(errors.into());
                }
                let request = BookingForm {
                    schedule_id,
                    seats,
                    passenger_name: name,
                    passenger_phone: phone,
                    available_seats: schedule.available_seats,
                    seat_map: Some(seat_map),
                }
                .validate()?;
                let booking = self.services.bookings.create(&request).await?;
                self.success(
                    "Booking created",
                    format!("{} · {} due", booking.reference, money(booking.total_amount)),
                );
                println!("Pay with: bus-book pay {} --method <card|mobile-money|cash>", booking.id);
                Ok(())
            }
            Commands::Pay {
                booking_id,
                method,
                card_number,
                card_expiry,
                card_cvv,
                phone,
            } => {
                self.enter(ClientRoute::Booking(booking_id.clone()))?;
                let method: PaymentMethod = method.parse()?;
                let booking = self.services.bookings.get(&booking_id).await?;
                let mut form = PaymentForm::new(
                    booking.id.clone(),
                    booking.total_amount,
                    method,
                    Utc::now().date_naive(),
                );
                form.card_number = card_number;
                form.card_expiry = card_expiry;
                form.card_cvv = card_cvv;
                form.phone = phone;
                let request = form.validate()?;
                let payment = self.services.payments.pay(&request).await?;
                self.success(
                    "Payment received",
                    format!("{} for {} ({})", money(payment.amount), booking.reference, payment.status),
                );
                Ok(())
            }
            Commands::Bookings { action } => self.bookings(action).await,
            Commands::Profile { action } => self.profile(action).await,
            Commands::Company { action } => self.company(action).await,
            Commands::Admin { action } => self.admin(action).await,
        }
    }

    async fn bookings(&mut self, action: BookingAction) -> Result<()> {
        let user_id = self.enter(ClientRoute::MyBookings)?.user_id.clone();
        match action {
            BookingAction::List { table } => {
                let dashboard =
                    RiderDashboard::load(&user_id, &self.services.bookings, &self.services.payments).await?;
                let unpaid = dashboard.unpaid().len();
                println!("{}", self.table(dashboard.bookings, &table));
                if unpaid > 0 {
                    println!("{} booking(s) still awaiting payment", unpaid);
                }
            }
            BookingAction::Show { id } => {
                let (booking, payments) = futures::try_join!(
                    self.services.bookings.get(&id),
                    self.services.payments.by_booking(&id),
                )?;
                println!(
                    "{} · {} · seats {} · {} · {}",
                    booking.reference,
                    booking.trip(),
                    booking.seats.join(", "),
                    money(booking.total_amount),
                    booking.status
                );
                println!("{}", self.table(payments, &TableArgs::default()));
            }
            BookingAction::Cancel { id } => {
                let booking = self.services.bookings.get(&id).await?;
                if !booking.is_cancellable(Utc::now()) {
                    return Err(ApiError::Forbidden(format!(
                        "booking {} can no longer be cancelled",
                        booking.reference
                    )));
                }
                if !self.confirm(&format!("Cancel booking {} ({})?", booking.reference, booking.trip())) {
                    println!("Kept booking {}", booking.reference);
                    return Ok(());
                }
                self.services.bookings.cancel(&id).await?;
                self.success("Booking cancelled", booking.reference);
            }
        }
        Ok(())
    }

    async fn profile(&mut self, action: ProfileAction) -> Result<()> {
        let user_id = self.enter(ClientRoute::Profile)?.user_id.clone();
        match action {
            ProfileAction::Show => {
                let user = self.services.users.get(&user_id).await?;
                println!(
                    "{} <{}> {} role={}",
                    user.name,
                    user.email,
                    user.phone.as_deref().unwrap_or("-"),
                    user.role
                );
            }
            ProfileAction::Update { name, email, phone } => {
                let update = ProfileForm { name, email, phone }.validate()?;
                let user = self.services.users.update_profile(&user_id, &update).await?;
                if let Some(session) = self.session.as_mut() {
                    session.name = user.name.clone();
                    session.email = user.email.clone();
                    self.store.save(session)?;
                }
                self.success("Profile updated", user.name);
            }
            ProfileAction::Password {
                current,
                new,
                confirm,
            } => {
                let change = PasswordForm {
                    current_password: current,
                    new_password: new,
                    confirm_password: confirm,
                }
                .validate()?;
                self.services.users.change_password(&user_id, &change).await?;
                self.success("Password changed", "Use the new password next time you sign in");
            }
        }
        Ok(())
    }

    async fn company(&mut self, action: CompanyAction) -> Result<()> {
        let company_id = self.company_id()?;
        let now = Utc::now();
        match action {
            CompanyAction::Dashboard => {
                let s = &self.services;
                let dashboard =
                    CompanyDashboard::load(&company_id, &s.companies, &s.routes, &s.schedules, &s.bookings)
                        .await?;
                println!("{} ({})", dashboard.company.name, dashboard.company.status);
                println!(
                    "Routes: {} active of {}",
                    dashboard.active_routes(),
                    dashboard.routes.len()
                );
                println!(
                    "Upcoming departures: {} · average occupancy {:.0}%",
                    dashboard.upcoming(now).len(),
                    dashboard.average_occupancy(now) * 100.0
                );
                println!("Revenue: {}", money(dashboard.revenue()));
            }
            CompanyAction::Routes { action } => {
                self.enter(ClientRoute::CompanyRoutes)?;
                self.company_routes(&company_id, action).await?;
            }
            CompanyAction::Schedules { action } => {
                self.enter(ClientRoute::CompanySchedules)?;
                self.company_schedules(&company_id, action).await?;
            }
            CompanyAction::Bookings { table } => {
                self.enter(ClientRoute::CompanyBookings)?;
                let bookings = self.services.bookings.by_company(&company_id).await?;
                println!("{}", self.table(bookings, &table));
            }
        }
        Ok(())
    }

    async fn company_routes(&mut self, company_id: &str, action: RouteAction) -> Result<()> {
        let route_form = |args: RouteArgs| RouteForm {
            company_id: Some(company_id.to_string()),
            origin: args.from,
            destination: args.to,
            distance_km: args.distance_km,
            duration_minutes: args.minutes,
            base_price: args.price,
            active: !args.inactive,
        };

        match action {
            RouteAction::List { table } => {
                let routes = self.services.routes.by_company(company_id).await?;
                println!("{}", self.table(routes, &table));
            }
            RouteAction::Create { route } => {
                let body = route_form(route).validate()?;
                let route = self.services.routes.create(&body).await?;
                self.success("Route created", route.label());
            }
            RouteAction::Update { id, route } => {
                let body = route_form(route).validate()?;
                let route = self.services.routes.update(&id, &body).await?;
                self.success("Route updated", route.label());
            }
            RouteAction::Delete { id } => {
                let route = self.services.routes.get(&id).await?;
                if self.confirm(&format!("Delete route {}?", route.label())) {
                    self.services.routes.delete(&id).await?;
                    self.success("Route deleted", route.label());
                }
            }
        }
        Ok(())
    }

    async fn company_schedules(&mut self, company_id: &str, action: ScheduleAction) -> Result<()> {
        let schedule_form = |args: ScheduleArgs| {
            let mut form = ScheduleForm::new(Utc::now());
            form.route_id = args.route_id;
            form.departure = args.departure;
            form.arrival = args.arrival;
            form.bus_number = args.bus;
            form.total_seats = args.seats;
            form.price = args.price;
            form
        };

        match action {
            ScheduleAction::List { table } => {
                let schedules = self.services.schedules.by_company(company_id).await?;
                println!("{}", self.table(schedules, &table));
            }
            ScheduleAction::Create { schedule } => {
                let body = schedule_form(schedule).validate()?;
                let schedule = self.services.schedules.create(&body).await?;
                self.success("Schedule created", format!("{} departs {}", schedule.bus_number, schedule.departure));
            }
            ScheduleAction::Update { id, schedule } => {
                let body = schedule_form(schedule).validate()?;
                let schedule = self.services.schedules.update(&id, &body).await?;
                self.success("Schedule updated", format!("{} departs {}", schedule.bus_number, schedule.departure));
            }
            ScheduleAction::Cancel { id } => {
                if self.confirm(&format!("Cancel departure {}? Riders will be notified by the operator.", id)) {
                    self.services.schedules.cancel(&id).await?;
                    self.success("Departure cancelled", id);
                }
            }
            ScheduleAction::Delete { id } => {
                if self.confirm(&format!("Delete schedule {}?", id)) {
                    self.services.schedules.delete(&id).await?;
                    self.success("Schedule deleted", id);
                }
            }
            ScheduleAction::Manifest { id } => {
                let bookings = self.services.bookings.by_schedule(&id).await?;
                println!("{}", self.table(bookings, &TableArgs::default()));
            }
        }
        Ok(())
    }

    async fn admin(&mut self, action: AdminAction) -> Result<()> {
        self.enter(ClientRoute::AdminDashboard)?;
        match action {
            AdminAction::Dashboard => {
                let dashboard = AdminDashboard::load(&self.services.admin, &self.services.companies).await?;
                let stats = &dashboard.stats;
                println!(
                    "Users {} · Companies {} · Bookings {} · Revenue {}",
                    stats.users,
                    stats.companies,
                    stats.bookings,
                    money(stats.revenue)
                );
                let pending = dashboard.pending_companies();
                if !pending.is_empty() {
                    let names: Vec<&str> = pending.iter().map(|c| c.name.as_str()).collect();
                    println!("Awaiting approval: {}", names.join(", "));
                }
                println!("Inactive users: {}", dashboard.inactive_users());
            }
            AdminAction::Companies { action } => {
                self.enter(ClientRoute::AdminCompanies)?;
                self.admin_companies(action).await?;
            }
            AdminAction::Users { action } => {
                self.enter(ClientRoute::AdminUsers)?;
                self.admin_users(action).await?;
            }
            AdminAction::Locations { action } => {
                self.enter(ClientRoute::AdminLocations)?;
                self.admin_locations(action).await?;
            }
            AdminAction::Bookings { table } => {
                self.enter(ClientRoute::AdminBookings)?;
                let bookings = self.services.admin.bookings().await?;
                println!("{}", self.table(bookings, &table));
            }
            AdminAction::Refund { payment_id } => {
                let payment = self.services.payments.get(&payment_id).await?;
                if self.confirm(&format!(
                    "Refund {} paid by {} for booking {}?",
                    money(payment.amount),
                    payment.method,
                    payment.booking_id
                )) {
                    let refunded = self.services.payments.refund(&payment_id).await?;
                    self.success("Payment refunded", format!("{} ({})", money(refunded.amount), refunded.status));
                }
            }
        }
        Ok(())
    }

    async fn admin_companies(&mut self, action: AdminCompanyAction) -> Result<()> {
        match action {
            AdminCompanyAction::List { table } => {
                let companies = self.services.companies.list().await?;
                println!("{}", self.table(companies, &table));
            }
            AdminCompanyAction::Create {
                name,
                email,
                phone,
                address,
            } => {
                let body = CompanyForm {
                    name,
                    email,
                    phone,
                    address,
                }
                .validate()?;
                let company = self.services.companies.create(&body).await?;
                self.success("Company created", company.name);
            }
            AdminCompanyAction::Approve { id } => {
                self.services.companies.set_status(&id, CompanyStatus::Active).await?;
                self.success("Company approved", id);
            }
            AdminCompanyAction::Suspend { id } => {
                if self.confirm(&format!("Suspend company {}?", id)) {
                    self.services.companies.set_status(&id, CompanyStatus::Suspended).await?;
                    self.success("Company suspended", id);
                }
            }
            AdminCompanyAction::Delete { id } => {
                let company = self.services.companies.get(&id).await?;
                if self.confirm(&format!("Delete {} and all of its routes?", company.name)) {
                    self.services.companies.delete(&id).await?;
                    self.success("Company deleted", company.name);
                }
            }
        }
        Ok(())
    }

    async fn admin_users(&mut self, action: AdminUserAction) -> Result<()> {
        match action {
            AdminUserAction::List { table } => {
                let users = self.services.admin.users().await?;
                println!("{}", self.table(users, &table));
            }
            AdminUserAction::Role { id, role } => {
                let role: Role = role.parse()?;
                self.services.admin.set_role(&id, role).await?;
                self.success("Role changed", format!("{} is now {}", id, role));
            }
            AdminUserAction::Activate { id } => {
                self.services.admin.set_active(&id, true).await?;
                self.success("User activated", id);
            }
            AdminUserAction::Deactivate { id } => {
                if self.confirm(&format!("Deactivate user {}?", id)) {
                    self.services.admin.set_active(&id, false).await?;
                    self.success("User deactivated", id);
                }
            }
        }
        Ok(())
    }

    async fn admin_locations(&mut self, action: AdminLocationAction) -> Result<()> {
        match action {
            AdminLocationAction::List { table } => {
                let locations = self.services.locations.list().await?;
                println!("{}", self.table(locations, &table));
            }
            AdminLocationAction::Create {
                name,
                city,
                region,
                code,
            } => {
                let body = LocationForm {
                    name,
                    city,
                    region,
                    code,
                }
                .validate()?;
                let location = self.services.locations.create(&body).await?;
                self.success("Location created", location.label());
            }
            AdminLocationAction::Delete { id } => {
                if self.confirm(&format!("Delete location {}?", id)) {
                    self.services.locations.delete(&id).await?;
                    self.success("Location deleted", id);
                }
            }
        }
        Ok(())
    }
}

fn context(command: &Commands) -> &'static str {
    match command {
        Commands::Login { .. } => "Sign in",
        Commands::GoogleLogin { .. } => "Google sign in",
        Commands::Register { .. } => "Register",
        Commands::Logout => "Sign out",
        Commands::Whoami => "Session",
        Commands::Search { .. } => "Search schedules",
        Commands::Locations { .. } => "Load locations",
        Commands::Seats { .. } => "Load seats",
        Commands::Book { .. } => "Create booking",
        Commands::Pay { .. } => "Payment",
        Commands::Bookings { .. } => "Bookings",
        Commands::Profile { .. } => "Profile",
        Commands::Company { .. } => "Company panel",
        Commands::Admin { .. } => "Admin panel",
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let notifier = LogNotifier::default();

    let mut config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            report(&notifier, "Configuration", &e);
            process::exit(2);
        }
    };
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url);
    }

    let mut app = match App::new(config, cli.yes) {
        Ok(app) => app,
        Err(e) => {
            report(&notifier, "Startup", &e);
            process::exit(2);
        }
    };

    let context = context(&cli.command);
    info!("Running {}", context);
    if let Err(e) = app.dispatch(cli.command).await {
        report(&app.notifier, context, &e);
        if let Err(clear_err) = forget_if_unauthorized(&app.store, &e) {
            report(&app.notifier, "Sign out", &clear_err);
        }
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_takes_separate_confirmation() {
        let cli = Cli::try_parse_from([
            "bus-book", "register", "--name", "Achieng", "--email", "a@example.com",
            "--password", "secret123", "--confirm", "secret124",
        ])
        .unwrap();
        match cli.command {
            Commands::Register { password, confirm, .. } => {
                assert_eq!(password, "secret123");
                assert_eq!(confirm, "secret124");
            }
            _ => panic!("expected register"),
        }

        let missing = Cli::try_parse_from([
            "bus-book", "register", "--name", "Achieng", "--email", "a@example.com", "--password", "secret123",
        ]);
        assert!(missing.is_err());
    }
}
