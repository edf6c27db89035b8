// Application wiring shared by the binary and the HTTP tests

use std::sync::Arc;

use actix_web::web;
use sqlx::MySqlPool;

use crate::config::AppConfig;
use crate::demo::DemoStore;
use crate::middleware::configure_extractors;
use crate::modules::bookings::repositories::{BookingRepository, MySqlBookingRepository};
use crate::modules::bookings::BookingService;
use crate::modules::companies::repositories::{CompanyRepository, MySqlCompanyRepository};
use crate::modules::companies::CompanyService;
use crate::modules::dashboard::DashboardService;
use crate::modules::drivers::repositories::{DriverRepository, MySqlDriverRepository};
use crate::modules::drivers::DriverService;
use crate::modules::health::DataStore;
use crate::modules::ratecards::repositories::{MySqlRateCardRepository, RateCardRepository};
use crate::modules::ratecards::RateCardService;
use crate::modules::reports::ReportService;
use crate::modules::vehicles::repositories::{MySqlVehicleRepository, VehicleRepository};
use crate::modules::vehicles::VehicleService;
use crate::modules::{
    bookings, companies, dashboard, drivers, health, ratecards, reports, vehicles,
};

/// One handle per repository trait
#[derive(Clone)]
pub struct Repositories {
    pub bookings: Arc<dyn BookingRepository>,
    pub companies: Arc<dyn CompanyRepository>,
    pub drivers: Arc<dyn DriverRepository>,
    pub vehicles: Arc<dyn VehicleRepository>,
    pub rate_cards: Arc<dyn RateCardRepository>,
    pub store: DataStore,
}

impl Repositories {
    pub fn mysql(pool: MySqlPool) -> Self {
        Self {
            bookings: Arc::new(MySqlBookingRepository::new(pool.clone())),
            companies: Arc::new(MySqlCompanyRepository::new(pool.clone())),
            drivers: Arc::new(MySqlDriverRepository::new(pool.clone())),
            vehicles: Arc::new(MySqlVehicleRepository::new(pool.clone())),
            rate_cards: Arc::new(MySqlRateCardRepository::new(pool.clone())),
            store: DataStore::MySql(pool),
        }
    }

    pub fn demo(store: DemoStore) -> Self {
        let store = Arc::new(store);
        Self {
            bookings: store.clone(),
            companies: store.clone(),
            drivers: store.clone(),
            vehicles: store.clone(),
            rate_cards: store,
            store: DataStore::Demo,
        }
    }
}

/// Service layer built once at start-up and shared across workers
#[derive(Clone)]
pub struct Services {
    pub bookings: Arc<BookingService>,
    pub companies: Arc<CompanyService>,
    pub drivers: Arc<DriverService>,
    pub vehicles: Arc<VehicleService>,
    pub rate_cards: Arc<RateCardService>,
    pub reports: Arc<ReportService>,
    pub dashboard: Arc<DashboardService>,
    pub store: DataStore,
}

impl Services {
    pub fn new(repos: Repositories, app: &AppConfig) -> Self {
        let timeout = app.query_timeout();

        Self {
            bookings: Arc::new(BookingService::new(
                repos.bookings.clone(),
                repos.companies.clone(),
                repos.vehicles.clone(),
                repos.drivers.clone(),
                repos.rate_cards.clone(),
                app.gst_rate,
            )),
            companies: Arc::new(CompanyService::new(repos.companies.clone())),
            drivers: Arc::new(DriverService::new(repos.drivers.clone())),
            vehicles: Arc::new(VehicleService::new(
                repos.vehicles.clone(),
                repos.bookings.clone(),
                repos.drivers.clone(),
            )),
            rate_cards: Arc::new(RateCardService::new(
                repos.rate_cards.clone(),
                repos.companies.clone(),
            )),
            reports: Arc::new(ReportService::new(repos.bookings.clone(), timeout)),
            dashboard: Arc::new(DashboardService::new(
                repos.bookings,
                repos.vehicles,
                timeout,
            )),
            store: repos.store,
        }
    }

    /// Register services as app data and mount every route
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.bookings.clone()))
            .app_data(web::Data::new(self.companies.clone()))
            .app_data(web::Data::new(self.drivers.clone()))
            .app_data(web::Data::new(self.vehicles.clone()))
            .app_data(web::Data::new(self.rate_cards.clone()))
            .app_data(web::Data::new(self.reports.clone()))
            .app_data(web::Data::new(self.dashboard.clone()))
            .app_data(web::Data::new(self.store.clone()));

        configure_extractors(cfg);
        health::controllers::configure(cfg);
        cfg.service(web::scope("/api").configure(configure_api));
    }
}

/// Routes under /api
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    dashboard::controllers::configure(cfg);
    reports::controllers::configure(cfg);
    bookings::controllers::configure(cfg);
    vehicles::controllers::configure(cfg);
    companies::controllers::configure(cfg);
    drivers::controllers::configure(cfg);
    ratecards::controllers::configure(cfg);
}
