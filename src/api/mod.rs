//! HTTP API
//!
//! Public pages and forms, the two sign-in surfaces, and the staff, board and
//! volunteer dashboards.

pub mod auth;
pub mod board;
pub mod extract;
pub mod public;
pub mod staff;
pub mod volunteer;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::applications::{IntakeService, ReviewManager};
use crate::auth::{AuthService, SessionManager};
use crate::config::AppConfig;
use crate::database::Database;
use crate::donations::CheckoutClient;
use crate::error::PortalError;
use crate::meetings::MeetingManager;
use crate::realtime::ChangeFeed;
use crate::storage::ObjectStore;
use crate::volunteers::VolunteerManager;

pub use extract::{AuthUser, JsonBody};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub database: Database,
    pub feed: ChangeFeed,
    pub store: ObjectStore,
    pub auth: AuthService,
    pub intake: IntakeService,
    pub review: ReviewManager,
    pub meetings: MeetingManager,
    pub volunteers: VolunteerManager,
    pub checkout: CheckoutClient,
}

impl AppState {
    pub fn new(config: AppConfig, database: Database) -> Result<Self, PortalError> {
        let feed = ChangeFeed::new();
        let store = ObjectStore::new(&config.storage_root, &config.storage_public_url);
        let sessions = SessionManager::new(&config.jwt_secret, config.session_ttl_hours)?;
        let checkout = CheckoutClient::new(
            &config.stripe_api_base,
            &config.stripe_secret_key,
            &config.site_url,
        );

        Ok(Self {
            auth: AuthService::new(database.clone(), sessions),
            intake: IntakeService::new(database.clone(), feed.clone()),
            review: ReviewManager::new(database.clone(), feed.clone()),
            meetings: MeetingManager::new(database.clone(), store.clone()),
            volunteers: VolunteerManager::new(database.clone()),
            checkout,
            store,
            feed,
            database,
            config,
        })
    }
}

pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(public::health))
        .route("/api/programs", get(public::programs))
        .route("/api/applications", post(public::submit_application))
        .route("/api/uploads/scholarship", post(public::upload_scholarship_document))
        .route("/storage/:bucket/:key", get(public::serve_object))
        .route("/api/donations/presets", get(public::donation_presets))
        .route("/api/create-checkout-session", post(public::create_checkout_session))
        .route("/api/donations/return", get(public::donation_return));

    let auth = Router::new()
        .route("/api/auth/staff/login", post(auth::staff_login))
        .route("/api/auth/volunteer/login", post(auth::volunteer_login))
        .route("/api/auth/volunteer/signup", post(auth::volunteer_signup))
        .route("/api/auth/session", get(auth::current_session));

    let staff = Router::new()
        .route("/api/staff/applications", get(staff::list_applications))
        .route("/api/staff/applications/counts", get(staff::status_counts))
        .route("/api/staff/applications/stream", get(staff::application_stream))
        .route("/api/staff/applications/:id", get(staff::application_detail))
        .route("/api/staff/applications/:id/votes", post(staff::cast_vote))
        .route("/api/staff/applications/:id/notes", post(staff::add_note))
        .route("/api/staff/applications/:id/status", post(staff::update_status))
        .route("/api/staff/grants", get(staff::list_grants));

    let board = Router::new()
        .route("/api/board/meetings", get(board::list_meetings).post(board::create_meeting))
        .route("/api/board/meetings/:id", get(board::meeting_detail))
        .route("/api/board/meetings/:id/minutes", post(board::upload_minutes))
        .route("/api/board/meetings/:id/rsvp", post(board::rsvp))
        .route("/api/board/minutes/:id/votes", post(board::cast_minutes_vote));

    let volunteer = Router::new()
        .route("/api/volunteer/profile", get(volunteer::my_profile).put(volunteer::update_profile))
        .route("/api/volunteer/opportunities", get(volunteer::list_opportunities))
        .route("/api/volunteer/opportunities/:id/rsvp", post(volunteer::rsvp))
        .route("/api/volunteer/rsvps", get(volunteer::my_rsvps))
        .route("/api/volunteer/rsvps/:id/cancel", post(volunteer::cancel_rsvp))
        .route("/api/volunteer/announcements", get(volunteer::announcements))
        .route("/api/volunteer/announcements/:id/read", post(volunteer::mark_read))
        .route("/api/admin/opportunities", post(volunteer::create_opportunity))
        .route("/api/admin/opportunities/:id/rsvps", get(volunteer::opportunity_rsvps))
        .route("/api/admin/rsvps/:id/attended", post(volunteer::mark_attended))
        .route("/api/admin/announcements", post(volunteer::create_announcement));

    Router::new()
        .merge(public)
        .merge(auth)
        .merge(staff)
        .merge(board)
        .merge(volunteer)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).into_inner())
        .with_state(state)
}
