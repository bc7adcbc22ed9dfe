//! Typed endpoint wrappers for the Reserva booking backend
//!
//! Thin passthrough functions over [`reserva_client::ApiClient`]: users
//! (login/logout/register/profile), reservations (CRUD plus admin
//! approval), the calendar with an explicit caller-owned month cache,
//! primetime-window administration, and the dashboard overviews.
//! All request/response shapes mirror the backend's JSON field names.
//!
//! These functions add no error handling of their own — auth failures are
//! resolved (or surfaced) by the client core, everything else propagates
//! for caller-level presentation.

pub mod calendar;
pub mod dashboard;
pub mod primetime;
pub mod reservations;
pub mod users;

pub use calendar::{CalendarDay, CalendarResponse, MonthCache, TimeSlot};
pub use dashboard::DashboardData;
pub use primetime::{CreatePrimeTime, PrimeTimeSettings, UpdatePrimeTime};
pub use reservations::{CreateReservation, Reservation, UpdateReservation};
pub use users::{LoginResponse, RegisterRequest, UserProfile};
