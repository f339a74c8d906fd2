pub mod analytics;
pub mod auth;
pub mod bookings;
pub mod health;
pub mod metrics;
pub mod trains;
