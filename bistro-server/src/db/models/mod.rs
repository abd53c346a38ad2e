//! Database Models

// Serde helpers
pub mod serde_helpers;

// Discovery
pub mod restaurant;
pub mod search_log;

// Reservation
pub mod booking;
pub mod table;

// Re-exports
pub use booking::{ActiveBooking, Booking, BookingCreate};
pub use restaurant::{Restaurant, RestaurantCreate, RestaurantUpdate, RestaurantWithDistance};
pub use search_log::SearchLog;
pub use table::{DiningTable, TableCreate, TableStatus};
