//! A public-transit journey-planning engine implementing the trip-based
//! routing algorithm : the timetable is indexed once into lines and a
//! precomputed transfer-edge table, and each query scans a bounded number of
//! trips per transfer round instead of the whole network.

mod engine;

pub mod config;
pub mod lines;
pub mod request;
pub mod response;
pub mod time;
pub mod timetable;
pub mod transfers;
pub mod transit_data;

pub use config::Config;
pub use request::{JourneyRequest, ProfileRequest, RequestError};
pub use response::{Journey, Leg, Response, SearchStatus};
pub use time::{PositiveDuration, SecondsSinceDayStart};
pub use timetable::builder::TimetableBuilder;
pub use timetable::{ModelError, Timetable};
pub use transit_data::TransitData;
