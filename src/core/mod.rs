// Core algorithm exports
pub mod clock;
pub mod distance;
pub mod filters;
pub mod ranker;
pub mod schedule;

pub use clock::{Clock, FixedClock, LocalClock};
pub use distance::{haversine_distance, distance_km, bounding_box_of};
pub use filters::{matches_open_filter, within_distance_limit, matches_criteria};
pub use ranker::{rank, RankResult};
pub use schedule::{is_open, is_open_on, minutes_of_day};
