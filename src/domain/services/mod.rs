// Pure pipeline stages. No I/O happens here.

pub mod fields;
pub mod selector;
pub mod timestamp;
pub mod value;

pub use fields::resolve_intervals;
pub use selector::{select_upcoming, Selection};
pub use timestamp::{LocalZone, TimestampNormalizer};
pub use value::{normalize_value, parse_price, round2, PricingPolicy};
