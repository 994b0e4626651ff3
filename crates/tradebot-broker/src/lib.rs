//! Order execution venues.

mod virtual_venue;

pub use virtual_venue::{AccountSnapshot, VirtualVenue};
