//! Media request criteria and torrent item records.

mod types;

pub use types::*;
