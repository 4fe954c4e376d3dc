//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.

mod constants;
mod fixtures;

pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{
    count_rows, next_song_event, page_event, song_record, songplays, user_level, TestData,
};
