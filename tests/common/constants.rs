//! Shared constants for end-to-end tests
//!
//! When test data changes, update only this file.

// ============================================================================
// Test Song Data
// ============================================================================

pub const SONG_1_ID: &str = "SOMZWCG12A8C13C480";
pub const SONG_1_TITLE: &str = "I Didn't Mean To";
pub const SONG_1_DURATION: f64 = 218.93179;

pub const SONG_2_ID: &str = "SOUPIRU12A6D4FA1E1";
pub const SONG_2_TITLE: &str = "Der Kleine Dompfaff";
pub const SONG_2_DURATION: f64 = 152.92036;

pub const ARTIST_1_ID: &str = "ARD7TVE1187B99BFB1";
pub const ARTIST_1_NAME: &str = "Casual";

pub const ARTIST_2_ID: &str = "ARJIE2Y1187B994AB7";
pub const ARTIST_2_NAME: &str = "Line Renaud";

// ============================================================================
// Test Event Data
// ============================================================================

/// 2018-11-01 21:01:46.796 UTC
pub const TS_NOV_1: i64 = 1541106106796;

/// 2018-11-02 21:01:46.796 UTC, same clock time as `TS_NOV_1`
pub const TS_NOV_2: i64 = 1541192506796;

/// 2018-11-02 09:30:00.000 UTC
pub const TS_NOV_2_MORNING: i64 = 1541151000000;

pub const USER_ID: i64 = 15;
