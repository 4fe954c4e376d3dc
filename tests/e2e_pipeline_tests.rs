//! End-to-end tests for loading song and log trees
//!
//! Each test loads a temporary data tree into a database file and inspects
//! the committed result through a separate connection.

mod common;

use common::*;
use sparkify_etl::etl::{process_data, EtlError, PipelineSummary, Progress};
use sparkify_etl::{LogFileTransformer, SongFileTransformer, SqliteSparkifyStore, SQLITE_QUERIES};

fn open_store(data: &TestData) -> SqliteSparkifyStore {
    SqliteSparkifyStore::open(&data.db_path, SQLITE_QUERIES).unwrap()
}

fn load_songs(store: &mut SqliteSparkifyStore, data: &TestData) -> PipelineSummary {
    process_data(store, &data.song_data, "json", &SongFileTransformer, |_| {}).unwrap()
}

fn load_logs(store: &mut SqliteSparkifyStore, data: &TestData) -> PipelineSummary {
    process_data(store, &data.log_data, "json", &LogFileTransformer, |_| {}).unwrap()
}

// =============================================================================
// Song Tests
// =============================================================================

#[test]
fn test_each_song_file_yields_one_song_and_one_artist() {
    let data = TestData::new().unwrap();
    data.add_reference_songs().unwrap();
    let mut store = open_store(&data);

    let summary = load_songs(&mut store, &data);

    assert_eq!(summary.files_processed, 2);
    let conn = data.connect().unwrap();
    assert_eq!(count_rows(&conn, "songs").unwrap(), 2);
    assert_eq!(count_rows(&conn, "artists").unwrap(), 2);
}

#[test]
fn test_reloading_songs_adds_no_duplicates() {
    let data = TestData::new().unwrap();
    data.add_reference_songs().unwrap();

    {
        let mut store = open_store(&data);
        load_songs(&mut store, &data);
    }
    let mut store = open_store(&data);
    load_songs(&mut store, &data);

    let conn = data.connect().unwrap();
    assert_eq!(count_rows(&conn, "songs").unwrap(), 2);
    assert_eq!(count_rows(&conn, "artists").unwrap(), 2);
}

// =============================================================================
// Log Tests
// =============================================================================

#[test]
fn test_only_next_song_events_become_rows() {
    let data = TestData::new().unwrap();
    data.add_log_file(
        "2018/11/2018-11-01-events.json",
        &[
            page_event("Home", TS_NOV_1 - 5000),
            next_song_event(USER_ID, "free", TS_NOV_1, "Some Song", "Some Artist", 100.0),
            page_event("Logout", TS_NOV_1 + 1000),
            page_event("Upgrade", TS_NOV_1 + 2000),
            next_song_event(26, "free", TS_NOV_2_MORNING, "Other", "Someone", 200.0),
        ],
    )
    .unwrap();
    let mut store = open_store(&data);

    let summary = load_logs(&mut store, &data);

    assert_eq!(summary.stats.records_read, 5);
    assert_eq!(summary.stats.records_skipped, 3);
    let conn = data.connect().unwrap();
    assert_eq!(count_rows(&conn, "songplays").unwrap(), 2);
    assert_eq!(count_rows(&conn, "time").unwrap(), 2);
    assert_eq!(count_rows(&conn, "users").unwrap(), 2);
}

#[test]
fn test_user_level_follows_last_event_in_file() {
    let data = TestData::new().unwrap();
    data.add_log_file(
        "2018-11-01-events.json",
        &[
            next_song_event(USER_ID, "free", TS_NOV_1, "A", "B", 1.0),
            next_song_event(USER_ID, "paid", TS_NOV_1 + 1000, "A", "B", 1.0),
            next_song_event(USER_ID, "free", TS_NOV_1 + 2000, "A", "B", 1.0),
        ],
    )
    .unwrap();
    let mut store = open_store(&data);

    load_logs(&mut store, &data);

    let conn = data.connect().unwrap();
    assert_eq!(user_level(&conn, USER_ID).unwrap().as_deref(), Some("free"));
    assert_eq!(count_rows(&conn, "users").unwrap(), 1);
}

#[test]
fn test_user_level_follows_last_file_processed() {
    let data = TestData::new().unwrap();
    data.add_log_file(
        "2018-11-01-events.json",
        &[next_song_event(USER_ID, "free", TS_NOV_1, "A", "B", 1.0)],
    )
    .unwrap();
    data.add_log_file(
        "2018-11-02-events.json",
        &[next_song_event(USER_ID, "paid", TS_NOV_2, "A", "B", 1.0)],
    )
    .unwrap();
    let mut store = open_store(&data);

    load_logs(&mut store, &data);

    let conn = data.connect().unwrap();
    assert_eq!(user_level(&conn, USER_ID).unwrap().as_deref(), Some("paid"));
}

#[test]
fn test_same_clock_time_on_different_dates_shares_a_time_row() {
    let data = TestData::new().unwrap();
    data.add_log_file(
        "2018-11-01-events.json",
        &[
            next_song_event(USER_ID, "free", TS_NOV_1, "A", "B", 1.0),
            next_song_event(USER_ID, "free", TS_NOV_2, "A", "B", 1.0),
        ],
    )
    .unwrap();
    let mut store = open_store(&data);

    load_logs(&mut store, &data);

    let conn = data.connect().unwrap();
    // Time buckets key on time-of-day only: both events land in one row
    assert_eq!(count_rows(&conn, "time").unwrap(), 1);
    let (start_time, day): (String, i64) = conn
        .query_row("SELECT start_time, day FROM time", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .unwrap();
    assert_eq!(start_time, "21:01:46.796");
    // The first event inserted the bucket, the second was ignored
    assert_eq!(day, 1);

    // Songplays keep the full timestamp
    let plays = songplays(&conn).unwrap();
    assert_eq!(plays.len(), 2);
    assert_eq!(plays[0].0, "2018-11-01 21:01:46.796");
    assert_eq!(plays[1].0, "2018-11-02 21:01:46.796");
}

// =============================================================================
// Lookup Tests
// =============================================================================

#[test]
fn test_songplay_resolves_only_on_exact_match() {
    let data = TestData::new().unwrap();
    data.add_reference_songs().unwrap();
    data.add_log_file(
        "2018-11-01-events.json",
        &[
            next_song_event(USER_ID, "free", TS_NOV_1, SONG_1_TITLE, ARTIST_1_NAME, SONG_1_DURATION),
            next_song_event(USER_ID, "free", TS_NOV_1 + 1, SONG_1_TITLE, ARTIST_1_NAME, 218.9318),
            next_song_event(USER_ID, "free", TS_NOV_1 + 2, SONG_1_TITLE, ARTIST_2_NAME, SONG_1_DURATION),
            next_song_event(USER_ID, "free", TS_NOV_1 + 3, SONG_2_TITLE, ARTIST_2_NAME, SONG_2_DURATION),
        ],
    )
    .unwrap();
    let mut store = open_store(&data);

    load_songs(&mut store, &data);
    let summary = load_logs(&mut store, &data);

    assert_eq!(summary.stats.songplays, 4);
    assert_eq!(summary.stats.songplays_resolved, 2);

    let conn = data.connect().unwrap();
    let ids: Vec<(Option<String>, Option<String>)> = songplays(&conn)
        .unwrap()
        .into_iter()
        .map(|(_, song, artist)| (song, artist))
        .collect();
    assert_eq!(
        ids,
        vec![
            (Some(SONG_1_ID.to_string()), Some(ARTIST_1_ID.to_string())),
            (None, None),
            (None, None),
            (Some(SONG_2_ID.to_string()), Some(ARTIST_2_ID.to_string())),
        ]
    );
}

#[test]
fn test_lookup_sees_only_songs_loaded_before_it() {
    let data = TestData::new().unwrap();
    data.add_reference_songs().unwrap();
    data.add_log_file(
        "2018-11-01-events.json",
        &[next_song_event(
            USER_ID,
            "free",
            TS_NOV_1,
            SONG_1_TITLE,
            ARTIST_1_NAME,
            SONG_1_DURATION,
        )],
    )
    .unwrap();
    let mut store = open_store(&data);

    // Logs first: the songs table is still empty at lookup time
    load_logs(&mut store, &data);
    load_songs(&mut store, &data);

    let conn = data.connect().unwrap();
    assert_eq!(songplays(&conn).unwrap()[0].1, None);
}

#[test]
fn test_reference_scenario_resolves_song_and_artist() {
    let data = TestData::new().unwrap();
    data.add_song_file(
        "S1.json",
        &serde_json::json!({
            "song_id": "S1",
            "title": "T",
            "artist_id": "A1",
            "year": 2000,
            "duration": 180.5,
            "artist_name": "N",
            "artist_location": "L",
            "artist_latitude": 1.0,
            "artist_longitude": 2.0
        }),
    )
    .unwrap();
    data.add_log_file(
        "events.json",
        &[next_song_event(USER_ID, "paid", TS_NOV_1, "T", "N", 180.5)],
    )
    .unwrap();
    let mut store = open_store(&data);

    load_songs(&mut store, &data);
    load_logs(&mut store, &data);

    let conn = data.connect().unwrap();
    let plays = songplays(&conn).unwrap();
    assert_eq!(plays.len(), 1);
    assert_eq!(plays[0].1.as_deref(), Some("S1"));
    assert_eq!(plays[0].2.as_deref(), Some("A1"));
}

// =============================================================================
// Driver Tests
// =============================================================================

#[test]
fn test_empty_tree_reports_zero_of_zero_and_writes_nothing() {
    let data = TestData::new().unwrap();
    let mut store = open_store(&data);
    let mut lines = Vec::new();

    let summary = process_data(&mut store, &data.log_data, "json", &LogFileTransformer, |p| {
        lines.push(p.to_string())
    })
    .unwrap();

    assert_eq!(lines, vec!["0/0 files processed.".to_string()]);
    assert_eq!(summary.files_found, 0);
    let conn = data.connect().unwrap();
    for table in ["songplays", "users", "songs", "artists", "time"] {
        assert_eq!(count_rows(&conn, table).unwrap(), 0);
    }
}

#[test]
fn test_progress_counts_every_file() {
    let data = TestData::new().unwrap();
    data.add_reference_songs().unwrap();
    let mut store = open_store(&data);
    let mut progress = Vec::new();

    process_data(&mut store, &data.song_data, "json", &SongFileTransformer, |p| {
        progress.push(p)
    })
    .unwrap();

    assert_eq!(
        progress,
        vec![
            Progress {
                processed: 1,
                total: 2
            },
            Progress {
                processed: 2,
                total: 2
            }
        ]
    );
}

#[test]
fn test_failure_keeps_earlier_files_committed() {
    let data = TestData::new().unwrap();
    data.add_log_file(
        "2018-11-01-events.json",
        &[next_song_event(USER_ID, "free", TS_NOV_1, "A", "B", 1.0)],
    )
    .unwrap();
    data.add_log_file(
        "2018-11-02-events.json",
        &[
            next_song_event(USER_ID, "paid", TS_NOV_2, "A", "B", 1.0),
            serde_json::json!({"page": "NextSong", "ts": TS_NOV_2_MORNING}),
        ],
    )
    .unwrap();
    data.add_log_file(
        "2018-11-03-events.json",
        &[next_song_event(99, "free", TS_NOV_2 + 86_400_000, "A", "B", 1.0)],
    )
    .unwrap();
    let mut store = open_store(&data);
    let mut progress = Vec::new();

    let result = process_data(&mut store, &data.log_data, "json", &LogFileTransformer, |p| {
        progress.push(p.processed)
    });

    match result {
        Err(EtlError::MalformedRecord { path, line, .. }) => {
            assert!(path.ends_with("2018-11-02-events.json"));
            assert_eq!(line, 2);
        }
        other => panic!("expected MalformedRecord, got {:?}", other),
    }
    assert_eq!(progress, vec![1]);
    drop(store);

    let conn = data.connect().unwrap();
    assert_eq!(count_rows(&conn, "songplays").unwrap(), 1);
    assert_eq!(user_level(&conn, USER_ID).unwrap().as_deref(), Some("free"));
    assert_eq!(user_level(&conn, 99).unwrap(), None);
}

#[test]
fn test_missing_root_is_not_found() {
    let data = TestData::new().unwrap();
    let mut store = open_store(&data);

    let result = process_data(
        &mut store,
        &data.dir.path().join("no_such_dir"),
        "json",
        &SongFileTransformer,
        |_| {},
    );

    assert!(matches!(result, Err(EtlError::NotFound(_))));
}
