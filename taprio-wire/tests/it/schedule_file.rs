use std::io::Write as _;

use taprio_wire::{
    CommandKind, ConfigBuilder, Error, SchedRow, Schedule, ScheduleEntry, decode, encode,
};

fn schedule_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn file_entries_round_trip_with_sequential_indices() {
    let _ = tracing_subscriber::fmt::try_init();

    let file = schedule_file("S 1 100000\nH 2 200000\n");
    let config = ConfigBuilder::new()
        .with_num_tc(2)
        .with_sched_file(file.path())
        .build()
        .unwrap();

    let expected = vec![
        ScheduleEntry::new(0, CommandKind::SetGates, 0x1, 100_000),
        ScheduleEntry::new(1, CommandKind::SetAndHold, 0x2, 200_000),
    ];
    assert_eq!(config.schedule, Schedule::EntryList(expected.clone()));

    let decoded = decode(&encode(&config).unwrap()).unwrap();
    assert_eq!(decoded.schedule, Schedule::EntryList(expected));
    for (i, entry) in decoded.schedule.entries().iter().enumerate() {
        assert_eq!(entry.index, i as u32);
    }
}

#[test]
fn invalid_command_discards_the_whole_file() {
    let file = schedule_file("S 1 100000\nX 2 200000\n");
    let err = ConfigBuilder::new().with_num_tc(1).with_sched_file(file.path()).build().unwrap_err();
    assert!(matches!(err, Error::InvalidCommand(c) if c == "X"));
}

#[test]
fn unreadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.sched");
    let err = ConfigBuilder::new().with_sched_file(&path).build().unwrap_err();
    assert!(matches!(err, Error::ScheduleFileUnavailable { path: p, .. } if p == path));
}

#[test]
fn file_and_row_conflict_in_either_order() {
    let file = schedule_file("S 1 100000\n");
    let row = SchedRow::new("0", "S", "0x1", "100000");

    let err = ConfigBuilder::new()
        .with_sched_file(file.path())
        .with_sched_row(row.clone())
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::ConflictingScheduleSource));

    let err =
        ConfigBuilder::new().with_sched_row(row).with_sched_file(file.path()).build().unwrap_err();
    assert!(matches!(err, Error::ConflictingScheduleSource));
}

#[test]
fn empty_file_is_an_empty_list() {
    let file = schedule_file("");
    let config = ConfigBuilder::new().with_num_tc(1).with_sched_file(file.path()).build().unwrap();
    assert_eq!(config.schedule, Schedule::EntryList(Vec::new()));
    let decoded = decode(&encode(&config).unwrap()).unwrap();
    assert_eq!(decoded.schedule, Schedule::EntryList(Vec::new()));
}
