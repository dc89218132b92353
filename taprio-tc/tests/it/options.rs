use std::io::Write as _;

use taprio_tc::args;
use taprio_wire::{ClockId, CommandKind, Schedule, ScheduleEntry, decode, encode};

fn tokens(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

#[test]
fn command_line_round_trips_through_the_wire() {
    let config = args::parse(tokens(
        "num_tc 3 map 2 2 1 0 2 2 2 2 2 2 2 2 2 2 2 2 queues 1@0 1@1 2@2 \
         base-time 1528743495910289987 cycle-time 1000000 clockid CLOCK_TAI \
         sched-row 0 S 0x1 300000",
    ))
    .unwrap();

    let decoded = decode(&encode(&config).unwrap()).unwrap();
    assert_eq!(decoded, config);
    assert_eq!(decoded.clock(), Some(ClockId::Tai));
    assert_eq!(
        decoded.to_string().lines().next().unwrap(),
        "tc 3 map 2 2 1 0 2 2 2 2 2 2 2 2 2 2 2 2"
    );
}

#[test]
fn schedule_file_from_the_command_line() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "S 0x01 300000").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "R 0x02 200000").unwrap();
    file.flush().unwrap();

    let line = format!("num_tc 2 map 0 1 sched-file {} clockid TAI", file.path().display());
    let config = args::parse(tokens(&line)).unwrap();

    assert_eq!(
        config.schedule,
        Schedule::EntryList(vec![
            ScheduleEntry::new(0, CommandKind::SetGates, 0x1, 300_000),
            ScheduleEntry::new(1, CommandKind::SetAndRelease, 0x2, 200_000),
        ])
    );
    assert_eq!(decode(&encode(&config).unwrap()).unwrap().schedule, config.schedule);
}

#[test]
fn missing_schedule_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.sched");
    let line = format!("num_tc 1 sched-file {}", path.display());

    let err = args::parse(tokens(&line)).unwrap_err();
    assert!(matches!(
        err,
        args::Error::Config(taprio_wire::Error::ScheduleFileUnavailable { .. })
    ));
}

#[test]
fn preemption_count_must_match_traffic_classes() {
    let err = args::parse(tokens("num_tc 3 preemption 1 0")).unwrap_err();
    assert!(matches!(
        err,
        args::Error::Config(taprio_wire::Error::PreemptionCount { expected: 3, actual: 2 })
    ));
}

#[test]
fn invalid_sched_row_command() {
    let err = args::parse(tokens("num_tc 1 sched-row 0 X 0x1 100")).unwrap_err();
    assert!(matches!(err, args::Error::Config(taprio_wire::Error::InvalidCommand(c)) if c == "X"));
}
