use taprio_wire::{
    CLOCKID_INVALID, ClockId, CommandKind, ConfigBuilder, Error, QueueRange, SchedRow, Schedule,
    ScheduleConfig, ScheduleEntry, attr::*, decode, encode, nla::NlaIter,
};

/// Top-level attribute types of an encoded buffer, in order.
fn kinds(buf: &[u8]) -> Vec<u16> {
    NlaIter::new(buf).map(|nla| nla.unwrap().kind).collect()
}

#[test]
fn single_row_example() {
    let config = ConfigBuilder::new()
        .with_num_tc(2)
        .with_priority_map(&[0, 0, 1, 1])
        .with_sched_row(SchedRow::new("0", "S", "0x3", "1000"))
        .build()
        .unwrap();

    let bytes = encode(&config).unwrap();
    assert_eq!(
        kinds(&bytes),
        vec![
            TCA_TAPRIO_ATTR_PRIOMAP,
            TCA_TAPRIO_ATTR_SCHED_CLOCKID,
            TCA_TAPRIO_ATTR_SCHED_SINGLE_ENTRY
        ]
    );

    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.num_tc, 2);
    assert_eq!(&decoded.priority_map[..5], &[0, 0, 1, 1, 0]);
    assert_eq!(decoded.clock_id, CLOCKID_INVALID);
    assert_eq!(
        decoded.schedule,
        Schedule::SingleEntry(ScheduleEntry::new(0, CommandKind::SetGates, 0x3, 1000))
    );
    assert_eq!(decoded, config);
}

#[test]
fn empty_trailing_queue_range_round_trips() {
    let config = ConfigBuilder::new()
        .with_num_tc(2)
        .with_queues(vec![QueueRange::new(1, 0), QueueRange::new(0, 0)])
        .build()
        .unwrap();
    assert_eq!(decode(&encode(&config).unwrap()).unwrap(), config);

    let config = ConfigBuilder::new()
        .with_num_tc(3)
        .with_queues(vec![QueueRange::new(0, 0), QueueRange::new(2, 0)])
        .build()
        .unwrap();
    let decoded = decode(&encode(&config).unwrap()).unwrap();
    assert_eq!(decoded.queues, vec![QueueRange::new(0, 0), QueueRange::new(2, 0)]);
    assert_eq!(decoded, config);
}

#[test]
fn full_config_round_trips() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = ScheduleConfig {
        num_tc: 3,
        priority_map: [2, 2, 1, 0, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2],
        queues: vec![QueueRange::new(1, 0), QueueRange::new(1, 1), QueueRange::new(2, 2)],
        clock_id: ClockId::Tai.as_raw(),
        base_time: 1_528_743_495_910_289_987,
        cycle_time: 1_000_000,
        extension_time: -20,
        preemption_mask: 0b110,
        schedule: Schedule::EntryList(vec![
            ScheduleEntry::new(0, CommandKind::SetGates, 0x1, 300_000),
            ScheduleEntry::new(1, CommandKind::SetAndHold, 0x3, 300_000),
            ScheduleEntry::new(2, CommandKind::SetAndRelease, 0x4, 400_000),
        ]),
    };

    let bytes = encode(&config).unwrap();
    assert_eq!(
        kinds(&bytes),
        vec![
            TCA_TAPRIO_ATTR_PRIOMAP,
            TCA_TAPRIO_ATTR_PREEMPT_MASK,
            TCA_TAPRIO_ATTR_SCHED_BASE_TIME,
            TCA_TAPRIO_ATTR_SCHED_CYCLE_TIME,
            TCA_TAPRIO_ATTR_SCHED_EXTENSION_TIME,
            TCA_TAPRIO_ATTR_SCHED_CLOCKID,
            TCA_TAPRIO_ATTR_SCHED_ENTRY_LIST,
        ]
    );
    assert_eq!(decode(&bytes).unwrap(), config);
}

#[test]
fn zero_times_are_never_encoded() {
    let zero = ScheduleConfig { num_tc: 1, ..Default::default() };
    let bytes = encode(&zero).unwrap();
    assert_eq!(kinds(&bytes), vec![TCA_TAPRIO_ATTR_PRIOMAP, TCA_TAPRIO_ATTR_SCHED_CLOCKID]);

    for (base_time, cycle_time, extension_time) in [(1, 0, 0), (0, -1, 0), (0, 0, i64::MAX)] {
        let config = ScheduleConfig { base_time, cycle_time, extension_time, ..zero.clone() };
        let bytes = encode(&config).unwrap();
        let times: Vec<_> = NlaIter::new(&bytes)
            .map(Result::unwrap)
            .filter(|nla| {
                matches!(
                    nla.kind,
                    TCA_TAPRIO_ATTR_SCHED_BASE_TIME
                        | TCA_TAPRIO_ATTR_SCHED_CYCLE_TIME
                        | TCA_TAPRIO_ATTR_SCHED_EXTENSION_TIME
                )
            })
            .collect();

        assert_eq!(times.len(), 1);
        assert_eq!(times[0].payload, &(base_time + cycle_time + extension_time).to_ne_bytes());
        assert_eq!(decode(&bytes).unwrap(), config);
    }
}

#[test]
fn entry_list_is_flagged_nested() {
    let config = ScheduleConfig {
        num_tc: 1,
        schedule: Schedule::EntryList(vec![ScheduleEntry::default()]),
        ..Default::default()
    };
    let bytes = encode(&config).unwrap();
    let list = NlaIter::new(&bytes).last().unwrap().unwrap();

    assert_eq!(list.kind, TCA_TAPRIO_ATTR_SCHED_ENTRY_LIST);
    assert!(list.nested);
    let entries: Vec<_> = list.nested().map(Result::unwrap).collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, TCA_TAPRIO_SCHED_ENTRY);
    assert!(!entries[0].nested);
}

#[test]
fn priority_map_is_mandatory() {
    let config = ConfigBuilder::new()
        .with_clock_id(ClockId::Tai)
        .with_cycle_time(1000)
        .with_sched_row(SchedRow::new("0", "S", "1", "1000"))
        .build()
        .unwrap();
    assert!(matches!(decode(&encode(&config).unwrap()), Err(Error::MissingPriorityMap)));
}

#[test]
fn decoding_does_not_mutate_input() {
    let config = ConfigBuilder::new().with_num_tc(1).build().unwrap();
    let bytes = encode(&config).unwrap();
    let copy = bytes.clone();
    decode(&bytes).unwrap();
    decode(&bytes).unwrap();
    assert_eq!(bytes, copy);
}

#[test]
fn truncated_buffer_is_malformed() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = ConfigBuilder::new()
        .with_num_tc(1)
        .with_sched_row(SchedRow::new("0", "S", "1", "1000"))
        .build()
        .unwrap();
    let bytes = encode(&config).unwrap();
    let err = decode(&bytes[..bytes.len() - 4]).unwrap_err();
    assert!(matches!(err, Error::MalformedAttribute { .. }));
}
