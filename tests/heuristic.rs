use std::collections::HashSet;

use netmodel_graphs::heuristic::{
    attribute_pair_stats, Attr, Distribution, StatBoard, StatMessage, StatWorker,
    UniqueValueCounts,
};
use netmodel_graphs::{Error, SettingsStats};

fn id_and_fk() -> (UniqueValueCounts, UniqueValueCounts) {
    let source = UniqueValueCounts::from_json(
        r#"{"indexBin":{},"bins":{"id":{"1":1,"2":1,"3":1}},"unhashable":{}}"#,
    )
    .unwrap();
    let target =
        UniqueValueCounts::from_json(r#"{"indexBin":{},"bins":{"fk":{"1":2,"2":1}}}"#).unwrap();
    (source, target)
}

#[test]
fn foreign_key_scenario() {
    let (source, target) = id_and_fk();
    let stats = attribute_pair_stats(&source, &target, &SettingsStats::default());
    let stat = stats.iter().find(|s| s.id == "id=fk").unwrap();

    assert_eq!(stat.source_attr, Attr::named("id"));
    assert_eq!(stat.target_attr, Attr::named("fk"));
    assert_eq!(stat.matches, 3);
    assert_eq!(stat.source_distribution, Distribution::from([(0, 1), (1, 1), (2, 1)]));
    assert_eq!(stat.source_one_to_one_ness, 0.5);
    assert_eq!(stat.target_distribution, Distribution::from([(0, 0), (1, 3)]));
    assert_eq!(stat.target_one_to_one_ness, 3.0);
}

#[test]
fn consistent_rename_keeps_scores() {
    let (source, target) = id_and_fk();
    let renamed_source = UniqueValueCounts::default()
        .with_value("id", "one", 1)
        .with_value("id", "two", 1)
        .with_value("id", "three", 1);
    let renamed_target = UniqueValueCounts::default()
        .with_value("fk", "one", 2)
        .with_value("fk", "two", 1);

    let settings = SettingsStats::default();
    let before = attribute_pair_stats(&source, &target, &settings);
    let after = attribute_pair_stats(&renamed_source, &renamed_target, &settings);

    for (b, a) in before.iter().zip(&after) {
        assert_eq!(b.id, a.id);
        assert_eq!(b.matches, a.matches);
        assert_eq!(b.source_one_to_one_ness, a.source_one_to_one_ness);
        assert_eq!(b.target_one_to_one_ness, a.target_one_to_one_ness);
    }
}

#[test]
fn worker_streams_full_cross_product_then_done_once() {
    let source = UniqueValueCounts::default()
        .with_index("0", 1)
        .with_value("s1", "x", 1)
        .with_value("s2", "y", 1);
    let target = UniqueValueCounts::default()
        .with_index("0", 1)
        .with_value("t1", "x", 1);

    let _ = env_logger::builder().is_test(true).try_init();
    let worker = StatWorker::spawn(source, target, SettingsStats::default());
    let mut ids = HashSet::new();
    let mut stats = 0;
    let mut done = 0;
    // the worker drops its sender after finishing
    while let Ok(message) = worker.recv() {
        match message {
            StatMessage::Stat(stat) => {
                assert_eq!(done, 0, "stat after done");
                stats += 1;
                ids.insert(stat.id);
            }
            StatMessage::Done => done += 1,
        }
    }

    assert_eq!(stats, 6);
    assert_eq!(ids.len(), 6);
    assert_eq!(done, 1);
    assert!(worker.join());
}

#[test]
fn board_consumes_worker_stream() {
    let (source, target) = id_and_fk();
    let worker = StatWorker::spawn(source, target, SettingsStats::default());

    let mut board = StatBoard::new();
    board.drain_blocking(worker.receiver().unwrap()).unwrap();

    assert!(board.is_finished());
    assert_eq!(board.len(), 4);
    assert_eq!(board.best().unwrap().id, "id=fk");
    assert_eq!(board.current_stat_id().as_deref(), Some("id=fk"));
    assert_eq!(board.current_stat().unwrap().matches, 3);

    let (lo, hi) = board.score_domain();
    assert!(lo <= -3.0);
    assert_eq!(hi, 3.5);
}

#[test]
fn attribute_named_like_index_streams_without_duplicates() {
    let source = UniqueValueCounts::default()
        .with_index("0", 1)
        .with_value("__index__", "0", 1);
    let target = UniqueValueCounts::default().with_index("0", 1);
    let worker = StatWorker::spawn(source, target, SettingsStats::default());

    let mut board = StatBoard::new();
    board.drain_blocking(worker.receiver().unwrap()).unwrap();

    assert!(board.is_finished());
    assert_eq!(board.len(), 2);
    assert_eq!(board.get("*=*").unwrap().source_attr, Attr::Index);
    assert_eq!(
        board.get("__index__=*").unwrap().source_attr,
        Attr::named("__index__")
    );
    assert!(worker.join());
}

#[test]
fn terminated_worker_is_abandoned_not_failed() {
    let counts = (0..200).fold(UniqueValueCounts::default(), |c, i| {
        c.with_index(i.to_string(), 1).with_value("v", i.to_string(), 1)
    });
    let mut worker = StatWorker::spawn(counts.clone(), counts, SettingsStats::default());
    worker.terminate();
    assert!(worker.receiver().is_none());
    assert!(worker.join());
}

#[test]
fn duplicate_stat_is_a_contract_violation() {
    let (source, target) = id_and_fk();
    let stat = attribute_pair_stats(&source, &target, &SettingsStats::default()).remove(0);

    let mut board = StatBoard::new();
    board.handle(StatMessage::Stat(Box::new(stat.clone()))).unwrap();
    let err = board.handle(StatMessage::Stat(Box::new(stat))).unwrap_err();
    assert!(matches!(err, Error::DuplicateStat(id) if id == "*=*"));
}
