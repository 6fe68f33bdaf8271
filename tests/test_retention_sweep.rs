
use rolling_logger::{
    writers::sweep_outdated_log_files, DatePattern, ErrorChannel, Retention,
};
use std::time::{Duration, SystemTime};
use test_utils::{names, set_mtime};

const DAY: Duration = Duration::from_secs(24 * 3600);

fn populate(directory: &std::path::Path) {
    let now = SystemTime::now();
    for (name, age) in [
        ("svc.log", 30 * DAY),
        ("svc.log.2021-05-01", 30 * DAY),
        ("svc.log.2021-05-20", 8 * DAY),
        ("svc.log.2021-05-27", DAY),
        ("svc.log.old", 30 * DAY),
        ("svc.log.2021-05-01.gz", 30 * DAY),
        ("other.log.2021-05-01", 30 * DAY),
    ] {
        let path = directory.join(name);
        std::fs::write(&path, name).unwrap();
        set_mtime(&path, now - age);
    }
}

#[test]
fn test_sweep_deletes_outdated_family_members() {
    let directory = test_utils::dir();
    populate(directory.path());

    let deleted = sweep_outdated_log_files(
        directory.path(),
        "svc.log",
        &DatePattern::try_new(".%Y-%m-%d").unwrap(),
        Retention::KeepFor(7 * DAY),
        &ErrorChannel::DevNull,
    );
    assert_eq!(deleted, 2);
    assert_eq!(
        names(directory.path()),
        vec![
            "other.log.2021-05-01",
            "svc.log",
            "svc.log.2021-05-01.gz",
            "svc.log.2021-05-27",
            "svc.log.old"
        ]
    );
}

#[test]
fn test_sweep_without_retention_keeps_everything() {
    let directory = test_utils::dir();
    populate(directory.path());
    let date_pattern = DatePattern::try_new(".%Y-%m-%d").unwrap();

    for retention in [
        Retention::Forever,
        Retention::from_seconds(0),
        Retention::from_seconds(-5),
    ] {
        let deleted = sweep_outdated_log_files(
            directory.path(),
            "svc.log",
            &date_pattern,
            retention,
            &ErrorChannel::DevNull,
        );
        assert_eq!(deleted, 0);
    }
    assert_eq!(names(directory.path()).len(), 7);
}
