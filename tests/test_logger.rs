
use log::{debug, error, info, trace};
use rolling_logger::{writers::RollingFileWriter, LevelFilter, Logger, RollingError, Rotation};

#[test]
fn test_logger_with_two_writers() {
    let directory = test_utils::dir();
    let verbose = RollingFileWriter::builder()
        .rotate(Rotation::Date {
            pattern: directory.path().join("verbose_%d_%u.log").display().to_string(),
        })
        .max_level(LevelFilter::Trace)
        .try_build()
        .unwrap();
    let errors = RollingFileWriter::builder()
        .rotate(Rotation::Schedule {
            file: directory.path().join("errors.log"),
            date_pattern: ".%Y-%m-%d".to_string(),
            retention: rolling_logger::Retention::Forever,
        })
        .max_level(LevelFilter::Error)
        .use_buffering(true)
        .try_build()
        .unwrap();

    let handle = Logger::with_level(LevelFilter::Debug)
        .add_writer(Box::new(verbose))
        .add_writer(Box::new(errors))
        .start()
        .unwrap_or_else(|e| panic!("Logger initialization failed with {e}"));
    assert_eq!(handle.writer_count(), 2);
    assert_eq!(log::max_level(), LevelFilter::Debug);

    error!("This is an error message");
    info!("This is an info message");
    debug!("This is a debug message");
    trace!("This is a trace message - you must not see it!");
    handle.flush();

    // a second logger cannot be installed
    assert!(matches!(
        Logger::with_level(LevelFilter::Info).start(),
        Err(RollingError::Log(_))
    ));

    handle.shutdown();
    let verbose_files = test_utils::files(directory.path(), "verbose_*_0.log");
    assert_eq!(verbose_files.len(), 1);
    let verbose_content = std::fs::read_to_string(&verbose_files[0]).unwrap();
    assert_eq!(verbose_content.lines().count(), 3);
    assert!(!verbose_content.contains("trace message"));

    let error_content = std::fs::read_to_string(directory.path().join("errors.log")).unwrap();
    assert_eq!(error_content.lines().count(), 1);
    assert!(error_content.starts_with("ERROR ["), "{error_content}");
}
