use crate::utils::logging;

#[test]
fn test_init_logging_is_repeatable() {
    // a subscriber installed elsewhere in the process must not make init panic
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    logging::init_logging();
    logging::init_logging();
    logging::log("TEST", "logging initialized twice");
}
