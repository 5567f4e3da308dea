//! Well-known message names shared across services.

pub const APP_START: &str = "app_start";
pub const APP_STOP: &str = "app_stop";
pub const START_CONSUMER: &str = "start_consumer";
pub const CONSUME_QUEUE_FAILURE: &str = "consume_queue_failure";
pub const START_PRODUCER: &str = "start_producer";
pub const INIT_BUCKET: &str = "init_bucket";
pub const INIT_CONFIG: &str = "init_config";
pub const FETCH_CONFIG_FAILURE: &str = "fetch_config_failure";
pub const HANDLE_MESSAGE: &str = "handle_message";
pub const PARSE_MESSAGE: &str = "parse_message";
pub const VALIDATE_MESSAGE: &str = "validate_message";
pub const PROCESS_MESSAGE: &str = "process_message";
pub const SEND_MESSAGE: &str = "send_message";

/// Suffix of the line emitted when an action succeeds.
pub const SUCCESS_SUFFIX: &str = "_success";
pub const SKIP_SUFFIX: &str = "_skip";
pub const FAILURE_SUFFIX: &str = "_failure";
