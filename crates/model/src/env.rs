/// Environment variable selecting the execution mode, `SEQUENTIAL` or `PARALLEL`
pub const EXECUTION_MODE: &str = "GSI_EXECUTION_MODE";
/// Environment variable overriding the poll interval in seconds
pub const POLL_INTERVAL_SECONDS: &str = "GSI_POLL_INTERVAL_SECONDS";
