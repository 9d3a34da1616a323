//! Constants used throughout the crate
//!
//! This module centralizes envelope wording, formats, and configuration
//! defaults so the calling layer always sees the same strings.

// Envelope status markers
pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

// Connection Messages
pub const ERROR_DATABASE_CONNECTION_FAILED: &str = "Database connection failed";

// Validation Error Messages
pub const ERROR_INVALID_PRIORITY: &str = "Invalid priority. Please choose from 'low', 'medium', or 'high'.";
pub const ERROR_INVALID_STATUS: &str = "Invalid status. Please choose from 'pending', 'in_progress', or 'completed'.";
pub const ERROR_INVALID_FILTER: &str = "Invalid filter value. Please check status and priority values.";
pub const ERROR_TITLE_REQUIRED: &str = "Title is required";
pub const ERROR_DESCRIPTION_REQUIRED: &str = "Description is required";
pub const ERROR_TODO_DESCRIPTION_REQUIRED: &str = "Description is required to add a todo item.";
pub const ERROR_INVALID_REMIND_TIME: &str = "Invalid remind time. Please use 'YYYY-MM-DD HH:MM' format.";
pub const ERROR_INVALID_DUE_DATE: &str = "Invalid due date. Please use 'YYYY-MM-DD' format.";

/// Longest title the schema stores
pub const TITLE_MAX_LEN: usize = 255;

// Formats
/// Rendering format for timestamps in envelopes
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Rendering format for dates in envelopes
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// Title generation
/// Number of description words kept when a todo title is generated
pub const GENERATED_TITLE_WORDS: usize = 5;
/// Marker appended to a generated title when words were dropped
pub const GENERATED_TITLE_ELLIPSIS: &str = "...";

// Database defaults
pub const DEFAULT_MYSQL_PORT: u16 = 3306;
pub const DEFAULT_CHARSET: &str = "utf8mb4";
pub const DEFAULT_POOL_SIZE: u32 = 10;
pub const DEFAULT_MAX_OVERFLOW: u32 = 20;
pub const DEFAULT_POOL_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_POOL_RECYCLE_SECS: u64 = 3600;
/// Database name that selects a private in-memory SQLite database
pub const SQLITE_MEMORY: &str = ":memory:";

// Config discovery
pub const CONFIG_FILE_NAME: &str = "heptapal.toml";
pub const CONFIG_DIR_NAME: &str = "heptapal";
pub const CONFIG_GENERATED: &str = "Generated default configuration file";
