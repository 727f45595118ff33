//! User-facing strings. The questionnaire ships in a single locale.

/// Rendering of a "yes" flag in the submitted report.
pub const YES: &str = "Yes";

/// Rendering of a "no" (or unanswered) flag in the submitted report.
pub const NO: &str = "No";

/// Subject line used when none is configured.
pub const DEFAULT_SUBJECT: &str = "New intake questionnaire";

/// Placed between validation problems in the surfaced error.
pub const ERROR_SEPARATOR: &str = " • ";

/// Shown for any transport-reported failure.
pub const SEND_FAILED: &str = "Sending failed. Please try again.";

/// Shown when delivery did not finish in time.
pub const SEND_TIMED_OUT: &str =
    "The server took too long to answer. Your answers are kept, please try again.";

/// Configuration error when no transport is configured at all.
pub const NO_DESTINATION: &str = "No destination address is configured";

/// Text direction of the rendered report table.
pub const TABLE_DIRECTION: &str = "ltr";
