//! Common utilities and traits shared across switchboard modules.

/// Trait providing consistent messaging functionality across all switchboard
/// components.
///
/// This trait standardizes the output format for information, warning, and
/// error messages, ensuring a consistent user experience across the
/// application.
pub trait SwitchboardMessaging {
    /// Displays an informational message with the standard prefix.
    fn msg(&self, message: &str) {
        println!("====> {message}");
    }

    /// Displays a warning message with the standard warning prefix.
    fn warning(&self, message: &str) {
        eprintln!("====> WARNING: {message}");
    }

    /// Displays an error message with the standard error prefix.
    fn error(&self, message: &str) {
        eprintln!("====> ERROR: {message}");
    }
}

/// Simple messaging utility for use in main and other contexts where a full
/// struct with SwitchboardMessaging is not available.
pub struct SwitchboardMessager;

impl SwitchboardMessaging for SwitchboardMessager {}

impl SwitchboardMessager {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SwitchboardMessager {
    fn default() -> Self {
        Self::new()
    }
}
