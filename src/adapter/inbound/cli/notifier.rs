//! Terminal notifier.

use crate::adapter::inbound::cli::output;
use crate::port::outbound::notifier::{Notice, NoticeLevel, Notifier};

/// Prints notices through the output helpers.
///
/// Error notices are skipped: the failing command returns the same error
/// and the entry point prints it once.
pub struct CliNotifier;

impl Notifier for CliNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => output::success(&notice.message),
            NoticeLevel::Warning => output::warning(&notice.message),
            NoticeLevel::Info => output::note(&notice.message),
            NoticeLevel::Error => {}
        }
    }
}
