//! Result message catalog.
//!
//! Dispatch hands back [`MessageCode`]s; this module turns them into the text
//! shown after a redirect, and builds the notice for bulk status changes.

use almoner_dispatch::MessageCode;
use num_format::{Locale, ToFormattedString};

/// Shown after a successful email resend.
pub const EMAIL_SENT: MessageCode = MessageCode(11);
/// Shown after a failed email resend.
pub const EMAIL_FAILED: MessageCode = MessageCode(12);

/// Text for a donation screen message code, `None` for unknown codes.
pub fn donation_message(code: MessageCode) -> Option<&'static str> {
    let text = match code.get() {
        1 | 4 => "Donation updated.",
        2 => "Custom field updated.",
        3 => "Custom field deleted.",
        6 => "Donation published.",
        7 => "Donation saved.",
        8 => "Donation submitted.",
        10 => "Donation draft updated.",
        11 => "Donation updated and email sent.",
        12 => "Email could not be sent.",
        _ => return None,
    };
    Some(text)
}

/// Notice shown after a bulk status change over `count` donations.
pub fn bulk_status_notice(count: usize) -> String {
    if count == 1 {
        "Donation status changed.".to_string()
    } else {
        format!(
            "{} donation statuses changed.",
            count.to_formatted_string(&Locale::en)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(donation_message(EMAIL_SENT), Some("Donation updated and email sent."));
        assert_eq!(donation_message(EMAIL_FAILED), Some("Email could not be sent."));
        assert_eq!(donation_message(MessageCode(4)), Some("Donation updated."));
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(donation_message(MessageCode(0)), None);
        assert_eq!(donation_message(MessageCode(5)), None);
        assert_eq!(donation_message(MessageCode(9)), None);
    }

    #[test]
    fn test_bulk_status_notice() {
        assert_eq!(bulk_status_notice(1), "Donation status changed.");
        assert_eq!(bulk_status_notice(0), "0 donation statuses changed.");
        assert_eq!(bulk_status_notice(3), "3 donation statuses changed.");
        assert_eq!(bulk_status_notice(1234567), "1,234,567 donation statuses changed.");
    }

    #[test]
    fn test_bulk_status_notice_separators() {
        assert_eq!(bulk_status_notice(999), "999 donation statuses changed.");
        assert_eq!(bulk_status_notice(1000), "1,000 donation statuses changed.");
        assert_eq!(bulk_status_notice(100000), "100,000 donation statuses changed.");
        assert_eq!(bulk_status_notice(2500), "2,500 donation statuses changed.");
    }
}
