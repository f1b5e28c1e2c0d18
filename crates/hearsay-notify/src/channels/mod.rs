//! Channel senders: one HTTP client per delivery mechanism.

use std::future::Future;

use hearsay_core::Channel;
use hearsay_db::PendingMentionRow;

use crate::error::NotifyError;

mod email;
mod slack;
mod telegram;

pub use email::EmailSender;
pub use slack::SlackSender;
pub use telegram::TelegramSender;

/// One notification delivery mechanism.
///
/// `send` delivers a single rendered mention to the row's destination.
/// The dispatcher treats any error as a counted failure and still marks
/// the mention sent.
pub trait ChannelSender {
    fn channel(&self) -> Channel;

    fn send(
        &self,
        mention: &PendingMentionRow,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}
