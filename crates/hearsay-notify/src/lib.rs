//! Notification dispatch for Hearsay.
//!
//! Each channel (email, Slack, Telegram) runs the same loop: fetch
//! pending mentions for brands with the channel enabled, send in small
//! batches with an inter-batch delay, and mark every processed mention
//! as sent whether or not the send succeeded. That poison-pill policy
//! keeps a permanently bad destination from blocking the queue forever;
//! delivery is at-most-once per mention per channel.

pub mod channels;
pub mod dispatcher;
pub mod error;
pub mod render;
pub mod types;

pub use channels::{ChannelSender, EmailSender, SlackSender, TelegramSender};
pub use dispatcher::{
    run_dispatch, run_email_dispatch, run_slack_dispatch, run_telegram_dispatch,
};
pub use error::NotifyError;
pub use types::DispatchSummary;
