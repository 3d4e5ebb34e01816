//! Mail transport implementations.
//!
//! Each transport implements the [`Mailer`](crate::Mailer) trait.
//!
//! | Transport | Feature Flag | Description |
//! |-----------|-------------|-------------|
//! | [`SmtpMailer`] | `smtp` | SMTP via lettre |
//! | [`ResendMailer`] | `resend` | Resend API |
//! | [`LocalMailer`] | `local` | In-memory capture for dev/testing |
//! | [`LoggerMailer`] | (none) | Logs emails without sending |

#[cfg(feature = "smtp")]
mod smtp;
#[cfg(feature = "smtp")]
pub use smtp::{SmtpBuilder, SmtpMailer, TlsMode};

#[cfg(feature = "resend")]
mod resend;
#[cfg(feature = "resend")]
pub use resend::ResendMailer;

#[cfg(feature = "local")]
mod local;
#[cfg(feature = "local")]
pub use local::LocalMailer;

mod logger;
pub use logger::LoggerMailer;
