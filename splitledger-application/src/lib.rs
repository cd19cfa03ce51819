#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod evaluation;
pub mod payload;

pub use error::PayloadError;
pub use evaluation::GroupEvaluation;
pub use payload::{
    ExpensePayload, GroupPayload, MemberPayload, PayerRef, SettledPaymentPayload, parse_group,
    parse_groups,
};
