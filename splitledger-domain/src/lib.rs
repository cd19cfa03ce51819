#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    BalanceLine, DEFAULT_EXPENSE_DESCRIPTION, Expense, GroupSnapshot, Member, MemberId,
    MonthlySpend, Money, PortfolioSummary, SettlementRecord, Transfer, settlement_epsilon,
};
pub use services::{BalanceCalculator, PortfolioSummarizer, TransferSuggester};
