use chrono::{DateTime, Datelike, Utc};
use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::{
    model::{GroupSnapshot, MemberId, MonthlySpend, Money, PortfolioSummary, settlement_epsilon},
    services::BalanceCalculator,
};

/// Cross-group rollup for a single user.
///
/// Runs the per-group balance computation in every group the user belongs
/// to and sums that user's final balances. Groups are independent
/// snapshots; nothing crosses between them.
pub struct PortfolioSummarizer;

impl PortfolioSummarizer {
    pub fn summarize(&self, groups: &[GroupSnapshot], member: &MemberId) -> PortfolioSummary {
        let calculator = BalanceCalculator;
        let epsilon = settlement_epsilon();

        let mut net = Decimal::ZERO;
        let mut pending_count = 0;
        let mut pending_amount = Decimal::ZERO;

        for group in groups {
            if !group.contains_member(member) {
                continue;
            }
            let lines = calculator.calculate(&group.members, &group.expenses, &group.settlements);
            let Some(line) = lines.iter().find(|line| &line.member == member) else {
                continue;
            };
            let balance = line.balance.as_decimal();
            net += balance;
            if balance < -epsilon {
                pending_count += 1;
                pending_amount += -balance;
            }
        }

        PortfolioSummary {
            gets: Money::from_decimal(net.max(Decimal::ZERO)).round_to_cents(),
            owes: Money::from_decimal((-net).max(Decimal::ZERO)).round_to_cents(),
            net: Money::from_decimal(net).round_to_cents(),
            pending_count,
            pending_amount: Money::from_decimal(pending_amount).round_to_cents(),
        }
    }

    /// Expense volume bucketed by calendar month, oldest first, for the
    /// `months` months ending at `reference`. The caller supplies the
    /// reference instant; this service never reads a clock. Expenses
    /// without a timestamp fall into no bucket.
    pub fn monthly_spend(
        &self,
        groups: &[GroupSnapshot],
        months: u32,
        reference: DateTime<Utc>,
    ) -> Vec<MonthlySpend> {
        let mut buckets: IndexMap<(i32, u32), Decimal, FxBuildHasher> = IndexMap::default();
        let newest = reference.year() * 12 + reference.month0() as i32;
        for offset in (0..months as i32).rev() {
            let slot = newest - offset;
            let year = slot.div_euclid(12);
            let month = slot.rem_euclid(12) as u32 + 1;
            buckets.insert((year, month), Decimal::ZERO);
        }

        for group in groups {
            for expense in &group.expenses {
                let Some(created_at) = expense.created_at else {
                    continue;
                };
                if let Some(total) = buckets.get_mut(&(created_at.year(), created_at.month())) {
                    *total += expense.amount.as_decimal();
                }
            }
        }

        buckets
            .into_iter()
            .map(|((year, month), total)| MonthlySpend {
                year,
                month,
                total: Money::from_decimal(total).round_to_cents(),
            })
            .collect()
    }
}
