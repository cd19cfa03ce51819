use fxhash::FxHashMap;
use rust_decimal::Decimal;

use crate::model::{BalanceLine, Expense, Member, Money, SettlementRecord};

/// Balance computation service.
///
/// Derives one [`BalanceLine`] per member from an immutable group
/// snapshot: amount paid, equal share, net from expenses, and the final
/// balance after historical settlement records. Sums accumulate at full
/// precision; `paid`, `share`, `net`, and `balance` are each rounded to
/// two decimals at publication.
///
/// The computation never fails. An empty member list yields an empty
/// result, missing amounts count as zero, and a settlement record side
/// that references an unknown member is skipped.
pub struct BalanceCalculator;

impl BalanceCalculator {
    pub fn calculate(
        &self,
        members: &[Member],
        expenses: &[Expense],
        settlements: &[SettlementRecord],
    ) -> Vec<BalanceLine> {
        if members.is_empty() {
            return Vec::new();
        }

        let mut paid: FxHashMap<&str, Decimal> = members
            .iter()
            .map(|member| (member.id.as_str(), Decimal::ZERO))
            .collect();
        let mut total = Decimal::ZERO;
        for expense in expenses {
            let amount = expense.amount.as_decimal();
            total += amount;
            // An expense whose payer is unknown still raises the group
            // total; it just credits nobody.
            let Some(payer) = &expense.payer else {
                continue;
            };
            if let Some(paid_by_member) = paid.get_mut(payer.as_str()) {
                *paid_by_member += amount;
            }
        }

        let share = total / Decimal::from(members.len() as u64);

        let mut lines: Vec<BalanceLine> = members
            .iter()
            .map(|member| {
                let paid_amount = paid
                    .get(member.id.as_str())
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                let net = Money::from_decimal(paid_amount - share).round_to_cents();
                BalanceLine {
                    member: member.id.clone(),
                    name: member.name.clone(),
                    paid: Money::from_decimal(paid_amount).round_to_cents(),
                    share: Money::from_decimal(share).round_to_cents(),
                    net,
                    balance: net,
                }
            })
            .collect();

        let index: FxHashMap<&str, usize> = members
            .iter()
            .enumerate()
            .map(|(position, member)| (member.id.as_str(), position))
            .collect();

        for record in settlements {
            if record.amount.is_zero() {
                continue;
            }
            // Paying a settlement shrinks the payer's debt; being paid
            // shrinks the receiver's credit. Each side is applied
            // independently.
            match index.get(record.from.as_str()) {
                Some(&position) => lines[position].balance += record.amount,
                None => tracing::warn!(
                    member_id = %record.from,
                    "Settlement payer is not a group member, adjustment skipped"
                ),
            }
            match index.get(record.to.as_str()) {
                Some(&position) => lines[position].balance -= record.amount,
                None => tracing::warn!(
                    member_id = %record.to,
                    "Settlement receiver is not a group member, adjustment skipped"
                ),
            }
        }

        for line in &mut lines {
            line.balance = line.balance.round_to_cents();
        }

        lines
    }
}
