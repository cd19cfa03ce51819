//! Greedy debtor/creditor matching.
//!
//! Classic debt-simplification heuristic: walk the debtor and creditor
//! lists with independent cursors and always transfer the smaller of the
//! two open amounts. At most `debtors + creditors - 1` transfers come
//! out. This is deliberately not a minimum-transaction solver; the
//! pairing order is stable for stable input, and downstream consumers
//! rely on exactly this pairing.

use rust_decimal::Decimal;

use crate::model::{BalanceLine, Money, Transfer, settlement_epsilon};

pub struct TransferSuggester;

impl TransferSuggester {
    pub fn suggest(&self, balances: &[BalanceLine]) -> Vec<Transfer> {
        let epsilon = settlement_epsilon();

        // Stable filters: partition order mirrors balance-line order.
        let mut debtors: Vec<(&BalanceLine, Decimal)> = balances
            .iter()
            .filter(|line| line.balance.as_decimal() < -epsilon)
            .map(|line| (line, -line.balance.as_decimal()))
            .collect();
        let mut creditors: Vec<(&BalanceLine, Decimal)> = balances
            .iter()
            .filter(|line| line.balance.as_decimal() > epsilon)
            .map(|line| (line, line.balance.as_decimal()))
            .collect();

        let mut transfers = Vec::new();
        let mut debtor_cursor = 0;
        let mut creditor_cursor = 0;

        while debtor_cursor < debtors.len() && creditor_cursor < creditors.len() {
            let pay = debtors[debtor_cursor].1.min(creditors[creditor_cursor].1);

            if pay > epsilon {
                transfers.push(Transfer {
                    from: debtors[debtor_cursor].0.name.clone(),
                    to: creditors[creditor_cursor].0.name.clone(),
                    amount: Money::from_decimal(pay).round_to_cents(),
                });
            }

            debtors[debtor_cursor].1 -= pay;
            creditors[creditor_cursor].1 -= pay;

            if debtors[debtor_cursor].1 <= epsilon {
                debtor_cursor += 1;
            }
            if creditors[creditor_cursor].1 <= epsilon {
                creditor_cursor += 1;
            }
        }

        // With zero-sum balances both lists drain together; anything left
        // over means the snapshot itself does not add up.
        let residual: Decimal = debtors[debtor_cursor..]
            .iter()
            .chain(&creditors[creditor_cursor..])
            .map(|(_, remaining)| *remaining)
            .sum();
        if residual > epsilon {
            tracing::warn!(
                residual = %residual,
                "Unmatched balance left after settlement matching"
            );
        }

        transfers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{Expense, Member, MemberId, SettlementRecord},
        services::BalanceCalculator,
    };
    use rstest::{fixture, rstest};

    #[fixture]
    fn suggester() -> TransferSuggester {
        TransferSuggester
    }

    fn line(id: &str, name: &str, balance: Money) -> BalanceLine {
        BalanceLine {
            member: MemberId::new(id),
            name: name.into(),
            paid: Money::ZERO,
            share: Money::ZERO,
            net: balance,
            balance,
        }
    }

    #[rstest]
    #[case::everyone_settled(
        vec![
            line("a", "Asha", Money::ZERO),
            line("b", "Bela", Money::ZERO),
        ],
        vec![]
    )]
    #[case::one_debtor_one_creditor(
        vec![
            line("a", "Asha", Money::new(100, 0)),
            line("b", "Bela", Money::new(-100, 0)),
        ],
        vec![("Bela", "Asha", Money::new(100, 0))]
    )]
    #[case::one_creditor_absorbs_two_debtors(
        vec![
            line("a", "Asha", Money::new(200, 0)),
            line("b", "Bela", Money::new(-100, 0)),
            line("c", "Chandra", Money::new(-100, 0)),
        ],
        vec![
            ("Bela", "Asha", Money::new(100, 0)),
            ("Chandra", "Asha", Money::new(100, 0)),
        ]
    )]
    #[case::one_debtor_covers_two_creditors(
        vec![
            line("a", "Asha", Money::new(100, 0)),
            line("b", "Bela", Money::new(50, 0)),
            line("c", "Chandra", Money::new(-150, 0)),
        ],
        vec![
            ("Chandra", "Asha", Money::new(100, 0)),
            ("Chandra", "Bela", Money::new(50, 0)),
        ]
    )]
    #[case::cent_residue_is_not_transferred(
        vec![
            line("a", "Asha", Money::new(6667, 2)),
            line("b", "Bela", Money::new(-3333, 2)),
            line("c", "Chandra", Money::new(-3333, 2)),
        ],
        vec![
            ("Bela", "Asha", Money::new(3333, 2)),
            ("Chandra", "Asha", Money::new(3333, 2)),
        ]
    )]
    #[case::within_epsilon_counts_as_settled(
        vec![
            line("a", "Asha", Money::new(1, 2)),
            line("b", "Bela", Money::new(-1, 2)),
        ],
        vec![]
    )]
    fn suggestion_cases(
        suggester: TransferSuggester,
        #[case] balances: Vec<BalanceLine>,
        #[case] expected: Vec<(&str, &str, Money)>,
    ) {
        let transfers = suggester.suggest(&balances);

        let expected: Vec<Transfer> = expected
            .into_iter()
            .map(|(from, to, amount)| Transfer {
                from: from.into(),
                to: to.into(),
                amount,
            })
            .collect();
        assert_eq!(transfers, expected);
    }

    #[rstest]
    fn suggestion_is_deterministic_for_identical_input(suggester: TransferSuggester) {
        let balances = vec![
            line("a", "Asha", Money::new(120, 0)),
            line("b", "Bela", Money::new(-70, 0)),
            line("c", "Chandra", Money::new(30, 0)),
            line("d", "Dev", Money::new(-80, 0)),
        ];

        let first = suggester.suggest(&balances);
        let second = suggester.suggest(&balances);
        assert_eq!(first, second);
    }

    #[rstest]
    fn pairing_follows_input_order(suggester: TransferSuggester) {
        let balances = vec![
            line("d", "Dev", Money::new(-80, 0)),
            line("a", "Asha", Money::new(120, 0)),
            line("b", "Bela", Money::new(-70, 0)),
            line("c", "Chandra", Money::new(30, 0)),
        ];

        let transfers = suggester.suggest(&balances);
        assert_eq!(
            transfers,
            vec![
                Transfer {
                    from: "Dev".into(),
                    to: "Asha".into(),
                    amount: Money::new(80, 0),
                },
                Transfer {
                    from: "Bela".into(),
                    to: "Asha".into(),
                    amount: Money::new(40, 0),
                },
                Transfer {
                    from: "Bela".into(),
                    to: "Chandra".into(),
                    amount: Money::new(30, 0),
                },
            ]
        );
    }

    #[rstest]
    fn suggested_transfers_settle_the_group(suggester: TransferSuggester) {
        let members = vec![
            Member::new("a", "Asha"),
            Member::new("b", "Bela"),
            Member::new("c", "Chandra"),
        ];
        let expenses = vec![
            Expense::new(Money::new(300, 0), MemberId::new("a")),
            Expense::new(Money::new(90, 0), MemberId::new("b")),
        ];
        let calculator = BalanceCalculator;
        let balances = calculator.calculate(&members, &expenses, &[]);

        let transfers = suggester.suggest(&balances);

        let settlements: Vec<SettlementRecord> = transfers
            .iter()
            .map(|transfer| {
                let resolve = |name: &str| {
                    members
                        .iter()
                        .find(|member| member.name == name)
                        .map(|member| member.id.clone())
                        .expect("transfer names resolve to members")
                };
                SettlementRecord::new(transfer.amount, resolve(&transfer.from), resolve(&transfer.to))
            })
            .collect();

        let settled = calculator.calculate(&members, &expenses, &settlements);
        for line in &settled {
            assert!(
                line.is_settled(),
                "{} still carries {}",
                line.name,
                line.balance
            );
        }
    }
}
