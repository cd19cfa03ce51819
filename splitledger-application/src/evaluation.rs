use splitledger_domain::{
    BalanceCalculator, BalanceLine, GroupSnapshot, Money, Transfer, TransferSuggester,
};

/// Everything a group view needs after fetching a fresh snapshot:
/// headline totals plus the per-member balance table and suggested
/// transfers. Recomputed in full on every snapshot change; the inputs are
/// never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupEvaluation {
    pub total_spent: Money,
    pub equal_share: Money,
    pub balances: Vec<BalanceLine>,
    pub suggestions: Vec<Transfer>,
}

impl GroupEvaluation {
    pub fn of(snapshot: &GroupSnapshot) -> Self {
        let balances =
            BalanceCalculator.calculate(&snapshot.members, &snapshot.expenses, &snapshot.settlements);
        let suggestions = TransferSuggester.suggest(&balances);

        Self {
            total_spent: snapshot.total_spent(),
            equal_share: snapshot.equal_share(),
            balances,
            suggestions,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.suggestions.is_empty()
    }
}
