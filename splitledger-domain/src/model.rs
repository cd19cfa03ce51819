use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use arcstr::ArcStr;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Opaque backend identifier for a group member.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId(ArcStr);

impl MemberId {
    pub fn new(id: impl Into<ArcStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A decimal currency amount.
///
/// Intermediate arithmetic keeps full `Decimal` precision; every published
/// figure goes through [`Money::round_to_cents`], which rounds half away
/// from zero to two decimal places.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: i64, scale: u32) -> Self {
        Self(Decimal::new(amount, scale))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn round_to_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Balances whose magnitude stays at or below this threshold count as
/// settled. Matches the two-decimal publication precision.
pub fn settlement_epsilon() -> Decimal {
    Decimal::new(1, 2)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub name: ArcStr,
}

impl Member {
    pub fn new(id: impl Into<ArcStr>, name: impl Into<ArcStr>) -> Self {
        Self {
            id: MemberId::new(id),
            name: name.into(),
        }
    }
}

pub const DEFAULT_EXPENSE_DESCRIPTION: ArcStr = arcstr::literal!("Expense");

/// A single group expense. `payer` is `None` when the backend record did
/// not carry a resolvable payer reference; the amount still counts toward
/// the group total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub amount: Money,
    pub payer: Option<MemberId>,
    pub description: ArcStr,
    pub created_at: Option<DateTime<Utc>>,
}

impl Expense {
    pub fn new(amount: Money, payer: MemberId) -> Self {
        Self {
            amount,
            payer: Some(payer),
            description: DEFAULT_EXPENSE_DESCRIPTION,
            created_at: None,
        }
    }
}

/// A transfer between two members that already happened outside the
/// engine. Recorded history, not a suggestion: `from` handed `amount`
/// over to `to`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementRecord {
    pub amount: Money,
    pub from: MemberId,
    pub to: MemberId,
    pub from_name: ArcStr,
    pub to_name: ArcStr,
    pub paid_at: Option<DateTime<Utc>>,
}

impl SettlementRecord {
    pub fn new(amount: Money, from: MemberId, to: MemberId) -> Self {
        Self {
            amount,
            from,
            to,
            from_name: ArcStr::default(),
            to_name: ArcStr::default(),
            paid_at: None,
        }
    }
}

/// Read-only snapshot of one group as fetched from the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupSnapshot {
    pub name: ArcStr,
    pub members: Vec<Member>,
    pub expenses: Vec<Expense>,
    pub settlements: Vec<SettlementRecord>,
    pub created_at: Option<DateTime<Utc>>,
}

impl GroupSnapshot {
    pub fn new(name: impl Into<ArcStr>, members: Vec<Member>) -> Self {
        Self {
            name: name.into(),
            members,
            ..Self::default()
        }
    }

    /// Sum of all expense amounts, published at two decimals.
    pub fn total_spent(&self) -> Money {
        self.expenses
            .iter()
            .map(|expense| expense.amount)
            .sum::<Money>()
            .round_to_cents()
    }

    /// Per-head equal share of the group total, or zero for an empty group.
    pub fn equal_share(&self) -> Money {
        if self.members.is_empty() {
            return Money::ZERO;
        }
        let total: Money = self.expenses.iter().map(|expense| expense.amount).sum();
        Money::from_decimal(total.as_decimal() / Decimal::from(self.members.len() as u64))
            .round_to_cents()
    }

    pub fn contains_member(&self, member: &MemberId) -> bool {
        self.members.iter().any(|candidate| &candidate.id == member)
    }
}

/// Per-member balance figures derived from one group snapshot.
///
/// `net` is paid minus equal share; `balance` additionally folds in the
/// historical settlement records. Positive `balance` means the member is
/// owed money, negative means the member owes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceLine {
    pub member: MemberId,
    pub name: ArcStr,
    pub paid: Money,
    pub share: Money,
    pub net: Money,
    pub balance: Money,
}

impl BalanceLine {
    pub fn gets(&self) -> Money {
        if self.balance > Money::ZERO {
            self.balance
        } else {
            Money::ZERO
        }
    }

    pub fn owes(&self) -> Money {
        if self.balance < Money::ZERO {
            self.balance.abs()
        } else {
            Money::ZERO
        }
    }

    pub fn is_settled(&self) -> bool {
        self.balance.abs().as_decimal() <= settlement_epsilon()
    }
}

/// A suggested (not yet executed) payment from one member to another,
/// addressed by display name the way the hosting UI records settlements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: ArcStr,
    pub to: ArcStr,
    pub amount: Money,
}

/// One user's position across every group they belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortfolioSummary {
    pub gets: Money,
    pub owes: Money,
    pub net: Money,
    pub pending_count: usize,
    pub pending_amount: Money,
}

/// Total expense volume of one calendar month.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthlySpend {
    pub year: i32,
    pub month: u32,
    pub total: Money,
}
