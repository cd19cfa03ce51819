//! Raw backend payload shapes and their normalization into domain
//! snapshots.
//!
//! The backend interleaves plain id references and expanded objects in
//! the same fields (an expense `payer` may be either), and several fields
//! are optional. All of that is absorbed here, once, so the engine only
//! ever sees plain identities and concrete values.

use arcstr::ArcStr;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use splitledger_domain::{
    DEFAULT_EXPENSE_DESCRIPTION, Expense, GroupSnapshot, Member, MemberId, Money, SettlementRecord,
};

use crate::error::PayloadError;

#[derive(Debug, Clone, Deserialize)]
pub struct GroupPayload {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub members: Vec<MemberPayload>,
    #[serde(default)]
    pub expenses: Vec<ExpensePayload>,
    #[serde(default, rename = "settledPayments")]
    pub settled_payments: Vec<SettledPaymentPayload>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberPayload {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpensePayload {
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub payer: Option<PayerRef>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The backend sends the payer either as a bare id or expanded into the
/// full member object, depending on the endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PayerRef {
    Id(String),
    Expanded {
        #[serde(rename = "_id")]
        id: String,
    },
}

impl PayerRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Expanded { id } => id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettledPaymentPayload {
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default, rename = "fromUserId")]
    pub from_user_id: Option<String>,
    #[serde(default, rename = "toUserId")]
    pub to_user_id: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default, rename = "paidAt")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl GroupPayload {
    /// Normalizes the raw payload into the engine's snapshot shape.
    /// Missing amounts become zero, a missing description falls back to
    /// the generic label, and settlement payments without both member
    /// references are dropped.
    pub fn into_snapshot(self) -> GroupSnapshot {
        let members = self
            .members
            .into_iter()
            .map(|member| Member {
                id: MemberId::new(member.id),
                name: ArcStr::from(member.name),
            })
            .collect();

        let expenses = self
            .expenses
            .into_iter()
            .map(|expense| Expense {
                amount: Money::from_decimal(expense.amount.unwrap_or_default()),
                payer: expense.payer.map(|payer| MemberId::new(payer.id())),
                description: expense
                    .description
                    .filter(|description| !description.is_empty())
                    .map(ArcStr::from)
                    .unwrap_or(DEFAULT_EXPENSE_DESCRIPTION),
                created_at: expense.created_at,
            })
            .collect();

        let settlements = self
            .settled_payments
            .into_iter()
            .filter_map(|payment| {
                let (Some(from), Some(to)) = (payment.from_user_id, payment.to_user_id) else {
                    tracing::warn!("Settled payment without both member references, dropped");
                    return None;
                };
                Some(SettlementRecord {
                    amount: Money::from_decimal(payment.amount.unwrap_or_default()),
                    from: MemberId::new(from),
                    to: MemberId::new(to),
                    from_name: payment.from.map(ArcStr::from).unwrap_or_default(),
                    to_name: payment.to.map(ArcStr::from).unwrap_or_default(),
                    paid_at: payment.paid_at,
                })
            })
            .collect();

        GroupSnapshot {
            name: ArcStr::from(self.name),
            members,
            expenses,
            settlements,
            created_at: self.created_at,
        }
    }
}

/// Parses one group response body into a snapshot.
pub fn parse_group(payload: &str) -> Result<GroupSnapshot, PayloadError> {
    let group: GroupPayload = serde_json::from_str(payload)?;
    Ok(group.into_snapshot())
}

/// Parses a group-list response body into snapshots.
pub fn parse_groups(payload: &str) -> Result<Vec<GroupSnapshot>, PayloadError> {
    let groups: Vec<GroupPayload> = serde_json::from_str(payload)?;
    Ok(groups.into_iter().map(GroupPayload::into_snapshot).collect())
}
