use super::money::MoneyAmount;
use super::record::{AccountingScheme, ParseError};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the nine numbered fields on the VAT return form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BoxKey {
    Box1,
    Box2,
    Box3,
    Box4,
    Box5,
    Box6,
    Box7,
    Box8,
    Box9,
}

impl BoxKey {
    pub const ALL: [BoxKey; 9] = [
        BoxKey::Box1,
        BoxKey::Box2,
        BoxKey::Box3,
        BoxKey::Box4,
        BoxKey::Box5,
        BoxKey::Box6,
        BoxKey::Box7,
        BoxKey::Box8,
        BoxKey::Box9,
    ];

    pub fn number(self) -> u8 {
        match self {
            BoxKey::Box1 => 1,
            BoxKey::Box2 => 2,
            BoxKey::Box3 => 3,
            BoxKey::Box4 => 4,
            BoxKey::Box5 => 5,
            BoxKey::Box6 => 6,
            BoxKey::Box7 => 7,
            BoxKey::Box8 => 8,
            BoxKey::Box9 => 9,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BoxKey::Box1 => "box1",
            BoxKey::Box2 => "box2",
            BoxKey::Box3 => "box3",
            BoxKey::Box4 => "box4",
            BoxKey::Box5 => "box5",
            BoxKey::Box6 => "box6",
            BoxKey::Box7 => "box7",
            BoxKey::Box8 => "box8",
            BoxKey::Box9 => "box9",
        }
    }

    /// Box 5 is the only box allowed to go negative (refund due)
    pub fn allows_negative(self) -> bool {
        self == BoxKey::Box5
    }

    /// EU trade boxes, fixed at zero since the UK left the EU
    pub fn is_legacy_eu(self) -> bool {
        matches!(self, BoxKey::Box2 | BoxKey::Box8 | BoxKey::Box9)
    }
}

impl FromStr for BoxKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BoxKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError {
                kind: "box",
                value: s.to_string(),
                expected: "box1..box9",
            })
    }
}

impl std::fmt::Display for BoxKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Box {}", self.number())
    }
}

/// The nine box values, in minor units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BoxValues {
    pub box1: MoneyAmount,
    pub box2: MoneyAmount,
    pub box3: MoneyAmount,
    pub box4: MoneyAmount,
    pub box5: MoneyAmount,
    pub box6: MoneyAmount,
    pub box7: MoneyAmount,
    pub box8: MoneyAmount,
    pub box9: MoneyAmount,
}

impl BoxValues {
    /// Build every box from `f`, stopping at the first error
    pub fn try_from_fn<E>(
        mut f: impl FnMut(BoxKey) -> Result<MoneyAmount, E>,
    ) -> Result<Self, E> {
        Ok(BoxValues {
            box1: f(BoxKey::Box1)?,
            box2: f(BoxKey::Box2)?,
            box3: f(BoxKey::Box3)?,
            box4: f(BoxKey::Box4)?,
            box5: f(BoxKey::Box5)?,
            box6: f(BoxKey::Box6)?,
            box7: f(BoxKey::Box7)?,
            box8: f(BoxKey::Box8)?,
            box9: f(BoxKey::Box9)?,
        })
    }

    pub fn get(&self, key: BoxKey) -> MoneyAmount {
        match key {
            BoxKey::Box1 => self.box1,
            BoxKey::Box2 => self.box2,
            BoxKey::Box3 => self.box3,
            BoxKey::Box4 => self.box4,
            BoxKey::Box5 => self.box5,
            BoxKey::Box6 => self.box6,
            BoxKey::Box7 => self.box7,
            BoxKey::Box8 => self.box8,
            BoxKey::Box9 => self.box9,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoxKey, MoneyAmount)> + '_ {
        BoxKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }

    pub fn is_refund_due(&self) -> bool {
        self.box5 < 0
    }
}

/// How a [`BoxSet`] was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BoxMetadata {
    pub scheme: AccountingScheme,
    pub income_count: usize,
    pub expense_count: usize,
    pub invoice_count: usize,
    #[schemars(with = "String")]
    pub calculated_at: DateTime<Utc>,
    pub rounded_to_pounds: bool,
}

/// Computed box values plus the metadata describing their inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BoxSet {
    #[serde(flatten)]
    pub values: BoxValues,
    pub metadata: BoxMetadata,
}
