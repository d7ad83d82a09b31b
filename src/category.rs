//! The account-category axis that partitions income and withdrawal records.

use std::fmt::Display;

use serde::Serialize;

use crate::Error;

/// A named bucket of income.
///
/// The four income streams are stored in separate tables with slightly
/// different metadata, but they are structurally identical for ledger
/// purposes, so every query is written once and parameterized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountCategory {
    /// General offerings collected during a service.
    Offering,
    /// Offerings earmarked for a specific project.
    ProjectOffering,
    /// Tithes paid by individual members.
    Tithe,
    /// Welfare-fund contributions.
    Welfare,
}

impl AccountCategory {
    /// Every category, in a fixed order.
    pub const ALL: [AccountCategory; 4] = [
        AccountCategory::Offering,
        AccountCategory::ProjectOffering,
        AccountCategory::Tithe,
        AccountCategory::Welfare,
    ];

    /// Parse the wire name of a category.
    ///
    /// # Errors
    /// Returns [Error::InvalidAccountType] for anything that is not one of
    /// the four wire names.
    pub fn parse(name: &str) -> Result<Self, Error> {
        match name {
            "offering" => Ok(Self::Offering),
            "projectoffering" => Ok(Self::ProjectOffering),
            "tithe" => Ok(Self::Tithe),
            "welfare" => Ok(Self::Welfare),
            other => Err(Error::InvalidAccountType(other.to_owned())),
        }
    }

    /// The wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offering => "offering",
            Self::ProjectOffering => "projectoffering",
            Self::Tithe => "tithe",
            Self::Welfare => "welfare",
        }
    }

    /// The table that stores this category's income records.
    pub(crate) fn table(&self) -> &'static str {
        match self {
            Self::Offering => "offering",
            Self::ProjectOffering => "project_offering",
            Self::Tithe => "tithe",
            Self::Welfare => "welfare_contribution",
        }
    }

    /// The column holding the monetary amount in [Self::table].
    ///
    /// The offering tables record the sum collected per service, the
    /// member-linked tables record one payment per row.
    pub(crate) fn amount_column(&self) -> &'static str {
        match self {
            Self::Offering | Self::ProjectOffering => "amount_collected",
            Self::Tithe | Self::Welfare => "amount",
        }
    }
}

impl Display for AccountCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The type tag of a deletable financial record.
///
/// Batch deletion accepts the four income categories plus expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    /// An income record in one of the four account categories.
    Account(AccountCategory),
    /// An expense record, not tied to an account category.
    Expense,
}

impl RecordType {
    /// Parse the wire name of a record type.
    ///
    /// Returns `None` for unrecognized names so callers can skip them;
    /// mixed-origin selections degrade gracefully rather than failing the
    /// whole batch.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "expense" => Some(Self::Expense),
            other => AccountCategory::parse(other).ok().map(Self::Account),
        }
    }

    /// The table that stores records of this type.
    pub(crate) fn table(&self) -> &'static str {
        match self {
            Self::Account(category) => category.table(),
            Self::Expense => "expense",
        }
    }
}


#[cfg(test)]
mod record_type_tests {
    use super::{AccountCategory, RecordType};

    #[test]
    fn parses_expense_and_categories() {
        assert_eq!(RecordType::parse("expense"), Some(RecordType::Expense));
        assert_eq!(
            RecordType::parse("tithe"),
            Some(RecordType::Account(AccountCategory::Tithe))
        );
    }

    #[test]
    fn unknown_type_is_none() {
        assert_eq!(RecordType::parse("donation"), None);
        assert_eq!(RecordType::parse(""), None);
    }
}
