//! Office authorization scope.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Offices a staff member may act in.
///
/// The staff directory stores this as a comma-separated cell where an empty
/// cell means every office. Parsing turns that sentinel into an explicit
/// variant so "no offices" and "all offices" can never be confused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "offices")]
pub enum Scope {
    AllOffices,
    Offices(BTreeSet<String>),
}

impl Scope {
    /// Parse the offices cell: split on commas, trim, drop blanks.
    #[must_use]
    pub fn from_cell(cell: &str) -> Self {
        let offices: BTreeSet<String> = cell
            .split(',')
            .map(str::trim)
            .filter(|office| !office.is_empty())
            .map(String::from)
            .collect();
        if offices.is_empty() {
            Self::AllOffices
        } else {
            Self::Offices(offices)
        }
    }

    /// Whether `office` (trimmed) is covered.
    #[must_use]
    pub fn allows(&self, office: &str) -> bool {
        match self {
            Self::AllOffices => true,
            Self::Offices(offices) => offices.contains(office.trim()),
        }
    }

    /// Cell form written to the audit log. `AllOffices` is written empty.
    #[must_use]
    pub fn to_cell(&self) -> String {
        match self {
            Self::AllOffices => String::new(),
            Self::Offices(offices) => offices.iter().cloned().collect::<Vec<_>>().join(","),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_cell_is_all_offices() {
        assert_eq!(Scope::from_cell(""), Scope::AllOffices);
        assert_eq!(Scope::from_cell(" , "), Scope::AllOffices);
        assert!(Scope::AllOffices.allows("Anywhere"));
    }

    #[test]
    fn listed_offices_are_trimmed() {
        let scope = Scope::from_cell(" Beta , Gamma");
        assert!(scope.allows("Beta"));
        assert!(scope.allows("Gamma "));
        assert!(!scope.allows("Delta"));
        assert_eq!(scope.to_cell(), "Beta,Gamma");
    }
}
