use care_core::enums::Role;

use crate::scope::Scope;

/// One row of the staff directory: name, offices, role, PIN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffEntry {
    pub name: String,
    pub scope: Scope,
    pub role: Role,
    pub pin: String,
}

impl StaffEntry {
    /// Parse a directory row. Rows without a name are skipped.
    #[must_use]
    pub fn from_cells(cells: &[String]) -> Option<Self> {
        let cell = |idx: usize| cells.get(idx).map_or("", |s| s.trim());
        let name = cell(0);
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            scope: Scope::from_cell(cell(1)),
            role: Role::from_cell(cell(2)),
            pin: cell(3).to_string(),
        })
    }

    /// Directory row for this entry.
    #[must_use]
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.scope.to_cell(),
            self.role.as_str().to_string(),
            self.pin.clone(),
        ]
    }

    fn matches(&self, name: &str, pin: &str) -> bool {
        !self.pin.is_empty() && self.name == name && self.pin == pin
    }
}

pub(crate) fn find<'a>(staff: &'a [StaffEntry], name: &str, pin: &str) -> Option<&'a StaffEntry> {
    staff.iter().find(|entry| entry.matches(name, pin))
}
