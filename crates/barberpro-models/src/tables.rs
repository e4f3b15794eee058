use std::fmt;

/// Tables the application requires, in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Profiles,
    Barbershops,
    Barbers,
    Services,
    WorkingHours,
    Appointments,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::Profiles,
        Table::Barbershops,
        Table::Barbers,
        Table::Services,
        Table::WorkingHours,
        Table::Appointments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Profiles => "profiles",
            Table::Barbershops => "barbershops",
            Table::Barbers => "barbers",
            Table::Services => "services",
            Table::WorkingHours => "working_hours",
            Table::Appointments => "appointments",
        }
    }

    pub fn from_name(name: &str) -> Option<Table> {
        Table::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
