//! People and organizations
//!
//! The flat person/organization half of the example domain. An organization
//! holds a set of persons deduplicated by identifier; the tech-company
//! variant adds a business type and country and overrides the description.

use std::fmt;

/// An employable person: caller-assigned unique id plus a display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    id: u64,
    name: String,
}

impl Person {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}

/// What kind of business a tech company runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessType {
    Software,
    Hardware,
    Ecommerce,
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BusinessType::Software => "software",
            BusinessType::Hardware => "hardware",
            BusinessType::Ecommerce => "e-commerce",
        };
        f.write_str(s)
    }
}

/// The organization variants; single-level overriding mapped to a tagged enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrgKind {
    Generic,
    TechCompany {
        business: BusinessType,
        country: String,
    },
}

/// A named organization holding a set of persons, deduplicated by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    name: String,
    members: Vec<Person>,
    kind: OrgKind,
}

impl Organization {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            kind: OrgKind::Generic,
        }
    }

    pub fn tech_company(
        name: impl Into<String>,
        business: BusinessType,
        country: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            kind: OrgKind::TechCompany {
                business,
                country: country.into(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[Person] {
        &self.members
    }

    /// Add a member; returns false when a person with the same id is
    /// already present
    pub fn add_member(&mut self, person: Person) -> bool {
        if self.members.iter().any(|m| m.id() == person.id()) {
            return false;
        }
        self.members.push(person);
        true
    }

    /// Human-readable description; the tech-company variant overrides the
    /// generic wording
    pub fn describe(&self) -> String {
        match &self.kind {
            OrgKind::Generic => {
                format!("{} ({} members)", self.name, self.members.len())
            }
            OrgKind::TechCompany { business, country } => {
                format!("{}, a {} company from {}", self.name, business, country)
            }
        }
    }

    /// Registry key derived from the display name only.
    ///
    /// Known trap kept from the original code: two distinct organizations
    /// with the same name produce the same key, so a collection keyed on
    /// this silently collapses them. Do not change without confirming the
    /// intended behavior.
    pub fn key(&self) -> String {
        self.name.clone()
    }
}

impl fmt::Display for Organization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
