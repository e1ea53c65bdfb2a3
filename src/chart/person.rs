use core::fmt;

use serde::{Deserialize, Serialize};

/// Unique identity of a person within one chart's lifetime.
#[derive(Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub String);

impl PersonId {
    pub fn new(id: impl Into<String>) -> PersonId {
        PersonId(id.into())
    }
}

impl fmt::Debug for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "p#{}", self.0)
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Three-way partition used by the gender-alternation fill. The engine is
/// agnostic to what the two categories mean.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    A,
    B,
    #[default]
    Unspecified,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub gender: Gender,
    /// A locked person's current seat (if any) is never changed by the
    /// engine. Locking an unseated person has no effect on placement.
    pub locked: bool,
}

impl Person {
    pub fn new(id: impl Into<String>, name: impl Into<String>, gender: Gender) -> Person {
        Person {
            id: PersonId::new(id),
            name: name.into(),
            gender,
            locked: false,
        }
    }

    pub fn locked(mut self) -> Person {
        self.locked = true;
        self
    }
}
