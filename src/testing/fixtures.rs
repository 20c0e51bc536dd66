//! Pre-built test datasets.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// Address-book style record used throughout the examples and tests.
///
/// `Contact::default()` is the empty contact: blank strings, age 0, and no
/// gender.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
    pub state: String,
    pub gender: Option<Gender>,
    pub age: u32,
    pub email: String,
    pub city: String,
    pub name: String,
    /// `YYYY-MM-DD`.
    pub birthday: String,
}

impl Contact {
    #[must_use]
    pub fn new(name: &str, state: &str, city: &str, gender: Gender, age: u32) -> Self {
        let handle = name.to_lowercase().replace(' ', ".");
        Self {
            state: state.to_string(),
            gender: Some(gender),
            age,
            email: format!("{handle}@example.com"),
            city: city.to_string(),
            name: name.to_string(),
            birthday: String::new(),
        }
    }

    #[must_use]
    pub fn with_birthday(mut self, birthday: &str) -> Self {
        self.birthday = birthday.to_string();
        self
    }

    /// Whether this contact lives in `state`.
    #[must_use]
    pub fn is_in_state(&self, state: &str) -> bool {
        self.state == state
    }
}

/// Ten contacts across four states.
///
/// Florida has three men (ages 30, 40, 50) and one woman.
///
/// ```
/// use ironstream::testing::{sample_contacts, Gender};
///
/// let contacts = sample_contacts();
/// let fl_men = contacts
///     .iter()
///     .filter(|c| c.is_in_state("FL") && c.gender == Some(Gender::Male))
///     .count();
/// assert_eq!(fl_men, 3);
/// ```
#[must_use]
pub fn sample_contacts() -> Vec<Contact> {
    vec![
        Contact::new("John Smith", "FL", "Miami", Gender::Male, 30).with_birthday("1994-03-12"),
        Contact::new("Mary Jones", "FL", "Tampa", Gender::Female, 28).with_birthday("1996-07-01"),
        Contact::new("Robert Brown", "FL", "Orlando", Gender::Male, 40).with_birthday("1984-11-23"),
        Contact::new("James Wilson", "FL", "Miami", Gender::Male, 50).with_birthday("1974-02-08"),
        Contact::new("Linda Davis", "CA", "San Diego", Gender::Female, 35).with_birthday("1989-05-30"),
        Contact::new("Michael Miller", "CA", "Fresno", Gender::Male, 22).with_birthday("2002-09-14"),
        Contact::new("Patricia Moore", "NY", "Buffalo", Gender::Female, 61).with_birthday("1963-12-02"),
        Contact::new("David Taylor", "NY", "Albany", Gender::Male, 45).with_birthday("1979-04-17"),
        Contact::new("Susan Clark", "TX", "Austin", Gender::Female, 33).with_birthday("1991-08-26"),
        Contact::new("Mark Lewis", "TX", "Dallas", Gender::Male, 27).with_birthday("1997-01-05"),
    ]
}

/// Words used by the string-pipeline examples.
#[must_use]
pub fn sample_words() -> Vec<String> {
    ["Using", "Stream", "API", "from", "Java8", "Stream", "API"]
        .iter()
        .map(ToString::to_string)
        .collect()
}
