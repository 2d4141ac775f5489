//! The `Dog` document and its field constraints.
//!
//! Documents live in the `dogs` collection. The name is stored as `dogName` and the
//! remaining fields in camelCase, matching collections written by earlier versions
//! of the application.

use std::fmt;

use bson::{DateTime, oid::ObjectId};
use kennel::{
    document::Document,
    validate::{ValidationErrors, Validator},
};
use serde::{Deserialize, Serialize};

/// Stored field names, for building filters and updates.
pub mod fields {
    pub const ID: &str = "_id";
    pub const NAME: &str = "dogName";
    pub const AGE: &str = "age";
    pub const COLOR: &str = "color";
    pub const VET_VISITS: &str = "vetVisits";
    pub const TOYS: &str = "toys";
    pub const OWNERS: &str = "owners";
    pub const COUNTRY: &str = "country";
    pub const PHOTO_URL: &str = "photoUrl";
}

pub const MIN_AGE: f64 = 0.0;
pub const MAX_AGE: f64 = 50.0;
pub const COLOR_LENGTH: (usize, usize) = (3, 20);
pub const MIN_TOY_LENGTH: usize = 2;
pub const COUNTRY_PATTERN: &str = "^[A-Z][A-Z]$";
pub const PHOTO_URL_PATTERN: &str = "^https?://";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dog {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "dogName")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub vet_visits: Vec<DateTime>,
    #[serde(default)]
    pub toys: Vec<String>,
    /// References to owner records. Not checked against anything.
    #[serde(default)]
    pub owners: Vec<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Dog {
    /// Starts building a dog with the given name.
    pub fn builder(name: impl Into<String>) -> DogBuilder {
        DogBuilder::new(name)
    }
}

impl Document for Dog {
    fn id(&self) -> Option<&ObjectId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }

    fn collection_name() -> &'static str {
        "dogs"
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let (min_color, max_color) = COLOR_LENGTH;

        Validator::new()
            .required(fields::NAME, &self.name)
            .range(fields::AGE, self.age, MIN_AGE, MAX_AGE)
            .length(fields::COLOR, self.color.as_deref(), Some(min_color), Some(max_color))
            .each_min_length(fields::TOYS, &self.toys, MIN_TOY_LENGTH)
            .matches(fields::COUNTRY, self.country.as_deref(), COUNTRY_PATTERN, is_country_code)
            .matches(fields::PHOTO_URL, self.photo_url.as_deref(), PHOTO_URL_PATTERN, is_web_url)
            .finish()
    }
}

impl fmt::Display for Dog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} (id: {id})", self.name),
            None => write!(f, "{} (unsaved)", self.name),
        }
    }
}

/// Exactly two uppercase ASCII letters.
fn is_country_code(value: &str) -> bool {
    value.len() == 2 && value.bytes().all(|b| b.is_ascii_uppercase())
}

fn is_web_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Builds a [`Dog`], running the field validators on [`build`](DogBuilder::build).
#[derive(Debug, Clone)]
pub struct DogBuilder {
    dog: Dog,
}

impl DogBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            dog: Dog {
                id: None,
                name: name.into(),
                age: None,
                color: None,
                vet_visits: Vec::new(),
                toys: Vec::new(),
                owners: Vec::new(),
                country: None,
                photo_url: None,
            },
        }
    }

    /// Uses a known id instead of letting the store assign one.
    pub fn id(mut self, id: ObjectId) -> Self {
        self.dog.id = Some(id);
        self
    }

    pub fn age(mut self, age: impl Into<f64>) -> Self {
        self.dog.age = Some(age.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.dog.color = Some(color.into());
        self
    }

    pub fn vet_visit(mut self, at: DateTime) -> Self {
        self.dog.vet_visits.push(at);
        self
    }

    pub fn toy(mut self, toy: impl Into<String>) -> Self {
        self.dog.toys.push(toy.into());
        self
    }

    pub fn owner(mut self, owner: ObjectId) -> Self {
        self.dog.owners.push(owner);
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.dog.country = Some(country.into());
        self
    }

    pub fn photo_url(mut self, url: impl Into<String>) -> Self {
        self.dog.photo_url = Some(url.into());
        self
    }

    /// Returns the dog if every constraint holds, otherwise all the violations.
    pub fn build(self) -> Result<Dog, ValidationErrors> {
        self.dog.validate()?;

        Ok(self.dog)
    }
}
