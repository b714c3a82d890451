//! Person profile — the attributes collected from the input form.
//!
//! A [`PersonProfile`] can only be built through validation, so every
//! downstream consumer may assume the age and tenure ranges hold.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

/// Accepted age range (years, inclusive).
pub const AGE_RANGE: RangeInclusive<i64> = 18..=65;

/// Accepted service-years range (inclusive).
pub const SERVICE_YEARS_RANGE: RangeInclusive<i64> = 0..=40;

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => f.write_str("male"),
            Gender::Female => f.write_str("female"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "남성" => Ok(Gender::Male),
            "female" | "f" | "여성" => Ok(Gender::Female),
            other => Err(format!("unknown gender '{other}' (expected male or female)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Name,
    Gender,
    Age,
    ServiceYears,
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProfileField::Name => "name",
            ProfileField::Gender => "gender",
            ProfileField::Age => "age",
            ProfileField::ServiceYears => "service_years",
        };
        f.write_str(s)
    }
}

/// A single rejected field and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct FieldError {
    pub field: ProfileField,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("invalid profile: {}", join_field_errors(.0))]
    Invalid(Vec<FieldError>),
}

impl ProfileError {
    /// The offending fields, in form order.
    pub fn fields(&self) -> Vec<ProfileField> {
        match self {
            ProfileError::Invalid(errors) => errors.iter().map(|e| e.field).collect(),
        }
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ---------------------------------------------------------------------------
// ProfileInput — raw form strings
// ---------------------------------------------------------------------------

/// Unvalidated profile fields exactly as entered in the form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileInput {
    pub name: String,
    pub gender: String,
    pub age: String,
    pub service_years: String,
}

impl ProfileInput {
    /// Parse and validate every field, collecting all failures.
    pub fn parse(&self) -> Result<PersonProfile, ProfileError> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(FieldError {
                field: ProfileField::Name,
                reason: "must not be empty".into(),
            });
        }

        let gender = match self.gender.parse::<Gender>() {
            Ok(g) => Some(g),
            Err(reason) => {
                errors.push(FieldError {
                    field: ProfileField::Gender,
                    reason,
                });
                None
            }
        };

        let age = parse_ranged(&self.age, ProfileField::Age, &AGE_RANGE, &mut errors);
        let service_years = parse_ranged(
            &self.service_years,
            ProfileField::ServiceYears,
            &SERVICE_YEARS_RANGE,
            &mut errors,
        );

        match (gender, age, service_years) {
            (Some(gender), Some(age), Some(service_years)) if errors.is_empty() => {
                Ok(PersonProfile {
                    name: name.to_string(),
                    gender,
                    age,
                    service_years,
                })
            }
            _ => Err(ProfileError::Invalid(errors)),
        }
    }
}

fn parse_ranged(
    raw: &str,
    field: ProfileField,
    range: &RangeInclusive<i64>,
    errors: &mut Vec<FieldError>,
) -> Option<u32> {
    match raw.trim().parse::<i64>() {
        Ok(v) => check_range(v, field, range, errors),
        Err(_) => {
            errors.push(FieldError {
                field,
                reason: format!("'{}' is not a whole number", raw.trim()),
            });
            None
        }
    }
}

fn check_range(
    value: i64,
    field: ProfileField,
    range: &RangeInclusive<i64>,
    errors: &mut Vec<FieldError>,
) -> Option<u32> {
    if range.contains(&value) {
        // Both ranges sit well inside u32.
        Some(value as u32)
    } else {
        errors.push(FieldError {
            field,
            reason: format!(
                "{value} is outside {}..={}",
                range.start(),
                range.end()
            ),
        });
        None
    }
}

// ---------------------------------------------------------------------------
// PersonProfile
// ---------------------------------------------------------------------------

/// A validated person profile. Immutable for the duration of a prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawProfile")]
pub struct PersonProfile {
    name: String,
    gender: Gender,
    age: u32,
    service_years: u32,
}

impl PersonProfile {
    /// Build a profile from typed values, applying the same range checks as
    /// [`ProfileInput::parse`].
    pub fn new(
        name: impl Into<String>,
        gender: Gender,
        age: i64,
        service_years: i64,
    ) -> Result<Self, ProfileError> {
        let name = name.into();
        let mut errors = Vec::new();
        if name.trim().is_empty() {
            errors.push(FieldError {
                field: ProfileField::Name,
                reason: "must not be empty".into(),
            });
        }
        let age = check_range(age, ProfileField::Age, &AGE_RANGE, &mut errors);
        let service_years = check_range(
            service_years,
            ProfileField::ServiceYears,
            &SERVICE_YEARS_RANGE,
            &mut errors,
        );
        match (age, service_years) {
            (Some(age), Some(service_years)) if errors.is_empty() => Ok(Self {
                name: name.trim().to_string(),
                gender,
                age,
                service_years,
            }),
            _ => Err(ProfileError::Invalid(errors)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn service_years(&self) -> u32 {
        self.service_years
    }
}

#[derive(Deserialize)]
struct RawProfile {
    name: String,
    gender: Gender,
    age: i64,
    service_years: i64,
}

impl TryFrom<RawProfile> for PersonProfile {
    type Error = ProfileError;

    fn try_from(raw: RawProfile) -> Result<Self, Self::Error> {
        PersonProfile::new(raw.name, raw.gender, raw.age, raw.service_years)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
