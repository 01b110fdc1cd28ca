use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Occasion {
    #[default]
    Wedding,
    Work,
    Casual,
    #[serde(rename = "Religious Event")]
    ReligiousEvent,
}

impl Occasion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Occasion::Wedding => "Wedding",
            Occasion::Work => "Work",
            Occasion::Casual => "Casual",
            Occasion::ReligiousEvent => "Religious Event",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weather {
    #[default]
    Hot,
    Cold,
    Rainy,
    Moderate,
}

impl Weather {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Hot => "Hot",
            Weather::Cold => "Cold",
            Weather::Rainy => "Rainy",
            Weather::Moderate => "Moderate",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    #[default]
    Female,
    Male,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

/// The four inputs driving a suggestion. Selection widgets on the front-end
/// only offer the enumerated values; location is free text and may be empty.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub occasion: Occasion,
    #[serde(default)]
    pub location: String,
    pub weather: Weather,
    pub gender: Gender,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Session {
    pub id: Uuid,
    pub form: FormState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Session { id: Uuid::new_v4(), form: FormState::default(), created_at: now, updated_at: now }
    }
}

/// One field edit. The tag/content layout keeps out-of-domain enum values
/// unrepresentable on the wire.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "field", content = "value", rename_all = "lowercase")]
pub enum FieldUpdate {
    Occasion(Occasion),
    Location(String),
    Weather(Weather),
    Gender(Gender),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SuggestionResponse {
    pub suggestion: String,
}
