use std::fmt::Display;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

pub const NOT_PROVIDED: &str = "Not Provided";

/// Teaching entries of a profile page.
///
/// `NotProvided` is the confirmed-empty marker: the profile was fetched and
/// parsed but no teaching entry could be found. `Entries` is never empty;
/// build it with [`Teaching::from_entries`] to keep that guarantee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Teaching {
    Entries(Vec<String>),
    NotProvided,
}

impl Teaching {
    pub fn from_entries(entries: Vec<String>) -> Self {
        if entries.is_empty() {
            Teaching::NotProvided
        } else {
            Teaching::Entries(entries)
        }
    }
}

impl Display for Teaching {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Teaching::Entries(entries) => write!(f, "{}", entries.join("; ")),
            Teaching::NotProvided => write!(f, "{NOT_PROVIDED}"),
        }
    }
}

impl Serialize for Teaching {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Teaching::Entries(entries) => entries.serialize(serializer),
            Teaching::NotProvided => serializer.serialize_str(NOT_PROVIDED),
        }
    }
}

impl<'de> Deserialize<'de> for Teaching {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            List(Vec<String>),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::List(entries) => Ok(Teaching::from_entries(entries)),
            Repr::Text(text) if text == NOT_PROVIDED => Ok(Teaching::NotProvided),
            Repr::Text(text) => Err(de::Error::custom(format!(
                "expected a list of entries or '{NOT_PROVIDED}', got '{text}'"
            ))),
        }
    }
}

/// Fields read directly off one summary card of a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFields {
    pub name: String,
    pub profile_url: String,
    pub education: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub specialization: Option<String>,
}

impl Display for CardFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(education) = &self.education {
            write!(f, " ({})", education)?;
        }
        write!(f, " - {}", self.profile_url)
    }
}

/// Fields extracted from a profile page. All `None` when the page could not
/// be fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFields {
    pub bio: Option<String>,
    pub teaching: Option<Teaching>,
    pub research_areas: Option<Vec<String>>,
    pub personal_link: Option<String>,
    pub journal_articles: Option<Vec<String>>,
    pub conference_papers: Option<Vec<String>>,
}

impl ProfileFields {
    pub fn unavailable() -> Self {
        Self::default()
    }
}

impl Display for ProfileFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(bio) = &self.bio {
            let preview: String = bio.chars().take(120).collect();
            writeln!(f, "  Bio: {}", preview)?;
        }
        if let Some(teaching) = &self.teaching {
            writeln!(f, "  Teaching: {}", teaching)?;
        }
        if let Some(areas) = &self.research_areas {
            writeln!(f, "  Research areas: {}", areas.join(", "))?;
        }
        if let Some(link) = &self.personal_link {
            writeln!(f, "  Personal link: {}", link)?;
        }
        if let Some(journals) = &self.journal_articles {
            writeln!(f, "  Journal articles: {}", journals.len())?;
        }
        if let Some(conferences) = &self.conference_papers {
            writeln!(f, "  Conference papers: {}", conferences.len())?;
        }
        Ok(())
    }
}

/// One row of the output dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyRecord {
    pub name: String,
    #[serde(rename = "profile")]
    pub profile_url: String,
    pub education: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub specialization: Option<String>,
    #[serde(rename = "personal_links")]
    pub personal_link: Option<String>,
    pub bio: Option<String>,
    pub teaching: Option<Teaching>,
    pub research_areas: Option<Vec<String>>,
    pub journal_articles: Option<Vec<String>>,
    pub conference_papers: Option<Vec<String>>,
}

impl Display for FacultyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "  Profile: {}", self.profile_url)?;
        if let Some(education) = &self.education {
            writeln!(f, "  Education: {}", education)?;
        }
        if let Some(email) = &self.email {
            writeln!(f, "  Email: {}", email)?;
        }
        if let Some(phone) = &self.phone {
            writeln!(f, "  Phone: {}", phone)?;
        }
        if let Some(specialization) = &self.specialization {
            writeln!(f, "  Specialization: {}", specialization)?;
        }
        if let Some(teaching) = &self.teaching {
            writeln!(f, "  Teaching: {}", teaching)?;
        }
        if let Some(areas) = &self.research_areas {
            writeln!(f, "  Research areas: {}", areas.join(", "))?;
        }
        let journals = self.journal_articles.as_ref().map_or(0, Vec::len);
        let conferences = self.conference_papers.as_ref().map_or(0, Vec::len);
        if journals + conferences > 0 {
            writeln!(
                f,
                "  Publications: {} journal, {} conference",
                journals, conferences
            )?;
        }
        Ok(())
    }
}
