use crate::types::{CardFields, FacultyRecord, ProfileFields};

#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("Record for '{profile_url}' is missing required field: {field}")]
    MissingField {
        field: &'static str,
        profile_url: String,
    },
}

/// Merges a listing card with its profile extraction. Only an empty name or
/// profile link rejects the card; every other field passes through as is.
pub fn aggregate(card: CardFields, profile: ProfileFields) -> Result<FacultyRecord, AggregateError> {
    if card.name.trim().is_empty() {
        return Err(AggregateError::MissingField {
            field: "name",
            profile_url: card.profile_url,
        });
    }
    if card.profile_url.trim().is_empty() {
        return Err(AggregateError::MissingField {
            field: "profile",
            profile_url: card.profile_url,
        });
    }

    Ok(FacultyRecord {
        name: card.name,
        profile_url: card.profile_url,
        education: card.education,
        phone: card.phone,
        address: card.address,
        email: card.email,
        specialization: card.specialization,
        personal_link: profile.personal_link,
        bio: profile.bio,
        teaching: profile.teaching,
        research_areas: profile.research_areas,
        journal_articles: profile.journal_articles,
        conference_papers: profile.conference_papers,
    })
}
