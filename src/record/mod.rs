//! The job record data model
//!
//! One `JobRecord` is the unit of persistence: a flat, fully-named row
//! built from the raw strings a listing element was scraped into. Records
//! are validated on construction; a record missing a required field never
//! reaches storage.

use crate::region::CityIndex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a record
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
}

/// Placeholder for optional company tags the source page did not show
pub const NONE_PLACEHOLDER: &str = "None";

/// Column names in persistence order, shared by the SQLite schema and the
/// CSV header
pub const FIELD_NAMES: [&str; 17] = [
    "category",
    "sub_category",
    "job_title",
    "province",
    "job_location",
    "job_company",
    "job_industry",
    "job_finance",
    "job_scale",
    "job_welfare",
    "job_salary_range",
    "job_experience",
    "job_education",
    "job_skills",
    "job_address",
    "job_desc",
    "create_time",
];

/// A normalized job listing, immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub category: String,
    pub sub_category: String,
    pub job_title: String,
    pub province: String,
    pub job_location: String,
    pub job_company: String,
    pub job_industry: String,
    pub job_finance: String,
    pub job_scale: String,
    pub job_welfare: String,
    pub job_salary_range: String,
    pub job_experience: String,
    pub job_education: String,
    pub job_skills: String,
    pub job_address: String,
    pub job_desc: String,
    pub create_time: String,
}

/// Raw per-element scrape output, before normalization
///
/// Fields that the source page renders conditionally are `Option`; the
/// record constructor substitutes their placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawListing {
    pub title: String,
    pub location: String,
    pub company: String,
    pub industry: String,
    pub finance: String,
    pub scale: Option<String>,
    pub welfare: Option<String>,
    pub salary_range: String,
    pub experience: String,
    pub education: String,
    pub skills: Vec<String>,
    pub address: Option<String>,
    pub desc: Option<String>,
}

impl JobRecord {
    /// Builds a record from one scraped listing.
    ///
    /// Required fields (category, sub-category, title, location, company,
    /// salary range, experience, education) must be non-empty; otherwise
    /// the record is rejected before it can reach storage. The province is
    /// derived from the location's city part and may be empty.
    pub fn from_listing(
        listing: RawListing,
        category: &str,
        sub_category: &str,
        create_time: &str,
        cities: &CityIndex,
    ) -> Result<Self, RecordError> {
        require("category", category)?;
        require("sub_category", sub_category)?;
        require("job_title", &listing.title)?;
        require("job_location", &listing.location)?;
        require("job_company", &listing.company)?;
        require("job_salary_range", &listing.salary_range)?;
        require("job_experience", &listing.experience)?;
        require("job_education", &listing.education)?;

        let province = cities.province_for_location(&listing.location);

        Ok(Self {
            category: category.to_string(),
            sub_category: sub_category.to_string(),
            job_title: listing.title,
            province: province.to_string(),
            job_location: listing.location,
            job_company: listing.company,
            job_industry: listing.industry,
            job_finance: listing.finance,
            job_scale: listing.scale.unwrap_or_else(|| NONE_PLACEHOLDER.to_string()),
            job_welfare: listing
                .welfare
                .unwrap_or_else(|| NONE_PLACEHOLDER.to_string()),
            job_salary_range: listing.salary_range,
            job_experience: listing.experience,
            job_education: listing.education,
            job_skills: listing.skills.join(","),
            job_address: listing.address.unwrap_or_default(),
            job_desc: listing.desc.unwrap_or_default(),
            create_time: create_time.to_string(),
        })
    }
}

fn require(name: &'static str, value: &str) -> Result<(), RecordError> {
    if value.trim().is_empty() {
        Err(RecordError::MissingField(name))
    } else {
        Ok(())
    }
}
