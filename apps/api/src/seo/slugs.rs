//! Translation between database profession slugs (plural, as stored in
//! `salary_data.career_keyword`) and the singular slugs used in public URLs.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Serialize;

/// (database slug, URL slug) pairs. Both columns are unique, so the mapping
/// is a bijection over the covered professions.
pub const DB_TO_URL_SLUG: &[(&str, &str)] = &[
    ("registered-nurses", "registered-nurse"),
    ("licensed-practical-nurses", "licensed-practical-nurse"),
    ("nurse-practitioners", "nurse-practitioner"),
    ("physician-assistants", "physician-assistant"),
    ("physical-therapists", "physical-therapist"),
    ("physical-therapist-assistants", "physical-therapist-assistant"),
    ("occupational-therapists", "occupational-therapist"),
    ("occupational-therapy-assistants", "occupational-therapy-assistant"),
    ("speech-language-pathologists", "speech-language-pathologist"),
    ("respiratory-therapists", "respiratory-therapist"),
    ("medical-assistants", "medical-assistant"),
    ("dental-hygienists", "dental-hygienist"),
    ("dental-assistants", "dental-assistant"),
    ("pharmacy-technicians", "pharmacy-technician"),
    ("medical-laboratory-technicians", "medical-laboratory-technician"),
    ("radiologic-technologists", "radiologic-technologist"),
    ("ultrasound-technicians", "ultrasound-technician"),
    ("surgical-technologists", "surgical-technologist"),
    ("cardiovascular-technologists", "cardiovascular-technologist"),
    ("phlebotomists", "phlebotomist"),
    ("emt-paramedics", "emt-paramedic"),
    ("home-health-aides", "home-health-aide"),
    ("nursing-assistants", "nursing-assistant"),
    ("medical-records-specialists", "medical-records-specialist"),
    ("health-information-technicians", "health-information-technician"),
    ("medical-coders", "medical-coder"),
    ("medical-billers", "medical-biller"),
];

static DB_TO_URL: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
static URL_TO_DB: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

fn db_to_url() -> &'static HashMap<&'static str, &'static str> {
    DB_TO_URL.get_or_init(|| DB_TO_URL_SLUG.iter().copied().collect())
}

fn url_to_db() -> &'static HashMap<&'static str, &'static str> {
    URL_TO_DB.get_or_init(|| DB_TO_URL_SLUG.iter().map(|&(db, url)| (url, db)).collect())
}

/// `registered-nurses` → `registered-nurse`. Unknown slugs pass through.
pub fn to_url_slug(db_slug: &str) -> &str {
    db_to_url().get(db_slug).copied().unwrap_or(db_slug)
}

/// `registered-nurse` → `registered-nurses`. Unknown slugs pass through.
pub fn to_db_slug(url_slug: &str) -> &str {
    url_to_db().get(url_slug).copied().unwrap_or(url_slug)
}

pub fn is_valid_slug(url_slug: &str) -> bool {
    url_to_db().contains_key(url_slug)
}

pub fn valid_url_slugs() -> Vec<&'static str> {
    DB_TO_URL_SLUG.iter().map(|&(_, url)| url).collect()
}

pub fn valid_db_slugs() -> Vec<&'static str> {
    DB_TO_URL_SLUG.iter().map(|&(db, _)| db).collect()
}

/// Title-cases each hyphen-separated word: `registered-nurse` → `Registered Nurse`.
pub fn display_name(slug: &str) -> String {
    slug.split('-')
        .map(|w| {
            let mut c = w.chars();
            match c.next() {
                None => String::new(),
                Some(f) => f.to_uppercase().to_string() + c.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lower-cases, drops anything outside `[a-z0-9 -]`, and collapses runs of
/// whitespace and hyphens into a single hyphen.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if (c.is_whitespace() || c == '-') && !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}

/// Company slugs replace every non-alphanumeric run with a hyphen.
pub fn company_slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

/// Hub and spoke paths for a profession, keyed by URL slug.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionUrls {
    pub hub: String,
    pub how_to_become: String,
    pub salary: String,
    pub jobs: String,
    pub schools: String,
    pub license: String,
    pub resume: String,
    pub interview: String,
    pub specializations: String,
    pub skills: String,
    pub career_path: String,
    pub work_life_balance: String,
}

pub fn profession_urls(url_slug: &str) -> ProfessionUrls {
    let spoke = |name: &str| format!("/{url_slug}/{name}");
    ProfessionUrls {
        hub: format!("/{url_slug}"),
        how_to_become: spoke("how-to-become"),
        salary: spoke("salary"),
        jobs: spoke("jobs"),
        schools: spoke("schools"),
        license: spoke("license"),
        resume: spoke("resume"),
        interview: spoke("interview"),
        specializations: spoke("specializations"),
        skills: spoke("skills"),
        career_path: spoke("career-path"),
        work_life_balance: spoke("work-life-balance"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_round_trips_both_directions() {
        for &(db, url) in DB_TO_URL_SLUG {
            assert_eq!(to_url_slug(to_db_slug(url)), url);
            assert_eq!(to_db_slug(to_url_slug(db)), db);
        }
    }

    #[test]
    fn test_table_is_a_bijection() {
        assert_eq!(db_to_url().len(), DB_TO_URL_SLUG.len());
        assert_eq!(url_to_db().len(), DB_TO_URL_SLUG.len());
    }

    #[test]
    fn test_slug_lists_round_trip() {
        let urls = valid_url_slugs();
        let dbs = valid_db_slugs();
        assert_eq!(urls.len(), DB_TO_URL_SLUG.len());
        assert_eq!(dbs.len(), urls.len());
        for (url, db) in urls.iter().zip(&dbs) {
            assert!(is_valid_slug(url));
            assert_eq!(to_db_slug(url), *db);
            assert_eq!(to_url_slug(db), *url);
        }
        assert!(dbs.contains(&"registered-nurses"));
        assert!(!urls.contains(&"registered-nurses"));
    }

    #[test]
    fn test_unknown_slug_passes_through() {
        assert_eq!(to_url_slug("chiropractors"), "chiropractors");
        assert_eq!(to_db_slug("chiropractor"), "chiropractor");
    }

    #[test]
    fn test_is_valid_slug_checks_url_form_only() {
        assert!(is_valid_slug("registered-nurse"));
        assert!(!is_valid_slug("registered-nurses"));
        assert!(!is_valid_slug("astronaut"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("registered-nurse"), "Registered Nurse");
        assert_eq!(display_name("emt-paramedic"), "Emt Paramedic");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("San Francisco"), "san-francisco");
        assert_eq!(slugify("Registered Nurses"), "registered-nurses");
        assert_eq!(
            slugify("Licensed Practical and Licensed Vocational Nurses"),
            "licensed-practical-and-licensed-vocational-nurses"
        );
        assert_eq!(slugify("Winston-Salem"), "winston-salem");
        assert_eq!(slugify("Coeur d'Alene"), "coeur-dalene");
        assert_eq!(slugify("Dentists, All Other  Specialists"), "dentists-all-other-specialists");
    }

    #[test]
    fn test_company_slug() {
        assert_eq!(company_slug("St. Mary's Hospital"), "st-mary-s-hospital");
        assert_eq!(company_slug("  Acme Health!  "), "acme-health");
    }

    #[test]
    fn test_profession_urls() {
        let urls = profession_urls("registered-nurse");
        assert_eq!(urls.hub, "/registered-nurse");
        assert_eq!(urls.career_path, "/registered-nurse/career-path");
    }
}
