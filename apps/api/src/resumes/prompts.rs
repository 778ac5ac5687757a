use serde_json::Value;

/// String field of a JSON object, or `""`.
fn field<'a>(item: &'a Value, key: &str) -> &'a str {
    item.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn or_unspecified(s: &str) -> &str {
    if s.trim().is_empty() {
        "Not specified"
    } else {
        s
    }
}

/// Joins one string field across an array of objects.
fn join_field(data: &Value, list: &str, key: &str) -> String {
    data.get(list)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|i| field(i, key))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

fn skills(data: &Value) -> String {
    data.get("skills")
        .and_then(Value::as_array)
        .map(|s| {
            s.iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

fn profession(data: &Value) -> &str {
    match field(data, "profession") {
        "" => "healthcare professional",
        p => p,
    }
}

fn date_range(item: &Value, start: &str, end: &str) -> String {
    let until = if item.get("isCurrent").and_then(Value::as_bool).unwrap_or(false) {
        "Present"
    } else {
        field(item, end)
    };
    format!("{} to {}", field(item, start), until)
}

pub fn summary_prompt(data: &Value) -> String {
    format!(
        "Generate a brief professional summary for a {} with the following background:\n\n\
         Experience: {}\nEducation: {}\nSkills: {}\n\n\
         Write a 2-3 sentence professional summary.",
        profession(data),
        or_unspecified(&join_field(data, "workExperience", "title")),
        or_unspecified(&join_field(data, "education", "degree")),
        or_unspecified(&skills(data)),
    )
}

pub fn skills_prompt(data: &Value) -> String {
    format!(
        "Suggest 8-10 resume skills for a {} with the following background:\n\n\
         Experience: {}\nCurrent skills: {}\n\n\
         Return only a comma-separated list of skills not already listed.",
        profession(data),
        or_unspecified(&join_field(data, "workExperience", "title")),
        or_unspecified(&skills(data)),
    )
}

pub fn work_experience_prompt(exp: &Value) -> String {
    let description = match field(exp, "description") {
        "" => String::new(),
        d => format!("Current Description: {d}\n"),
    };
    format!(
        "Generate 3-4 professional bullet points describing the responsibilities and \
         achievements for this work experience:\n\n\
         Job Title: {}\nCompany: {}\nDuration: {}\n{description}\n\
         Write bullet points that start with strong action verbs and are specific to \
         the healthcare field.\n\n\
         Return only the bullet points, each starting with \"• \", no additional text.",
        field(exp, "title"),
        field(exp, "company"),
        date_range(exp, "startDate", "endDate"),
    )
}

pub fn education_prompt(edu: &Value) -> String {
    format!(
        "Generate a brief 1-2 sentence description for this education entry:\n\n\
         Degree: {}\nInstitution: {}\nField of Study: {}\nDuration: {}\n\n\
         Highlight its relevance to a healthcare career. \
         Return only the description, no additional formatting.",
        field(edu, "degree"),
        field(edu, "institution"),
        or_unspecified(field(edu, "fieldOfStudy")),
        date_range(edu, "startDate", "endDate"),
    )
}

pub fn certification_prompt(cert: &Value) -> String {
    format!(
        "Generate a brief 1 sentence description for this certification:\n\n\
         Certification: {}\nIssuing Organization: {}\nIssue Date: {}\n\n\
         Explain what skills or knowledge it validates for healthcare professionals. \
         Return only the description, no additional formatting.",
        field(cert, "name"),
        field(cert, "issuingOrg"),
        field(cert, "issueDate"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_prompt_joins_background() {
        let data = json!({
            "profession": "Registered Nurse",
            "workExperience": [{"title": "Staff RN"}, {"title": "Charge Nurse"}],
            "education": [{"degree": "BSN"}],
            "skills": ["Triage", "IV therapy"]
        });
        let prompt = summary_prompt(&data);
        assert!(prompt.contains("for a Registered Nurse"));
        assert!(prompt.contains("Experience: Staff RN, Charge Nurse"));
        assert!(prompt.contains("Education: BSN"));
        assert!(prompt.contains("Skills: Triage, IV therapy"));
    }

    #[test]
    fn test_summary_prompt_defaults() {
        let prompt = summary_prompt(&json!({}));
        assert!(prompt.contains("for a healthcare professional"));
        assert!(prompt.contains("Experience: Not specified"));
        assert!(prompt.contains("Skills: Not specified"));
    }

    #[test]
    fn test_current_role_shows_present() {
        let exp = json!({
            "title": "Staff RN",
            "company": "Mercy",
            "startDate": "2021-03",
            "endDate": "2023-01",
            "isCurrent": true
        });
        let prompt = work_experience_prompt(&exp);
        assert!(prompt.contains("Duration: 2021-03 to Present"));
        assert!(!prompt.contains("Current Description"));
    }
}
