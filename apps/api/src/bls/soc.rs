//! Healthcare SOC codes (major groups 29 and 31) used by `--healthcare-only`.

pub const HEALTHCARE_SOC_CODES: &[(&str, &str)] = &[
    ("29-1011", "chiropractors"),
    ("29-1021", "dentists-general"),
    ("29-1022", "oral-and-maxillofacial-surgeons"),
    ("29-1023", "orthodontists"),
    ("29-1024", "prosthodontists"),
    ("29-1029", "dentists-all-other-specialists"),
    ("29-1031", "dietitians-and-nutritionists"),
    ("29-1041", "optometrists"),
    ("29-1051", "pharmacists"),
    ("29-1071", "physician-assistants"),
    ("29-1081", "podiatrists"),
    ("29-1122", "occupational-therapists"),
    ("29-1123", "physical-therapists"),
    ("29-1124", "radiation-therapists"),
    ("29-1125", "recreational-therapists"),
    ("29-1126", "respiratory-therapists"),
    ("29-1127", "speech-language-pathologists"),
    ("29-1128", "exercise-physiologists"),
    ("29-1129", "therapists-all-other"),
    ("29-1131", "veterinarians"),
    ("29-1141", "registered-nurses"),
    ("29-1151", "nurse-anesthetists"),
    ("29-1161", "nurse-midwives"),
    ("29-1171", "nurse-practitioners"),
    ("29-1181", "audiologists"),
    ("29-1211", "anesthesiologists"),
    ("29-1212", "cardiologists"),
    ("29-1213", "dermatologists"),
    ("29-1214", "emergency-medicine-physicians"),
    ("29-1215", "family-medicine-physicians"),
    ("29-1216", "general-internal-medicine-physicians"),
    ("29-1217", "neurologists"),
    ("29-1218", "obstetricians-and-gynecologists"),
    ("29-1221", "pediatricians-general"),
    ("29-1222", "physicians-pathologists"),
    ("29-1223", "psychiatrists"),
    ("29-1224", "radiologists"),
    ("29-1229", "physicians-all-other"),
    ("29-1241", "ophthalmologists-except-pediatric"),
    ("29-1242", "orthopedic-surgeons-except-pediatric"),
    ("29-1243", "pediatric-surgeons"),
    ("29-1249", "surgeons-all-other"),
    ("29-1291", "acupuncturists"),
    ("29-1292", "dental-hygienists"),
    ("29-1299", "healthcare-diagnosing-or-treating-practitioners-all-other"),
    ("29-2010", "clinical-laboratory-technologists-and-technicians"),
    ("29-2031", "cardiovascular-technologists-and-technicians"),
    ("29-2032", "diagnostic-medical-sonographers"),
    ("29-2033", "nuclear-medicine-technologists"),
    ("29-2034", "radiologic-technologists-and-technicians"),
    ("29-2035", "magnetic-resonance-imaging-technologists"),
    ("29-2036", "medical-dosimetrists"),
    ("29-2042", "emergency-medical-technicians"),
    ("29-2043", "paramedics"),
    ("29-2051", "dietetic-technicians"),
    ("29-2052", "pharmacy-technicians"),
    ("29-2053", "psychiatric-technicians"),
    ("29-2055", "surgical-technologists"),
    ("29-2056", "veterinary-technologists-and-technicians"),
    ("29-2057", "ophthalmic-medical-technicians"),
    ("29-2061", "licensed-practical-and-licensed-vocational-nurses"),
    ("29-2072", "medical-records-specialists"),
    ("29-2081", "opticians-dispensing"),
    ("29-2091", "orthotists-and-prosthetists"),
    ("29-2092", "hearing-aid-specialists"),
    ("29-2099", "health-technologists-and-technicians-all-other"),
    ("29-9021", "health-information-technologists-and-medical-registrars"),
    ("29-9091", "athletic-trainers"),
    ("29-9092", "genetic-counselors"),
    ("29-9093", "surgical-assistants"),
    ("29-9099", "healthcare-practitioners-and-technical-workers-all-other"),
    ("31-1120", "home-health-and-personal-care-aides"),
    ("31-1131", "nursing-assistants"),
    ("31-1132", "orderlies"),
    ("31-1133", "psychiatric-aides"),
    ("31-2011", "occupational-therapy-assistants"),
    ("31-2012", "occupational-therapy-aides"),
    ("31-2021", "physical-therapist-assistants"),
    ("31-2022", "physical-therapist-aides"),
    ("31-9011", "massage-therapists"),
    ("31-9091", "dental-assistants"),
    ("31-9092", "medical-assistants"),
    ("31-9093", "medical-equipment-preparers"),
    ("31-9094", "medical-transcriptionists"),
    ("31-9095", "pharmacy-aides"),
    ("31-9096", "veterinary-assistants-and-laboratory-animal-caretakers"),
    ("31-9097", "phlebotomists"),
    ("31-9099", "healthcare-support-workers-all-other"),
];

pub fn is_healthcare(occ_code: &str) -> bool {
    HEALTHCARE_SOC_CODES
        .iter()
        .any(|(code, _)| *code == occ_code.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthcare_lookup() {
        assert!(is_healthcare("29-1141"));
        assert!(is_healthcare(" 31-9097 "));
        assert!(!is_healthcare("15-1252"));
    }
}
