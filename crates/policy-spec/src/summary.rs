use serde::Serialize;

use crate::answers::AnswersRecord;
use crate::steps::StepId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    pub field: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// Key answers of one topic, with the step its "Edit" link returns to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummarySection {
    pub title: &'static str,
    pub step: StepId,
    pub entries: Vec<SummaryEntry>,
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

fn provided(text: &str) -> String {
    if text.trim().is_empty() {
        "Not provided".to_string()
    } else {
        text.to_string()
    }
}

fn entry(field: &'static str, label: &'static str, value: String) -> SummaryEntry {
    SummaryEntry { field, label, value }
}

/// Groups the answers for the review step. Dependent flags are listed only
/// when their parent flag is set.
pub fn summarize(answers: &AnswersRecord) -> Vec<SummarySection> {
    let general = &answers.general;
    let collection = &answers.collection;
    let sharing = &answers.sharing;
    let compliance = &answers.compliance;

    let mut data = vec![entry(
        "collectsPersonalInfo",
        "Collects Personal Info",
        yes_no(collection.collects_personal_info),
    )];
    if collection.collects_personal_info {
        data.extend([
            entry("collectsName", "Collects Name", yes_no(collection.name)),
            entry("collectsEmail", "Collects Email", yes_no(collection.email)),
            entry("collectsPhone", "Collects Phone", yes_no(collection.phone)),
            entry(
                "collectsPayment",
                "Collects Payment Info",
                yes_no(collection.payment),
            ),
            entry(
                "collectsLocation",
                "Collects Location",
                yes_no(collection.location),
            ),
            entry("collectsIp", "Collects IP", yes_no(collection.ip)),
        ]);
    }

    let mut shares = vec![entry(
        "sharesWithThirdParties",
        "Shares with Third Parties",
        yes_no(sharing.shares_with_third_parties),
    )];
    if sharing.shares_with_third_parties {
        shares.extend([
            entry(
                "sharesWithAnalytics",
                "Shares with Analytics",
                yes_no(sharing.analytics),
            ),
            entry(
                "sharesWithAdvertising",
                "Shares with Advertising",
                yes_no(sharing.advertising),
            ),
            entry(
                "sharesWithPayment",
                "Shares with Payment Processors",
                yes_no(sharing.payment),
            ),
            entry(
                "sharesWithSocial",
                "Shares with Social Media",
                yes_no(sharing.social),
            ),
        ]);
    }

    vec![
        SummarySection {
            title: "General Information",
            step: StepId::General,
            entries: vec![
                entry("businessName", "Business Name", provided(&general.business_name)),
                entry("websiteUrl", "Website URL", provided(&general.website_url)),
                entry("contactEmail", "Contact Email", provided(&general.contact_email)),
            ],
        },
        SummarySection {
            title: "Data Collection",
            step: StepId::DataCollection,
            entries: data,
        },
        SummarySection {
            title: "Data Sharing",
            step: StepId::Sharing,
            entries: shares,
        },
        SummarySection {
            title: "Legal Compliance",
            step: StepId::Legal,
            entries: vec![
                entry("compliesWithGDPR", "GDPR Compliance", yes_no(compliance.gdpr)),
                entry("compliesWithCCPA", "CCPA Compliance", yes_no(compliance.ccpa)),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependent_flags_hidden_until_parent_set() {
        let mut answers = AnswersRecord::default();
        let sections = summarize(&answers);
        assert_eq!(sections[1].entries.len(), 1);
        assert_eq!(sections[0].entries[0].value, "Not provided");

        answers.collection.collects_personal_info = true;
        answers.collection.email = true;
        let sections = summarize(&answers);
        assert_eq!(sections[1].entries.len(), 7);
        let email = sections[1]
            .entries
            .iter()
            .find(|entry| entry.field == "collectsEmail")
            .unwrap();
        assert_eq!(email.value, "Yes");
    }
}
