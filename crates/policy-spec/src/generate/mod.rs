mod sections;

use chrono::{Local, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::answers::AnswersRecord;

pub use sections::{BUILDERS, SectionBuilder};

/// Source of the "last updated" date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Formats a date as `January 5, 2025`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PolicySection {
    pub heading: String,
    pub content: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPolicy {
    pub title: String,
    pub sections: Vec<PolicySection>,
    pub last_updated: String,
}

const TITLE_PREFIX: &str = "Privacy Policy for ";

impl GeneratedPolicy {
    pub fn section(&self, heading: &str) -> Option<&PolicySection> {
        self.sections
            .iter()
            .find(|section| section.heading.ends_with(heading))
    }
}

/// Builds the policy document from the questionnaire answers.
pub fn generate(answers: &AnswersRecord, clock: &dyn Clock) -> GeneratedPolicy {
    let sections = BUILDERS
        .iter()
        .enumerate()
        .map(|(idx, builder)| PolicySection {
            heading: format!("{}. {}", idx + 1, builder.heading),
            content: (builder.build)(answers),
        })
        .collect::<Vec<_>>();

    let title = format!("{TITLE_PREFIX}{}", answers.general.business_name.trim());

    debug!(sections = sections.len(), "generated policy");
    GeneratedPolicy {
        title,
        sections,
        last_updated: format_long_date(clock.today()),
    }
}

pub fn generate_today(answers: &AnswersRecord) -> GeneratedPolicy {
    generate(answers, &SystemClock)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_date_has_no_padding() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_long_date(date), "January 5, 2025");
        let date = NaiveDate::from_ymd_opt(2024, 11, 28).unwrap();
        assert_eq!(format_long_date(date), "November 28, 2024");
    }
}
