use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::expr::Expr;
use crate::steps::StepId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Boolean,
    Text,
    Email,
    Url,
}

impl FieldKind {
    pub fn label(self) -> &'static str {
        match self {
            FieldKind::Boolean => "boolean",
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Url => "url",
        }
    }

    pub fn is_text(self) -> bool {
        !matches!(self, FieldKind::Boolean)
    }
}

/// When a field must carry a value for its step to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// Required whenever its step is validated.
    Always,
    /// Required only while `visible_if` holds.
    WhenVisible,
    Never,
}

/// One row of the field rule table.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub id: &'static str,
    pub step: StepId,
    pub kind: FieldKind,
    pub title: &'static str,
    /// JSON pointer into the serialized `AnswersRecord`.
    pub pointer: &'static str,
    pub visible_if: Option<Expr>,
    pub required: Requirement,
    /// Message reported when a required field is empty.
    pub message: Option<&'static str>,
}

/// "At least one of" rule over a set of fields, active while `when` holds.
#[derive(Debug, Clone, Serialize)]
pub struct GroupRule {
    pub id: &'static str,
    pub step: StepId,
    pub when: Expr,
    pub members: Vec<&'static str>,
    pub message: &'static str,
}

pub static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("valid email pattern")
});

pub static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("valid url pattern")
});

pub const INVALID_EMAIL: &str = "Invalid email address";
pub const INVALID_URL: &str = "Invalid URL (e.g., https://example.com)";

fn flag(id: &'static str, step: StepId, title: &'static str, pointer: &'static str) -> FieldSpec {
    FieldSpec {
        id,
        step,
        kind: FieldKind::Boolean,
        title,
        pointer,
        visible_if: None,
        required: Requirement::Never,
        message: None,
    }
}

fn text(id: &'static str, step: StepId, title: &'static str, pointer: &'static str) -> FieldSpec {
    FieldSpec {
        kind: FieldKind::Text,
        ..flag(id, step, title, pointer)
    }
}

impl FieldSpec {
    fn of_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    fn visible_when(mut self, expr: Expr) -> Self {
        self.visible_if = Some(expr);
        self
    }

    fn required(mut self, message: &'static str) -> Self {
        self.required = if self.visible_if.is_some() {
            Requirement::WhenVisible
        } else {
            Requirement::Always
        };
        self.message = Some(message);
        self
    }

    /// Regex a non-empty text value must match, with its failure message.
    pub fn format(&self) -> Option<(&'static Regex, &'static str)> {
        match self.kind {
            FieldKind::Email => Some((&*EMAIL_PATTERN, INVALID_EMAIL)),
            FieldKind::Url => Some((&*URL_PATTERN, INVALID_URL)),
            FieldKind::Boolean | FieldKind::Text => None,
        }
    }
}

const COLLECTS: &str = "/collection/collectsPersonalInfo";
const SHARES: &str = "/sharing/sharesWithThirdParties";
const USES_COOKIES: &str = "/cookies/usesCookies";
const INDEFINITE: &str = "/storage/storesDataIndefinitely";

fn on(path: &str) -> Expr {
    Expr::is_set(path)
}

fn both(parent: &str, child: &str) -> Expr {
    Expr::all([Expr::is_set(parent), Expr::is_set(child)])
}

pub static FIELDS: LazyLock<Vec<FieldSpec>> = LazyLock::new(|| {
    use StepId::*;
    vec![
        // general
        text("businessName", General, "Business name", "/general/businessName")
            .required("Business name is required"),
        text("websiteUrl", General, "Website URL", "/general/websiteUrl")
            .of_kind(FieldKind::Url)
            .required("Website URL is required"),
        text("contactEmail", General, "Contact email", "/general/contactEmail")
            .of_kind(FieldKind::Email)
            .required("Contact email is required"),
        text("minimumAge", General, "Minimum user age", "/general/minimumAge"),
        flag(
            "parentalConsentRequired",
            General,
            "Parental consent required for younger users?",
            "/general/parentalConsentRequired",
        ),
        // data collection
        flag(
            "collectsPersonalInfo",
            DataCollection,
            "Do you collect personal information from users?",
            COLLECTS,
        ),
        flag("collectsName", DataCollection, "Name", "/collection/name").visible_when(on(COLLECTS)),
        flag("collectsEmail", DataCollection, "Email address", "/collection/email")
            .visible_when(on(COLLECTS)),
        flag("collectsPhone", DataCollection, "Phone number", "/collection/phone")
            .visible_when(on(COLLECTS)),
        flag(
            "collectsPayment",
            DataCollection,
            "Payment information",
            "/collection/payment",
        )
        .visible_when(on(COLLECTS)),
        flag("collectsLocation", DataCollection, "Location data", "/collection/location")
            .visible_when(on(COLLECTS)),
        flag("collectsIp", DataCollection, "IP address", "/collection/ip")
            .visible_when(on(COLLECTS)),
        flag(
            "collectsCookies",
            DataCollection,
            "Cookies and tracking technologies",
            "/collection/cookies",
        )
        .visible_when(on(COLLECTS)),
        flag("collectsOther", DataCollection, "Other", "/collection/other")
            .visible_when(on(COLLECTS)),
        text(
            "collectsOtherSpecify",
            DataCollection,
            "Other data types",
            "/collection/otherSpecify",
        )
        .visible_when(both(COLLECTS, "/collection/other"))
        .required("Please specify other data types"),
        // data usage
        flag(
            "dataUsagePurposes.userCommunication",
            DataUsage,
            "Communicating with users",
            "/usage/purposes/userCommunication",
        )
        .visible_when(on(COLLECTS)),
        flag(
            "dataUsagePurposes.paymentProcessing",
            DataUsage,
            "Processing payments",
            "/usage/purposes/paymentProcessing",
        )
        .visible_when(on(COLLECTS)),
        flag(
            "dataUsagePurposes.analytics",
            DataUsage,
            "Analytics and performance tracking",
            "/usage/purposes/analytics",
        )
        .visible_when(on(COLLECTS)),
        flag(
            "dataUsagePurposes.serviceImprovement",
            DataUsage,
            "Improving features and user experience",
            "/usage/purposes/serviceImprovement",
        )
        .visible_when(on(COLLECTS)),
        flag(
            "dataUsagePurposes.marketing",
            DataUsage,
            "Marketing and promotional purposes",
            "/usage/purposes/marketing",
        )
        .visible_when(on(COLLECTS)),
        flag(
            "dataUsagePurposes.other",
            DataUsage,
            "Other",
            "/usage/purposes/other",
        )
        .visible_when(on(COLLECTS)),
        text(
            "dataUsageOtherSpecify",
            DataUsage,
            "Other usage",
            "/usage/otherSpecify",
        )
        .visible_when(both(COLLECTS, "/usage/purposes/other"))
        .required("Please specify other usage"),
        // sharing
        flag(
            "sharesWithThirdParties",
            Sharing,
            "Do you share user data with third parties?",
            SHARES,
        ),
        flag(
            "sharesWithAnalytics",
            Sharing,
            "Analytics providers",
            "/sharing/analytics",
        )
        .visible_when(on(SHARES)),
        flag(
            "sharesWithAdvertising",
            Sharing,
            "Advertising networks",
            "/sharing/advertising",
        )
        .visible_when(on(SHARES)),
        flag("sharesWithPayment", Sharing, "Payment processors", "/sharing/payment")
            .visible_when(on(SHARES)),
        flag("sharesWithSocial", Sharing, "Social media platforms", "/sharing/social")
            .visible_when(on(SHARES)),
        flag("sharesWithOther", Sharing, "Other", "/sharing/other").visible_when(on(SHARES)),
        text(
            "sharesWithOtherSpecify",
            Sharing,
            "Other third parties",
            "/sharing/otherSpecify",
        )
        .visible_when(both(SHARES, "/sharing/other"))
        .required("Please specify other third parties"),
        flag(
            "thirdPartiesUseForOwnPurposes",
            Sharing,
            "Do these third parties use the data for their own purposes?",
            "/sharing/thirdPartiesUseForOwnPurposes",
        )
        .visible_when(on(SHARES)),
        text(
            "thirdPartyPurposesSpecify",
            Sharing,
            "Third party purposes",
            "/sharing/thirdPartyPurposesSpecify",
        )
        .visible_when(both(SHARES, "/sharing/thirdPartiesUseForOwnPurposes"))
        .required("Please specify third party purposes"),
        // legal
        flag(
            "providesUserRights",
            Legal,
            "Can users access, correct, or delete their data?",
            "/rights/providesUserRights",
        ),
        text(
            "userRightsProcess",
            Legal,
            "How users exercise these rights",
            "/rights/userRightsProcess",
        )
        .visible_when(on("/rights/providesUserRights"))
        .required("User rights process is required"),
        flag(
            "providesOptOut",
            Legal,
            "Can users opt out of data collection?",
            "/rights/providesOptOut",
        ),
        text("optOutProcess", Legal, "How users opt out", "/rights/optOutProcess")
            .visible_when(on("/rights/providesOptOut"))
            .required("Opt-out process is required"),
        flag(
            "compliesWithGDPR",
            Legal,
            "GDPR (General Data Protection Regulation - EU)",
            "/compliance/gdpr",
        ),
        flag(
            "compliesWithCCPA",
            Legal,
            "CCPA (California Consumer Privacy Act - USA)",
            "/compliance/ccpa",
        ),
        flag("compliesWithOther", Legal, "Other regulations", "/compliance/other"),
        text(
            "compliesWithOtherSpecify",
            Legal,
            "Other regulations",
            "/compliance/otherSpecify",
        )
        .visible_when(on("/compliance/other"))
        .required("Please specify other regulations"),
        // cookies
        flag(
            "usesCookies",
            Cookies,
            "Do you use cookies or similar technologies to track users?",
            USES_COOKIES,
        ),
        flag(
            "cookieTypes.essential",
            Cookies,
            "Essential cookies",
            "/cookies/types/essential",
        )
        .visible_when(on(USES_COOKIES)),
        flag(
            "cookieTypes.functional",
            Cookies,
            "Functional cookies",
            "/cookies/types/functional",
        )
        .visible_when(on(USES_COOKIES)),
        flag(
            "cookieTypes.analytics",
            Cookies,
            "Analytics cookies",
            "/cookies/types/analytics",
        )
        .visible_when(on(USES_COOKIES)),
        flag(
            "cookieTypes.advertising",
            Cookies,
            "Advertising cookies",
            "/cookies/types/advertising",
        )
        .visible_when(on(USES_COOKIES)),
        flag("cookieTypes.other", Cookies, "Other", "/cookies/types/other")
            .visible_when(on(USES_COOKIES)),
        text(
            "cookieOtherSpecify",
            Cookies,
            "Other cookie types",
            "/cookies/otherSpecify",
        )
        .visible_when(both(USES_COOKIES, "/cookies/types/other"))
        .required("Please specify other cookie types"),
        // retention
        text(
            "dataStorageLocation",
            Retention,
            "Where is user data stored?",
            "/storage/dataStorageLocation",
        )
        .required("Data storage location is required"),
        text(
            "securityMeasures",
            Retention,
            "What security measures protect the data?",
            "/storage/securityMeasures",
        )
        .required("Security measures information is required"),
        flag(
            "storesDataIndefinitely",
            Retention,
            "Do you store user data indefinitely?",
            INDEFINITE,
        ),
        text(
            "dataRetentionPeriods.accountData",
            Retention,
            "Account data retention",
            "/storage/retentionPeriods/accountData",
        )
        .visible_when(on(INDEFINITE).negate()),
        text(
            "dataRetentionPeriods.transactionData",
            Retention,
            "Transaction records retention",
            "/storage/retentionPeriods/transactionData",
        )
        .visible_when(on(INDEFINITE).negate()),
        text(
            "dataRetentionPeriods.communicationHistory",
            Retention,
            "Communication history retention",
            "/storage/retentionPeriods/communicationHistory",
        )
        .visible_when(on(INDEFINITE).negate()),
        text(
            "dataRetentionPeriods.analyticsData",
            Retention,
            "Analytics data retention",
            "/storage/retentionPeriods/analyticsData",
        )
        .visible_when(on(INDEFINITE).negate()),
        // update policy
        text(
            "notificationMethod",
            UpdatePolicy,
            "How will you notify users of changes?",
            "/notification/notificationMethod",
        )
        .required("Notification method is required"),
        flag(
            "policyUpdateNotification.email",
            UpdatePolicy,
            "Email",
            "/notification/channels/email",
        ),
        flag(
            "policyUpdateNotification.siteNotice",
            UpdatePolicy,
            "Notice on the site",
            "/notification/channels/siteNotice",
        ),
        flag(
            "policyUpdateNotification.popup",
            UpdatePolicy,
            "Pop-up notification",
            "/notification/channels/popup",
        ),
        flag(
            "policyUpdateNotification.other",
            UpdatePolicy,
            "Other",
            "/notification/channels/other",
        ),
        text(
            "policyUpdateNotificationOther",
            UpdatePolicy,
            "Other notification method",
            "/notification/otherSpecify",
        )
        .visible_when(on("/notification/channels/other"))
        .required("Please specify other notification method"),
        text(
            "gracePeriod",
            UpdatePolicy,
            "Grace period before changes take effect",
            "/notification/gracePeriod",
        ),
        // review
        flag(
            "acknowledgedDisclaimer",
            Review,
            "I understand this policy is not legal advice",
            "/acknowledgedDisclaimer",
        )
        .required("You must acknowledge that this policy is not legal advice"),
    ]
});

pub static GROUP_RULES: LazyLock<Vec<GroupRule>> = LazyLock::new(|| {
    vec![
        GroupRule {
            id: "dataTypes",
            step: StepId::DataCollection,
            when: on(COLLECTS),
            members: vec![
                "collectsName",
                "collectsEmail",
                "collectsPhone",
                "collectsPayment",
                "collectsLocation",
                "collectsIp",
                "collectsCookies",
                "collectsOther",
            ],
            message: "Select at least one type of data you collect",
        },
        GroupRule {
            id: "sharingTypes",
            step: StepId::Sharing,
            when: on(SHARES),
            members: vec![
                "sharesWithAnalytics",
                "sharesWithAdvertising",
                "sharesWithPayment",
                "sharesWithSocial",
                "sharesWithOther",
            ],
            message: "Select at least one type of third party you share data with",
        },
        GroupRule {
            id: "cookieTypes",
            step: StepId::Cookies,
            when: on(USES_COOKIES),
            members: vec![
                "cookieTypes.essential",
                "cookieTypes.functional",
                "cookieTypes.analytics",
                "cookieTypes.advertising",
                "cookieTypes.other",
            ],
            message: "Select at least one type of cookie you use",
        },
        GroupRule {
            id: "dataRetentionPeriods",
            step: StepId::Retention,
            when: on(INDEFINITE).negate(),
            members: vec![
                "dataRetentionPeriods.accountData",
                "dataRetentionPeriods.transactionData",
                "dataRetentionPeriods.communicationHistory",
                "dataRetentionPeriods.analyticsData",
            ],
            message: "Data retention period is required",
        },
    ]
});

pub fn field(id: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.id == id)
}

pub fn fields_for_step(step: StepId) -> impl Iterator<Item = &'static FieldSpec> {
    FIELDS.iter().filter(move |spec| spec.step == step)
}

pub fn group_rules_for_step(step: StepId) -> impl Iterator<Item = &'static GroupRule> {
    GROUP_RULES.iter().filter(move |rule| rule.step == step)
}
