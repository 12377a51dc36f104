use crate::answers::AnswersRecord;

/// One fixed section of the policy: its heading and the rule producing its paragraphs.
pub struct SectionBuilder {
    pub heading: &'static str,
    pub build: fn(&AnswersRecord) -> Vec<String>,
}

pub static BUILDERS: [SectionBuilder; 10] = [
    SectionBuilder {
        heading: "Introduction",
        build: introduction,
    },
    SectionBuilder {
        heading: "Information We Collect",
        build: data_collection,
    },
    SectionBuilder {
        heading: "How We Use Your Information",
        build: data_usage,
    },
    SectionBuilder {
        heading: "Disclosure of Your Information",
        build: third_party_sharing,
    },
    SectionBuilder {
        heading: "Data Security and Retention",
        build: data_storage,
    },
    SectionBuilder {
        heading: "Cookies and Tracking Technologies",
        build: cookies,
    },
    SectionBuilder {
        heading: "Your Privacy Rights",
        build: user_rights,
    },
    SectionBuilder {
        heading: "Legal Compliance",
        build: legal_compliance,
    },
    SectionBuilder {
        heading: "Changes to This Privacy Policy",
        build: policy_changes,
    },
    SectionBuilder {
        heading: "Contact Us",
        build: contact,
    },
];

const RETAIN_AS_NEEDED: &str = "personal information only as long as necessary to fulfill the purposes outlined in this policy, unless a longer retention period is required or permitted by law.";

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    non_empty(value).unwrap_or(fallback)
}

/// Closes a sentence with a period unless it already ends with punctuation.
fn sentence(text: impl AsRef<str>) -> String {
    let text = text.as_ref().trim_end();
    if text.ends_with(['.', '!', '?']) {
        text.to_string()
    } else {
        format!("{text}.")
    }
}

/// Phrases for every set flag, in order, plus the free text of an "other" option.
fn enumerate(options: &[(bool, &str)], other: Option<(bool, &str)>) -> Vec<String> {
    let mut phrases: Vec<String> = options
        .iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, phrase)| phrase.to_string())
        .collect();
    if let Some((true, text)) = other
        && let Some(text) = non_empty(text)
    {
        phrases.push(text.trim_end_matches('.').to_string());
    }
    phrases
}

fn contact_phrase(answers: &AnswersRecord) -> String {
    match non_empty(&answers.general.contact_email) {
        Some(email) => format!("contact us at {email}"),
        None => "contact us using the details in the Contact Us section".to_string(),
    }
}

fn introduction(answers: &AnswersRecord) -> Vec<String> {
    let general = &answers.general;
    let business = or_default(&general.business_name, "The operator of this website");
    let site = match non_empty(&general.website_url) {
        Some(url) => format!("our website {url}"),
        None => "our website".to_string(),
    };
    let consent = if general.parental_consent_required {
        " without parental consent"
    } else {
        ""
    };

    vec![
        format!(
            "{business} (\"we\", \"our\", or \"us\") is committed to protecting your privacy. This Privacy Policy explains how we collect, use, disclose, and safeguard your information when you visit {site} (the \"Site\")."
        ),
        "Please read this Privacy Policy carefully. If you do not agree with the terms of this Privacy Policy, please do not access the Site.".to_string(),
        "We reserve the right to make changes to this Privacy Policy at any time and for any reason. We will alert you about any changes by updating the 'Last Updated' date of this Privacy Policy.".to_string(),
        "You are encouraged to periodically review this Privacy Policy to stay informed of updates. You will be deemed to have been made aware of, will be subject to, and will be deemed to have accepted the changes in any revised Privacy Policy by your continued use of the Site after the date such revised Privacy Policy is posted.".to_string(),
        format!(
            "Our Site is not intended for individuals under the age of {}{consent}, and we do not knowingly collect personal data from children.",
            or_default(&general.minimum_age, "13")
        ),
    ]
}

fn data_collection(answers: &AnswersRecord) -> Vec<String> {
    let collection = &answers.collection;
    if !collection.collects_personal_info {
        return vec!["We do not collect personal information from visitors to our Site.".into()];
    }

    let types = enumerate(
        &[
            (collection.name, "Name"),
            (collection.email, "Email address"),
            (collection.phone, "Phone number"),
            (
                collection.payment,
                "Payment information (credit card numbers, billing addresses)",
            ),
            (collection.location, "Location data"),
            (collection.ip, "IP addresses"),
            (
                collection.cookies,
                "Information collected through cookies and similar technologies",
            ),
        ],
        Some((collection.other, collection.other_specify.as_str())),
    );

    let listing = if types.is_empty() {
        "The specific categories of personal information we collect depend on how you interact with our Site.".to_string()
    } else {
        sentence(format!(
            "The personal information we may collect includes: {}",
            types.join(", ")
        ))
    };

    vec![
        "We may collect personal information that you voluntarily provide to us when you use our Site.".into(),
        listing,
    ]
}

fn data_usage(answers: &AnswersRecord) -> Vec<String> {
    if !answers.collection.collects_personal_info {
        return vec![
            "We do not collect personal information, therefore we do not use your data for any purpose.".into(),
        ];
    }

    let purposes = &answers.usage.purposes;
    let uses = enumerate(
        &[
            (
                purposes.user_communication,
                "To communicate with users, including sending emails, notifications, and providing customer support",
            ),
            (
                purposes.payment_processing,
                "To process payments, handle billing, and manage subscriptions",
            ),
            (
                purposes.analytics,
                "To analyze usage patterns and track site performance to improve our services",
            ),
            (
                purposes.service_improvement,
                "To enhance and improve our features, functionality, and user experience",
            ),
            (
                purposes.marketing,
                "To send marketing and promotional communications",
            ),
        ],
        Some((purposes.other, answers.usage.other_specify.as_str())),
    );

    if uses.is_empty() {
        return vec![
            "We collect personal information but have not specified any usage purposes. Please contact us for more information about how we use your data.".into(),
        ];
    }

    vec![
        "We use the information we collect from you for the following purposes:".into(),
        sentence(uses.join("; ")),
    ]
}

fn third_party_sharing(answers: &AnswersRecord) -> Vec<String> {
    let sharing = &answers.sharing;
    if !sharing.shares_with_third_parties {
        return vec![
            "We do not share your personal information with third parties except as required by law.".into(),
        ];
    }

    let channels = enumerate(
        &[
            (
                sharing.analytics,
                "With analytics providers who help us understand how you use our Site",
            ),
            (
                sharing.advertising,
                "With advertising networks to display relevant advertisements to you",
            ),
            (
                sharing.payment,
                "With payment processors to securely process your payments",
            ),
            (
                sharing.social,
                "With social media platforms when you interact with our content on those platforms",
            ),
        ],
        Some((sharing.other, sharing.other_specify.as_str())),
    );

    let mut content =
        vec!["We may share the information we collect in various ways, including:".to_string()];
    if channels.is_empty() {
        content.push(
            "We may share your information with service providers who perform services on our behalf."
                .into(),
        );
    } else {
        content.push(sentence(channels.join("; ")));
    }

    if sharing.third_parties_use_for_own_purposes {
        content.push(sentence(format!(
            "These third parties may use this information for their own purposes, including: {}",
            or_default(
                &sharing.third_party_purposes_specify,
                "various business purposes"
            )
        )));
    } else {
        content.push(
            "These third parties are only permitted to use your information to provide services to us and are not authorized to use your information for their own purposes.".into(),
        );
    }
    content
}

fn data_storage(answers: &AnswersRecord) -> Vec<String> {
    let storage = &answers.storage;
    let mut content = vec![
        sentence(format!(
            "Your information is stored {}",
            or_default(&storage.data_storage_location, "on our secure servers")
        )),
        format!(
            "We use {} to protect your personal information.",
            or_default(
                &storage.security_measures,
                "industry standard security measures"
            )
            .trim_end_matches('.')
        ),
    ];

    if storage.stores_data_indefinitely {
        content.push(
            "We store your personal information for as long as necessary to fulfill the purposes outlined in this Privacy Policy, unless a longer retention period is required or permitted by law.".into(),
        );
    } else {
        let periods = &storage.retention_periods;
        let listed: Vec<String> = [
            ("account data", &periods.account_data),
            ("transaction records", &periods.transaction_data),
            ("communication history", &periods.communication_history),
            ("analytics data", &periods.analytics_data),
        ]
        .into_iter()
        .filter_map(|(label, period)| non_empty(period).map(|period| format!("{label} for {period}")))
        .collect();

        if listed.is_empty() {
            content.push(format!("We retain {RETAIN_AS_NEEDED}"));
        } else {
            content.push(sentence(format!(
                "We retain different types of personal information for varying periods: {}",
                listed.join("; ")
            )));
            content.push(format!(
                "For any data not specifically mentioned above, we retain {RETAIN_AS_NEEDED}"
            ));
        }
    }

    content.push(
        "Despite our best efforts, no data transmission over the internet or data storage system can be guaranteed to be 100% secure. If you have reason to believe that your interaction with us is no longer secure, please immediately notify us.".into(),
    );
    content
}

fn cookies(answers: &AnswersRecord) -> Vec<String> {
    let cookies = &answers.cookies;
    if !cookies.uses_cookies {
        return vec!["We do not use cookies or similar tracking technologies on our Site.".into()];
    }

    let types = enumerate(
        &[
            (
                cookies.types.essential,
                "Essential cookies that are necessary for the Site to function properly",
            ),
            (
                cookies.types.functional,
                "Functional cookies that remember your preferences and customize your experience",
            ),
            (
                cookies.types.analytics,
                "Analytics cookies that help us understand how you use our Site",
            ),
            (
                cookies.types.advertising,
                "Advertising cookies that are used to deliver relevant ads to you",
            ),
        ],
        Some((cookies.types.other, cookies.other_specify.as_str())),
    );

    let listing = if types.is_empty() {
        "The cookies we use depend on the features of our Site that you choose to use.".to_string()
    } else {
        sentence(format!(
            "We use the following types of cookies: {}",
            types.join("; ")
        ))
    };

    vec![
        "We use cookies and similar tracking technologies to track activity on our Site and hold certain information.".into(),
        "Cookies are files with a small amount of data which may include an anonymous unique identifier. Cookies are sent to your browser from a website and stored on your device.".into(),
        "Where required by law, we obtain your consent before using cookies or similar tracking technologies.".into(),
        listing,
        "You can instruct your browser to refuse all cookies or to indicate when a cookie is being sent. However, if you do not accept cookies, you may not be able to use some portions of our Site.".into(),
    ]
}

fn user_rights(answers: &AnswersRecord) -> Vec<String> {
    let rights = &answers.rights;
    let compliance = &answers.compliance;
    let contact = contact_phrase(answers);
    let mut content = Vec::new();

    if rights.provides_user_rights {
        content.push(
            "You have the right to access, update, or delete your personal information that we have collected.".to_string(),
        );
        let process = match non_empty(&rights.user_rights_process) {
            Some(process) => process.to_string(),
            None => format!("{contact} with the subject line 'Privacy Request'"),
        };
        content.push(sentence(format!(
            "To exercise these rights, you can {process}"
        )));
    }

    let regulations: Vec<&str> = [(compliance.gdpr, "GDPR"), (compliance.ccpa, "CCPA")]
        .into_iter()
        .filter_map(|(enabled, name)| enabled.then_some(name))
        .collect();
    if !regulations.is_empty() {
        content.push(format!(
            "To exercise any of your rights under the {}, please {contact} with the subject line 'Privacy Request'.",
            regulations.join(" or ")
        ));
    }

    if rights.provides_opt_out {
        content.push(sentence(format!(
            "You may opt-out of certain data collection and use by {}",
            or_default(&rights.opt_out_process, "contacting us")
        )));
    }

    if content.is_empty() {
        content.push(format!(
            "If you have any questions about your personal information, please {contact}."
        ));
    }
    content
}

fn legal_compliance(answers: &AnswersRecord) -> Vec<String> {
    let compliance = &answers.compliance;
    let mut content = Vec::new();
    let mut regulations = Vec::new();

    if compliance.gdpr {
        regulations.push("GDPR".to_string());
        content.push(
            "If you are a resident of the European Economic Area (EEA), you have certain data protection rights under the General Data Protection Regulation (GDPR). We aim to take reasonable steps to allow you to correct, amend, delete, or limit the use of your personal information.".to_string(),
        );
        content.push(
            "Under the GDPR, you have the right to: access, rectify, or erase your personal data; restrict or object to processing of your personal data; and data portability. You also have the right to withdraw consent at any time where we relied on your consent to process your personal information.".to_string(),
        );
    }

    if compliance.ccpa {
        regulations.push("CCPA".to_string());
        content.push(
            "If you are a resident of California, you have specific rights regarding your personal information under the California Consumer Privacy Act (CCPA). You have the right to request that we disclose certain information to you about our collection and use of your personal information over the past 12 months.".to_string(),
        );
        content.push(
            "Under the CCPA, you have the right to: know what personal information is being collected about you; know whether your personal information is sold or disclosed and to whom; say no to the sale of personal information; access your personal information; and equal service and price, even if you exercise your privacy rights.".to_string(),
        );
    }

    if compliance.other {
        let name = or_default(
            &compliance.other_specify,
            "other applicable privacy regulations",
        )
        .trim_end_matches('.')
        .to_string();
        content.push(format!(
            "We also comply with {name} and will respect the rights granted to you under these regulations."
        ));
        regulations.push(name);
    }

    if regulations.is_empty() {
        content.push(
            "We comply with all applicable privacy laws and regulations in the jurisdictions where we operate.".to_string(),
        );
    } else {
        content.insert(
            0,
            format!(
                "Our privacy practices comply with the following regulations: {}.",
                regulations.join(", ")
            ),
        );
    }
    content
}

fn policy_changes(answers: &AnswersRecord) -> Vec<String> {
    let notification = &answers.notification;
    let mut content = vec![sentence(format!(
        "We may update our Privacy Policy from time to time. We will notify you of any changes by {}",
        or_default(
            &notification.notification_method,
            "posting the new Privacy Policy on this page"
        )
    ))];

    let channels = enumerate(
        &[
            (notification.channels.email, "email (if you've provided it)"),
            (
                notification.channels.site_notice,
                "a prominent notice on our Site",
            ),
            (notification.channels.popup, "a pop-up notification"),
        ],
        Some((notification.channels.other, notification.other_specify.as_str())),
    );
    if !channels.is_empty() {
        content.push(format!(
            "We will inform you about significant changes via {}.",
            channels.join(" or ")
        ));
    }

    let effective = match non_empty(&notification.grace_period) {
        Some(grace) => format!("after a grace period of {grace}"),
        None => "immediately upon posting".to_string(),
    };
    content.push(sentence(format!(
        "Changes to this Privacy Policy will take effect {effective}"
    )));
    content
}

fn contact(answers: &AnswersRecord) -> Vec<String> {
    let general = &answers.general;
    let mut content =
        vec!["If you have any questions about this Privacy Policy, please contact us at:".to_string()];
    let details: Vec<String> = [
        &general.business_name,
        &general.website_url,
        &general.contact_email,
    ]
    .into_iter()
    .filter_map(|line| non_empty(line).map(str::to_string))
    .collect();

    if details.is_empty() {
        content.push("The contact details published on our Site.".to_string());
    } else {
        content.extend(details);
    }
    content
}
