//! Human-readable rendering of API records for the terminal.

use crate::api::types::{AdviceRecord, AppealRecord, Organization, Stats, Story, User};
use crate::letter::ParsedLetter;

/// Human label for a wire story category; unknown values pass through.
pub fn category_label(category: &str) -> &str {
    match category {
        "domestic_violence" => "Domestic Violence",
        "workplace_discrimination" => "Workplace Discrimination",
        "property_rights" => "Property Rights",
        "inheritance_dispute" => "Inheritance Dispute",
        "child_custody" => "Child Custody",
        "marital_rights" => "Marital Rights",
        other => other,
    }
}

fn date_only(timestamp: Option<&str>) -> &str {
    timestamp.and_then(|t| t.get(..10)).unwrap_or("—")
}

fn outcome_label(outcome: &str) -> &'static str {
    if outcome == "positive" {
        "Positive Outcome"
    } else {
        "Case Resolved"
    }
}

pub fn format_letter(parsed: &ParsedLetter) -> String {
    if !parsed.is_bilingual() {
        return format!("{}\n", parsed.english);
    }
    format!(
        "# English Version\n\n{}\n\n# Amharic Version\n\n{}\n",
        parsed.english, parsed.amharic
    )
}

pub fn format_stories(stories: &[Story], show_moderation: bool) -> String {
    if stories.is_empty() {
        return "No stories found.\n".to_string();
    }
    let mut out = String::new();
    for story in stories {
        out.push_str(&format!("## {} (#{})\n", story.title, story.id));
        let mut meta = vec![category_label(&story.category).to_string()];
        if let Some(ref region) = story.region {
            meta.push(region.clone());
        }
        if show_moderation {
            meta.push(if story.is_approved {
                "approved".to_string()
            } else {
                "pending".to_string()
            });
            if let Some(ref user) = story.user_id {
                meta.push(format!("user #{user}"));
            }
        } else if let Some(ref outcome) = story.outcome {
            meta.push(outcome_label(outcome).to_string());
        }
        if let Some(created) = story.created_at.as_deref() {
            meta.push(date_only(Some(created)).to_string());
        }
        out.push_str(&format!("{}\n\n", meta.join(" · ")));
        out.push_str(story.content.trim());
        out.push_str("\n\n");
    }
    out
}

pub fn format_organizations(orgs: &[Organization], show_status: bool) -> String {
    if orgs.is_empty() {
        return "No support organizations found.\n".to_string();
    }
    let mut out = String::new();
    for org in orgs {
        match org.id {
            Some(id) => out.push_str(&format!("## {} (#{id})\n", org.name)),
            None => out.push_str(&format!("## {}\n", org.name)),
        }
        if show_status && !org.is_active {
            out.push_str("(inactive)\n");
        }
        out.push_str(&format!("- Region: {}\n", org.region));
        if !org.services.is_empty() {
            out.push_str(&format!("- Services: {}\n", org.services.join(", ")));
        }
        out.push_str(&format!("- Contact: {}\n", org.contact));
        out.push_str(&format!("- Address: {}\n", org.address));
        if let Some(ref website) = org.website {
            out.push_str(&format!("- Website: {website}\n"));
        }
        out.push('\n');
    }
    out
}

pub fn format_stats(stats: &Stats) -> String {
    let mut out = String::from("| Metric | Count |\n|--------|-------|\n");
    out.push_str(&format!("| Total stories | {} |\n", stats.total_stories));
    out.push_str(&format!("| Approved stories | {} |\n", stats.approved_stories));
    out.push_str(&format!("| Pending stories | {} |\n", stats.pending_stories));
    out.push_str(&format!("| Legal advice requests | {} |\n", stats.legal_requests));
    out.push_str(&format!("| Appeal letters | {} |\n", stats.appeal_letters));
    out.push_str(&format!(
        "| Active organizations | {} |\n",
        stats.active_organizations
    ));
    out.push_str(&format!("| Users | {} |\n", stats.total_users));
    out.push_str(&format!("| Admins | {} |\n", stats.admin_users));
    out
}

pub fn format_users(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.\n".to_string();
    }
    let mut out = format!("{} users\n\n", users.len());
    for user in users {
        let mut flags = Vec::new();
        if user.is_admin {
            flags.push("admin");
        }
        if !user.is_active {
            flags.push("inactive");
        }
        let suffix = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        out.push_str(&format!(
            "- {} <{}> (#{}){suffix}\n",
            user.username, user.email, user.id
        ));
    }
    out
}

pub fn format_advice_history(records: &[AdviceRecord], with_advice: bool) -> String {
    if records.is_empty() {
        return "No legal advice requests found.\n".to_string();
    }
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "## Request #{} ({})\n",
            record.id,
            date_only(record.created_at.as_deref())
        ));
        if let Some(ref region) = record.region {
            out.push_str(&format!("Region: {region}\n"));
        }
        out.push_str(&format!("\n{}\n\n", record.description.trim()));
        if with_advice
            && let Some(ref advice) = record.advice_generated
        {
            out.push_str("### Advice\n\n");
            out.push_str(advice.trim());
            out.push_str("\n\n");
        }
    }
    out
}

pub fn format_appeal_history(records: &[AppealRecord], with_letters: bool) -> String {
    if records.is_empty() {
        return "No appeal letters found.\n".to_string();
    }
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "## {} — {} (#{}, {})\n",
            record.name,
            record.case_type,
            record.id,
            date_only(record.created_at.as_deref())
        ));
        if let Some(ref location) = record.location {
            out.push_str(&format!("Location: {location}\n"));
        }
        if with_letters {
            if let Some(ref english) = record.english_letter {
                out.push_str(&format!("\n### English Version\n\n{}\n", english.trim()));
            }
            if let Some(ref amharic) = record.amharic_letter
                && !amharic.is_empty()
            {
                out.push_str(&format!("\n### Amharic Version\n\n{}\n", amharic.trim()));
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Id;

    fn story(id: i64, approved: bool) -> Story {
        Story {
            id,
            title: format!("Story {id}"),
            content: "What happened to me.".into(),
            category: "property_rights".into(),
            region: Some("Oromia".into()),
            outcome: Some("positive".into()),
            is_approved: approved,
            created_at: Some("2024-06-01T12:00:00".into()),
            user_id: None,
        }
    }

    #[test]
    fn category_labels_map_known_values() {
        assert_eq!(category_label("domestic_violence"), "Domestic Violence");
        assert_eq!(category_label("something_else"), "something_else");
    }

    #[test]
    fn letter_renders_both_sections() {
        let parsed = ParsedLetter {
            english: "Dear Sir".into(),
            amharic: "ክቡር".into(),
        };
        let text = format_letter(&parsed);
        assert!(text.contains("# English Version"));
        assert!(text.contains("Dear Sir"));
        assert!(text.contains("# Amharic Version"));
        assert!(text.contains("ክቡር"));
    }

    #[test]
    fn letter_without_amharic_renders_plain() {
        let parsed = ParsedLetter {
            english: "just the letter".into(),
            amharic: String::new(),
        };
        let text = format_letter(&parsed);
        assert_eq!(text, "just the letter\n");
        assert!(!text.contains("English Version"));
    }

    #[test]
    fn stories_listing_shows_metadata() {
        let text = format_stories(&[story(1, true)], false);
        assert!(text.contains("## Story 1 (#1)"));
        assert!(text.contains("Property Rights · Oromia · Positive Outcome · 2024-06-01"));
        assert!(text.contains("What happened to me."));
        assert!(!text.contains("approved"));
    }

    #[test]
    fn moderation_view_shows_approval_state_and_submitter() {
        let mut pending = story(2, false);
        pending.user_id = Some(Id::Num(8));
        let text = format_stories(&[story(1, true), pending], true);
        assert!(text.contains("approved"));
        assert!(text.contains("pending · user #8"));
    }

    #[test]
    fn empty_story_list_has_message() {
        assert_eq!(format_stories(&[], false), "No stories found.\n");
    }

    #[test]
    fn organizations_listing_includes_services_and_website() {
        let orgs = vec![Organization {
            id: Some(4),
            name: "EWLA".into(),
            region: "Addis Ababa".into(),
            services: vec!["Legal aid".into(), "Counseling".into()],
            contact: "011 550 1000".into(),
            address: "Kazanchis".into(),
            website: Some("https://ewla.org.et".into()),
            is_active: true,
        }];
        let text = format_organizations(&orgs, false);
        assert!(text.contains("## EWLA (#4)"));
        assert!(text.contains("Services: Legal aid, Counseling"));
        assert!(text.contains("Website: https://ewla.org.et"));
        assert!(!text.contains("inactive"));
    }

    #[test]
    fn inactive_org_flagged_in_admin_view() {
        let orgs = vec![Organization {
            id: Some(1),
            name: "Closed Org".into(),
            region: "Afar".into(),
            services: vec![],
            contact: "-".into(),
            address: "-".into(),
            website: None,
            is_active: false,
        }];
        assert!(format_organizations(&orgs, true).contains("(inactive)"));
    }

    #[test]
    fn stats_table_lists_all_counters() {
        let stats = Stats {
            total_stories: 10,
            approved_stories: 6,
            pending_stories: 4,
            legal_requests: 20,
            appeal_letters: 8,
            active_organizations: 5,
            total_users: 30,
            admin_users: 2,
        };
        let text = format_stats(&stats);
        assert!(text.contains("| Total stories | 10 |"));
        assert!(text.contains("| Pending stories | 4 |"));
        assert!(text.contains("| Admins | 2 |"));
    }

    #[test]
    fn users_listing_flags_admin_and_inactive() {
        let users = vec![
            User {
                id: Id::Num(1),
                username: "admin".into(),
                email: "admin@netsanet.org".into(),
                is_admin: true,
                is_active: true,
            },
            User {
                id: Id::Str("uuid-2".into()),
                username: "meron".into(),
                email: "meron@example.com".into(),
                is_admin: false,
                is_active: false,
            },
        ];
        let text = format_users(&users);
        assert!(text.contains("admin <admin@netsanet.org> (#1) [admin]"));
        assert!(text.contains("meron <meron@example.com> (#uuid-2) [inactive]"));
    }

    #[test]
    fn advice_history_includes_advice_when_requested() {
        let records = vec![AdviceRecord {
            id: 9,
            description: "Dismissed after maternity leave.".into(),
            region: Some("Amhara".into()),
            advice_generated: Some("YOUR RIGHTS:\n…".into()),
            created_at: Some("2024-02-10T09:30:00".into()),
        }];
        let with = format_advice_history(&records, true);
        assert!(with.contains("## Request #9 (2024-02-10)"));
        assert!(with.contains("### Advice"));

        let without = format_advice_history(&records, false);
        assert!(!without.contains("### Advice"));
    }

    #[test]
    fn appeal_history_shows_letters_only_on_request() {
        let records = vec![AppealRecord {
            id: 2,
            name: "Almaz Tadesse".into(),
            case_type: "Property Rights".into(),
            location: Some("Addis Ababa".into()),
            english_letter: Some("Dear Sir".into()),
            amharic_letter: Some("ክቡር".into()),
            created_at: None,
        }];
        let with = format_appeal_history(&records, true);
        assert!(with.contains("Almaz Tadesse — Property Rights (#2, —)"));
        assert!(with.contains("### English Version"));
        assert!(with.contains("### Amharic Version"));

        let without = format_appeal_history(&records, false);
        assert!(!without.contains("### English Version"));
    }
}
