//! Plain-text projection of a resume record, used as AI prompt context.

use crate::models::resume::{present, ResumeRecord};

use super::evaluator::strip_list_marker;

/// Flattens `record` into plain text with a fixed section order.
///
/// Optional links only appear when set. Empty optional sections keep their
/// header with no body.
pub fn to_plain_text(record: &ResumeRecord) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(record.full_name.clone());
    let mut contact = format!("{} | {}", record.email, record.phone);
    if let Some(location) = present(&record.location) {
        contact.push_str(&format!(" | {location}"));
    }
    lines.push(contact);

    for (label, value) in [
        ("Website", &record.website),
        ("LinkedIn", &record.linkedin),
        ("GitHub", &record.github),
    ] {
        if let Some(value) = present(value) {
            lines.push(format!("{label}: {value}"));
        }
    }

    section(&mut lines, "Summary");
    lines.push(record.summary.clone());

    section(&mut lines, "Experience");
    for (i, exp) in record.experience.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!(
            "{} at {} ({} - {})",
            exp.title, exp.company, exp.start_date, exp.end_date
        ));
        lines.push(exp.location.clone());
        lines.push("Responsibilities:".to_string());
        lines.extend(
            exp.responsibilities
                .iter()
                .map(|r| format!("- {}", strip_list_marker(r.trim()))),
        );
    }

    section(&mut lines, "Projects");
    for (i, project) in record.projects.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        match present(&project.url) {
            Some(url) => lines.push(format!("{} ({url})", project.name)),
            None => lines.push(project.name.clone()),
        }
        if let Some(tech) = present(&project.technologies) {
            lines.push(format!("Technologies: {tech}"));
        }
        lines.push(format!("Description: {}", project.description));
    }

    section(&mut lines, "Education");
    for (i, edu) in record.education.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!(
            "{} from {} ({})",
            edu.degree, edu.institution, edu.graduation_date
        ));
        lines.push(edu.location.clone());
    }

    section(&mut lines, "Certifications");
    for cert in &record.certifications {
        let mut line = cert.name.clone();
        if let Some(issuer) = present(&cert.issuer) {
            line.push_str(&format!(" from {issuer}"));
        }
        if let Some(date) = present(&cert.date) {
            line.push_str(&format!(" ({date})"));
        }
        lines.push(line);
        if let Some(url) = present(&cert.url) {
            lines.push(format!("Verify: {url}"));
        }
    }

    section(&mut lines, "Skills");
    lines.push(record.skills.clone());

    lines.join("\n")
}

fn section(lines: &mut Vec<String>, header: &str) {
    lines.push(String::new());
    lines.push(format!("{header}:"));
}
