//! Heuristic section extraction.
//!
//! Works on normalized text (lowercase, single spaces). A section starts at the
//! first occurrence of one of its header synonyms and runs to the earliest
//! following stop header, or to the end of the text.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const NO_SKILLS: &str = "No skills found";
pub const NO_EXPERIENCE: &str = "No experience found";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeSections {
    pub skills: String,
    pub experience: String,
}

/// Splits normalized resume text into the sections the analyzer consumes.
pub trait SectionExtractor: Send + Sync {
    fn extract(&self, normalized: &str) -> ResumeSections;
}

struct SectionPattern {
    header: Regex,
    stop: Regex,
    sentinel: &'static str,
}

impl SectionPattern {
    fn new(headers: &[&str], stops: &[&str], sentinel: &'static str) -> Self {
        let header = Regex::new(&format!(r"(?i)(?:{})\s*", headers.join("|")))
            .expect("valid regex literal");
        let stop = Regex::new(&format!(r"(?i)\s*(?:{})", stops.join("|")))
            .expect("valid regex literal");
        Self {
            header,
            stop,
            sentinel,
        }
    }

    fn capture(&self, text: &str) -> String {
        let Some(header) = self.header.find(text) else {
            return self.sentinel.to_string();
        };
        let rest = &text[header.end()..];
        let span = match self.stop.find(rest) {
            Some(stop) => &rest[..stop.start()],
            None => rest,
        };

        let items = split_items(span);
        if items.is_empty() {
            self.sentinel.to_string()
        } else {
            items
        }
    }
}

static SKILLS: LazyLock<SectionPattern> = LazyLock::new(|| {
    SectionPattern::new(
        &[
            "skills",
            "key skills",
            "core competencies",
            "technical skills",
            "areas of expertise",
        ],
        &[
            "experience",
            "work history",
            "education",
            "projects",
            "summary",
            "references",
        ],
        NO_SKILLS,
    )
});

static EXPERIENCE: LazyLock<SectionPattern> = LazyLock::new(|| {
    SectionPattern::new(
        &["experience", "work history", "professional experience"],
        &["education", "references", "projects"],
        NO_EXPERIENCE,
    )
});

static ITEM_DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n•\-–,]").expect("valid regex literal"));

/// Splits on bullets, dashes, commas and newlines; rejoins non-empty items with `, `.
fn split_items(span: &str) -> String {
    ITEM_DELIMITERS
        .split(span)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Lowercases and collapses every whitespace run to a single space.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Default header-synonym heuristic.
pub struct RegexSectionExtractor;

impl SectionExtractor for RegexSectionExtractor {
    fn extract(&self, normalized: &str) -> ResumeSections {
        ResumeSections {
            skills: SKILLS.capture(normalized),
            experience: EXPERIENCE.capture(normalized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections(raw: &str) -> ResumeSections {
        RegexSectionExtractor.extract(&normalize(raw))
    }

    #[test]
    fn test_skills_stop_at_experience_header() {
        let out = sections("Skills\nPython, Go, SQL\nExperience\nAcme Corp - Backend Engineer");
        assert_eq!(out.skills, "python, go, sql");
        assert_eq!(out.experience, "acme corp, backend engineer");
    }

    #[test]
    fn test_no_header_yields_sentinels() {
        let out = sections("Jane Doe\njane@example.com");
        assert_eq!(out.skills, NO_SKILLS);
        assert_eq!(out.experience, NO_EXPERIENCE);
    }

    #[test]
    fn test_bullets_and_dashes_split_items() {
        let out = sections("Technical Skills • Rust • Kubernetes – Terraform - Redis Education BSc");
        assert_eq!(out.skills, "rust, kubernetes, terraform, redis");
    }

    #[test]
    fn test_experience_stops_at_education() {
        let out = sections(
            "Work History\nSoftware Engineer, Initech\nEducation\nBSc Computer Science",
        );
        assert_eq!(out.experience, "software engineer, initech");
    }

    #[test]
    fn test_section_runs_to_end_without_stop_header() {
        let out = sections("Core Competencies: leadership, planning");
        assert_eq!(out.skills, ": leadership, planning");
    }

    #[test]
    fn test_empty_span_yields_sentinel() {
        let out = sections("Skills Experience Intern at Globex");
        assert_eq!(out.skills, NO_SKILLS);
        assert_eq!(out.experience, "intern at globex");
    }

    #[test]
    fn test_first_header_occurrence_wins() {
        let out = sections("Summary: strong skills in Rust. Projects: cache server");
        assert_eq!(out.skills, "in rust.");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  Skills\n\n\tRust   GO "), "skills rust go");
    }
}
