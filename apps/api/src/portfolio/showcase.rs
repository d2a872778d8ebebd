//! Template 1: hero banner, about text, skill chips and up to three project cards.

use serde::Serialize;

use crate::form::FormSubmission;
use crate::pipeline::groups::{collect_groups, GroupEntry, GroupRecord, GroupSpec, SubField};
use crate::pipeline::lists::Delimiter;
use crate::portfolio::{DEFAULT_EMAIL, DEFAULT_LINK, DEFAULT_LINKEDIN, DEFAULT_LOCATION, DEFAULT_NAME};

pub const FIELDS: &[&str] = &[
    "name",
    "tagline",
    "resume_url",
    "hero_img",
    "about_text",
    "skills_csv",
    "email",
    "location",
    "linkedin",
];

const FALLBACK_SKILLS: &[&str] = &["Android", "Flask", "Python"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowcaseProject {
    pub title: String,
    pub desc: String,
    pub live: String,
    pub code: String,
    pub img: String,
}

impl ShowcaseProject {
    /// Card shown when no project was filled in at all.
    fn placeholder() -> Self {
        Self {
            title: "Project 1".to_string(),
            desc: "Description here".to_string(),
            live: DEFAULT_LINK.to_string(),
            code: DEFAULT_LINK.to_string(),
            img: String::new(),
        }
    }
}

impl GroupRecord for ShowcaseProject {
    const GROUP: GroupSpec = GroupSpec {
        prefix: "project",
        count: 3,
        fields: &[
            SubField::text("title"),
            SubField::text("desc"),
            SubField::text("live"),
            SubField::text("code"),
            SubField::text("img"),
        ],
    };

    fn from_entry(entry: &GroupEntry<'_>) -> Self {
        Self {
            title: entry.field("title").or_else(|| format!("Project {}", entry.index())),
            desc: entry.field("desc").or(""),
            live: entry.field("live").or(DEFAULT_LINK),
            code: entry.field("code").or(DEFAULT_LINK),
            img: entry.field("img").or(""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowcaseContact {
    pub email: String,
    pub location: String,
    pub linkedin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowcaseContext {
    pub name: String,
    pub tagline: String,
    pub resume_url: String,
    pub hero_img: String,
    pub about_text: String,
    pub skills: Vec<String>,
    pub projects: Vec<ShowcaseProject>,
    pub contact: ShowcaseContact,
}

pub fn assemble(form: &FormSubmission) -> ShowcaseContext {
    let mut projects = collect_groups::<ShowcaseProject>(form);
    if projects.is_empty() {
        projects.push(ShowcaseProject::placeholder());
    }

    ShowcaseContext {
        name: form.field("name").or(DEFAULT_NAME),
        tagline: form.field("tagline").or("ECE undergrad · Android & Data projects"),
        resume_url: form.field("resume_url").or(DEFAULT_LINK),
        hero_img: form.field("hero_img").or(""),
        about_text: form.field("about_text").or("Short bio about you…"),
        skills: form.field("skills_csv").list_or(Delimiter::Comma, FALLBACK_SKILLS),
        projects,
        contact: ShowcaseContact {
            email: form.field("email").or(DEFAULT_EMAIL),
            location: form.field("location").or(DEFAULT_LOCATION),
            linkedin: form.field("linkedin").or(DEFAULT_LINKEDIN),
        },
    }
}
