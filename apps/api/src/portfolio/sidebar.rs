//! Template 2: profile sidebar next to a grid of up to six tagged projects.

use serde::Serialize;

use crate::form::FormSubmission;
use crate::pipeline::groups::{collect_groups, GroupEntry, GroupRecord, GroupSpec, SubField};
use crate::pipeline::lists::{sorted_unique, Delimiter};
use crate::portfolio::{
    DEFAULT_EMAIL, DEFAULT_GITHUB, DEFAULT_LINK, DEFAULT_LINKEDIN, DEFAULT_LOCATION, DEFAULT_NAME,
};

pub const FIELDS: &[&str] = &[
    "name",
    "headline",
    "profile_img",
    "email",
    "location",
    "linkedin",
    "github",
    "resume_url",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridProject {
    pub title: String,
    pub desc: String,
    pub img: String,
    pub live: String,
    pub code: String,
    pub tags: Vec<String>,
}

impl GroupRecord for GridProject {
    const GROUP: GroupSpec = GroupSpec {
        prefix: "project",
        count: 6,
        fields: &[
            SubField::text("title"),
            SubField::text("desc"),
            SubField::text("img"),
            SubField::text("live"),
            SubField::text("code"),
            SubField::list("tags", Delimiter::Comma),
        ],
    };

    fn from_entry(entry: &GroupEntry<'_>) -> Self {
        Self {
            title: entry.field("title").or_else(|| format!("Project {}", entry.index())),
            desc: entry.field("desc").or(""),
            img: entry.field("img").or(""),
            live: entry.field("live").or(DEFAULT_LINK),
            code: entry.field("code").or(DEFAULT_LINK),
            tags: entry.list("tags"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarContact {
    pub email: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub resume_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarContext {
    pub name: String,
    pub headline: String,
    pub profile_img: String,
    pub contact: SidebarContact,
    pub projects: Vec<GridProject>,
    /// Every tag used by any project, sorted and deduplicated, for the filter bar.
    pub all_tags: Vec<String>,
    /// Active filter. Rendering from the form never selects one.
    pub selected_tag: Option<String>,
}

pub fn assemble(form: &FormSubmission) -> SidebarContext {
    let projects = collect_groups::<GridProject>(form);
    let all_tags = sorted_unique(projects.iter().flat_map(|p| p.tags.iter()));

    SidebarContext {
        name: form.field("name").or(DEFAULT_NAME),
        headline: form.field("headline").or("ECE · Android · Data"),
        profile_img: form.field("profile_img").or(""),
        contact: SidebarContact {
            email: form.field("email").or(DEFAULT_EMAIL),
            location: form.field("location").or(DEFAULT_LOCATION),
            linkedin: form.field("linkedin").or(DEFAULT_LINKEDIN),
            github: form.field("github").or(DEFAULT_GITHUB),
            resume_url: form.field("resume_url").or(DEFAULT_LINK),
        },
        projects,
        all_tags,
        selected_tag: None,
    }
}
