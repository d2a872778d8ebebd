//! Template 3: one-page CV.
//!
//! The only layout with a file upload: the profile photo may be sent as
//! `profile_img_file` or linked via `profile_img_url`, the upload winning.

use serde::Serialize;

use crate::form::FormSubmission;
use crate::pipeline::groups::{collect_groups, GroupEntry, GroupRecord, GroupSpec, SubField};
use crate::pipeline::lists::Delimiter;
use crate::pipeline::skills::{parse_skills, SkillRecord};
use crate::portfolio::{DEFAULT_EMAIL, DEFAULT_GITHUB, DEFAULT_LINKEDIN, DEFAULT_LOCATION, DEFAULT_NAME};
use crate::upload::{StorageError, UploadResolver};

pub const PHOTO_FILE_FIELD: &str = "profile_img_file";
pub const PHOTO_URL_FIELD: &str = "profile_img_url";
pub const FILE_FIELDS: &[&str] = &[PHOTO_FILE_FIELD];

pub const FIELDS: &[&str] = &[
    "name",
    "role",
    "location",
    "email",
    "phone",
    "linkedin",
    "github",
    "summary",
    PHOTO_URL_FIELD,
    "skills_levels",
    "achievements",
];

const FALLBACK_ACHIEVEMENTS: &[&str] = &["Hackathon finalist."];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: String,
    pub role: String,
    pub location: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub summary: String,
    /// Stored upload path, external URL, or `""`.
    pub img: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Experience {
    pub title: String,
    pub org: String,
    pub start: String,
    pub end: String,
    pub bullets: Vec<String>,
}

impl GroupRecord for Experience {
    const GROUP: GroupSpec = GroupSpec {
        prefix: "exp",
        count: 3,
        fields: &[
            SubField::text("title"),
            SubField::text("org"),
            SubField::text("start"),
            SubField::text("end"),
            SubField::list("bullets", Delimiter::Semicolon),
        ],
    };

    fn from_entry(entry: &GroupEntry<'_>) -> Self {
        Self {
            title: entry.field("title").or_else(|| format!("Role {}", entry.index())),
            org: entry.field("org").or("Organization"),
            start: entry.field("start").or(""),
            end: entry.field("end").or(""),
            bullets: entry.list("bullets"),
        }
    }
}

/// Project links; unset ones serialize as `null` and are hidden by the layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectLinks {
    pub live: Option<String>,
    pub code: Option<String>,
    pub report: Option<String>,
    pub docs: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeProject {
    pub name: String,
    pub desc: String,
    pub links: ProjectLinks,
}

impl GroupRecord for ResumeProject {
    const GROUP: GroupSpec = GroupSpec {
        prefix: "proj",
        count: 4,
        fields: &[
            SubField::text("name"),
            SubField::text("desc"),
            SubField::text("live"),
            SubField::text("code"),
            SubField::text("report"),
            SubField::text("docs"),
        ],
    };

    fn from_entry(entry: &GroupEntry<'_>) -> Self {
        Self {
            name: entry.field("name").or_else(|| format!("Project {}", entry.index())),
            desc: entry.field("desc").or(""),
            links: ProjectLinks {
                live: entry.field("live").optional(),
                code: entry.field("code").optional(),
                report: entry.field("report").optional(),
                docs: entry.field("docs").optional(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Education {
    pub degree: String,
    pub inst: String,
    pub year: String,
}

impl GroupRecord for Education {
    const GROUP: GroupSpec = GroupSpec {
        prefix: "edu",
        count: 3,
        fields: &[
            SubField::text("degree"),
            SubField::text("inst"),
            SubField::text("year"),
        ],
    };

    fn from_entry(entry: &GroupEntry<'_>) -> Self {
        Self {
            degree: entry.field("degree").or("Degree"),
            inst: entry.field("inst").or("Institute"),
            year: entry.field("year").or(""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeContext {
    pub profile: Profile,
    pub skills: Vec<SkillRecord>,
    pub experience: Vec<Experience>,
    pub projects: Vec<ResumeProject>,
    pub education: Vec<Education>,
    pub achievements: Vec<String>,
}

/// Resolves the profile photo, then assembles the context. A storage
/// failure aborts before anything is assembled.
pub async fn assemble_with_upload(
    form: &FormSubmission,
    uploads: &UploadResolver,
) -> Result<ResumeContext, StorageError> {
    let img = uploads
        .resolve_image(form.file(PHOTO_FILE_FIELD), form.field(PHOTO_URL_FIELD).trimmed())
        .await?;
    Ok(assemble(form, img))
}

/// Builds the context around an already resolved photo reference.
pub fn assemble(form: &FormSubmission, img: String) -> ResumeContext {
    let profile = Profile {
        name: form.field("name").or(DEFAULT_NAME),
        role: form.field("role").or("ECE Undergrad · Android & Data"),
        location: form.field("location").or(DEFAULT_LOCATION),
        email: form.field("email").or(DEFAULT_EMAIL),
        phone: form.field("phone").or("+91-XXXXXXXXXX"),
        linkedin: form.field("linkedin").or(DEFAULT_LINKEDIN),
        github: form.field("github").or(DEFAULT_GITHUB),
        summary: form.field("summary").or("Short professional summary…"),
        img,
    };

    ResumeContext {
        profile,
        skills: parse_skills(form.field("skills_levels").trimmed()),
        experience: collect_groups(form),
        projects: collect_groups(form),
        education: collect_groups(form),
        achievements: form
            .field("achievements")
            .list_or(Delimiter::Semicolon, FALLBACK_ACHIEVEMENTS),
    }
}
