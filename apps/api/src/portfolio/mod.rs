// Portfolio templates: one context assembler per layout, plus the catalog
// and form schemas served on the GET pages.

pub mod handlers;
pub mod resume;
pub mod showcase;
pub mod sidebar;

use serde::Serialize;

use crate::pipeline::groups::{GroupRecord, GroupSpec};

// Fallbacks shared by more than one layout.
pub const DEFAULT_NAME: &str = "Your Name";
pub const DEFAULT_EMAIL: &str = "your.email@example.com";
pub const DEFAULT_LOCATION: &str = "City, Country";
pub const DEFAULT_LINKEDIN: &str = "linkedin.com/in/yourprofile";
pub const DEFAULT_GITHUB: &str = "github.com/yourhandle";
/// Placeholder for links the visitor can still click.
pub const DEFAULT_LINK: &str = "#";

const NO_FILE_FIELDS: &[&str] = &[];

/// The three portfolio layouts, numbered as in their URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    /// Hero banner, about section, project cards.
    Showcase,
    /// Profile sidebar with a tag-filterable project grid.
    Sidebar,
    /// One-page CV with skill bars and an uploadable photo.
    Resume,
}

impl Template {
    pub const ALL: [Template; 3] = [Template::Showcase, Template::Sidebar, Template::Resume];

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Template::Showcase),
            2 => Some(Template::Sidebar),
            3 => Some(Template::Resume),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Template::Showcase => 1,
            Template::Sidebar => 2,
            Template::Resume => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Template::Showcase => "Showcase",
            Template::Sidebar => "Sidebar + Grid",
            Template::Resume => "CV / Resume",
        }
    }

    pub fn form_path(self) -> String {
        format!("/template/{}/form", self.number())
    }

    pub fn form_view(self) -> String {
        format!("template{}_form.html", self.number())
    }

    pub fn portfolio_view(self) -> String {
        format!("portfolio_template{}.html", self.number())
    }

    /// Fields the GET form offers, derived from the same schemas the
    /// assemblers read.
    pub fn form_schema(self) -> FormSchema {
        let (fields, files, groups): (&[&str], &[&str], Vec<GroupSpec>) = match self {
            Template::Showcase => (
                showcase::FIELDS,
                NO_FILE_FIELDS,
                vec![showcase::ShowcaseProject::GROUP],
            ),
            Template::Sidebar => (
                sidebar::FIELDS,
                NO_FILE_FIELDS,
                vec![sidebar::GridProject::GROUP],
            ),
            Template::Resume => (
                resume::FIELDS,
                resume::FILE_FIELDS,
                vec![
                    resume::Experience::GROUP,
                    resume::ResumeProject::GROUP,
                    resume::Education::GROUP,
                ],
            ),
        };
        FormSchema {
            template: self,
            action: self.form_path(),
            fields: fields.to_vec(),
            file_fields: files.to_vec(),
            groups,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FormSchema {
    pub template: Template,
    pub action: String,
    pub fields: Vec<&'static str>,
    pub file_fields: Vec<&'static str>,
    pub groups: Vec<GroupSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub number: u8,
    pub template: Template,
    pub title: &'static str,
    pub form_url: String,
}

pub fn catalog() -> Vec<CatalogEntry> {
    Template::ALL
        .iter()
        .map(|&t| CatalogEntry {
            number: t.number(),
            template: t,
            title: t.title(),
            form_url: t.form_path(),
        })
        .collect()
}
