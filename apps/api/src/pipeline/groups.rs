//! Repeated groups: index-suffixed field sets (`project1_title`,
//! `project2_title`, ...) collapsed into a compacted list of records.

use serde::Serialize;

use crate::form::FormSubmission;
use crate::pipeline::fields::Field;
use crate::pipeline::lists::Delimiter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubFieldKind {
    Text,
    List(Delimiter),
}

/// One sub-field of a repeated group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubField {
    pub name: &'static str,
    pub kind: SubFieldKind,
}

impl SubField {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: SubFieldKind::Text,
        }
    }

    pub const fn list(name: &'static str, delimiter: Delimiter) -> Self {
        Self {
            name,
            kind: SubFieldKind::List(delimiter),
        }
    }
}

/// Fixed schema of a repeated group: indices `1..=count`, each reading
/// `{prefix}{index}_{sub-field}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupSpec {
    pub prefix: &'static str,
    pub count: usize,
    pub fields: &'static [SubField],
}

impl GroupSpec {
    pub fn key(&self, index: usize, field: &str) -> String {
        format!("{}{}_{}", self.prefix, index, field)
    }

    /// Entries with at least one non-empty sub-field, in index order.
    pub fn entries<'a>(&'a self, form: &'a FormSubmission) -> Vec<GroupEntry<'a>> {
        (1..=self.count)
            .map(|index| GroupEntry {
                index,
                spec: self,
                form,
            })
            .filter(|entry| !entry.is_blank())
            .collect()
    }
}

/// The sub-fields of one index of a group.
#[derive(Debug, Clone, Copy)]
pub struct GroupEntry<'a> {
    index: usize,
    spec: &'a GroupSpec,
    form: &'a FormSubmission,
}

impl<'a> GroupEntry<'a> {
    /// 1-based index as written in the form, not the position in the output.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn field(&self, name: &str) -> Field<'a> {
        self.form.field(&self.spec.key(self.index, name))
    }

    /// Parsed list sub-field. Sub-fields not declared as lists split on commas.
    pub fn list(&self, name: &str) -> Vec<String> {
        let delimiter = self
            .spec
            .fields
            .iter()
            .find_map(|f| match f.kind {
                SubFieldKind::List(d) if f.name == name => Some(d),
                _ => None,
            })
            .unwrap_or(Delimiter::Comma);
        self.field(name).list(delimiter)
    }

    /// True when every sub-field is empty. A list counts as empty when it
    /// parses to no items, so `" ; "` does not produce a record.
    pub fn is_blank(&self) -> bool {
        self.spec.fields.iter().all(|sub| match sub.kind {
            SubFieldKind::Text => self.field(sub.name).is_empty(),
            SubFieldKind::List(d) => self.field(sub.name).list(d).is_empty(),
        })
    }
}

/// A record built from one non-blank group entry, defaults applied.
pub trait GroupRecord: Sized {
    const GROUP: GroupSpec;

    fn from_entry(entry: &GroupEntry<'_>) -> Self;
}

/// Collects every non-blank index of `R::GROUP` into records.
pub fn collect_groups<R: GroupRecord>(form: &FormSubmission) -> Vec<R> {
    let spec = R::GROUP;
    spec.entries(form).iter().map(R::from_entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::test_support::form;

    #[derive(Debug, PartialEq)]
    struct Talk {
        title: String,
        venue: String,
        slides: Vec<String>,
    }

    impl GroupRecord for Talk {
        const GROUP: GroupSpec = GroupSpec {
            prefix: "talk",
            count: 4,
            fields: &[
                SubField::text("title"),
                SubField::text("venue"),
                SubField::list("slides", Delimiter::Semicolon),
            ],
        };

        fn from_entry(entry: &GroupEntry<'_>) -> Self {
            Talk {
                title: entry.field("title").or_else(|| format!("Talk {}", entry.index())),
                venue: entry.field("venue").or("Meetup"),
                slides: entry.list("slides"),
            }
        }
    }

    #[test]
    fn test_all_empty_submission_yields_nothing() {
        assert!(collect_groups::<Talk>(&form(&[])).is_empty());
        let blanks = form(&[("talk1_title", "  "), ("talk2_slides", " ; ;"), ("talk3_venue", "")]);
        assert!(collect_groups::<Talk>(&blanks).is_empty());
    }

    #[test]
    fn test_gaps_are_compacted_and_defaults_use_index() {
        let talks = collect_groups::<Talk>(&form(&[
            ("talk2_venue", "RustConf"),
            ("talk4_title", "Zero-copy parsing"),
            ("talk4_slides", "intro; nom; winnow"),
        ]));

        assert_eq!(
            talks,
            vec![
                Talk {
                    title: "Talk 2".into(),
                    venue: "RustConf".into(),
                    slides: vec![],
                },
                Talk {
                    title: "Zero-copy parsing".into(),
                    venue: "Meetup".into(),
                    slides: vec!["intro".into(), "nom".into(), "winnow".into()],
                },
            ]
        );
    }

    #[test]
    fn test_indices_beyond_count_are_ignored() {
        let talks = collect_groups::<Talk>(&form(&[("talk5_title", "Too many"), ("talk0_title", "Too few")]));
        assert!(talks.is_empty());
    }

    #[test]
    fn test_key_format() {
        assert_eq!(Talk::GROUP.key(3, "venue"), "talk3_venue");
    }
}
