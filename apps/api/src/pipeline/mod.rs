// Field normalization shared by every portfolio form: trimming, default
// substitution, list splitting, repeated groups and skill levels.
// Everything here is pure; the upload resolver lives in `crate::upload`.

pub mod fields;
pub mod groups;
pub mod lists;
pub mod skills;
