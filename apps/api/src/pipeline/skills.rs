use std::num::IntErrorKind;

use serde::Serialize;

use crate::pipeline::lists::{parse_list, Delimiter};

/// Level given to skills written without one, or with an unreadable one.
pub const DEFAULT_SKILL_LEVEL: u8 = 70;

const FALLBACK_SKILLS: &[(&str, u8)] = &[
    ("Android / Compose", 90),
    ("Python / Pandas", 85),
    ("Flask", 80),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillRecord {
    pub name: String,
    /// Always within 0..=100.
    pub level: u8,
}

/// Parses `"Android:90, Python:85"` into skill records.
///
/// Each comma-separated token is split on its first colon. Levels that are
/// not integers fall back to [`DEFAULT_SKILL_LEVEL`]; integers are clamped to
/// `0..=100`. When nothing usable is submitted the fixed three-skill
/// fallback is returned instead.
pub fn parse_skills(raw: &str) -> Vec<SkillRecord> {
    let skills: Vec<SkillRecord> = parse_list(raw, Delimiter::Comma)
        .into_iter()
        .map(|token| match token.split_once(':') {
            Some((name, level)) => SkillRecord {
                name: name.trim().to_string(),
                level: parse_level(level),
            },
            None => SkillRecord {
                name: token,
                level: DEFAULT_SKILL_LEVEL,
            },
        })
        .collect();

    if skills.is_empty() {
        return fallback_skills();
    }
    skills
}

pub fn fallback_skills() -> Vec<SkillRecord> {
    FALLBACK_SKILLS
        .iter()
        .map(|&(name, level)| SkillRecord {
            name: name.to_string(),
            level,
        })
        .collect()
}

fn parse_level(text: &str) -> u8 {
    let level = match text.trim().parse::<i64>() {
        Ok(n) => n,
        // out-of-range integers still clamp
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => i64::MAX,
        Err(e) if *e.kind() == IntErrorKind::NegOverflow => i64::MIN,
        Err(_) => return DEFAULT_SKILL_LEVEL,
    };
    level.clamp(0, 100) as u8
}
