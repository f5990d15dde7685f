use regex::Regex;
use std::sync::OnceLock;

use crate::models::ParticipantProfile;

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// 名字归一化：去除首尾空白、合并连续空白、转小写
pub fn normalize_name(name: &str) -> String {
    whitespace()
        .replace_all(name.trim(), " ")
        .to_lowercase()
}

/// 按显示名或别名查找参与者（大小写不敏感）
///
/// 显示名匹配优先于别名匹配；同级多个命中时取 id 最小者。
pub fn match_participant<'a>(
    participants: &'a [ParticipantProfile],
    query: &str,
) -> Option<&'a ParticipantProfile> {
    let wanted = normalize_name(query);
    if wanted.is_empty() {
        return None;
    }

    let by_name = participants
        .iter()
        .filter(|p| normalize_name(&p.name) == wanted)
        .min_by_key(|p| p.id);
    if by_name.is_some() {
        return by_name;
    }

    participants
        .iter()
        .filter(|p| {
            p.alternative_names
                .iter()
                .any(|alt| normalize_name(alt) == wanted)
        })
        .min_by_key(|p| p.id)
}

/// 候选名字是否与其他参与者的显示名或别名冲突
pub fn names_conflict(
    participants: &[ParticipantProfile],
    candidate: &str,
    exclude_id: Option<i32>,
) -> bool {
    let wanted = normalize_name(candidate);
    participants
        .iter()
        .filter(|p| Some(p.id) != exclude_id)
        .any(|p| {
            normalize_name(&p.name) == wanted
                || p.alternative_names.iter().any(|a| normalize_name(a) == wanted)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: i32, name: &str, alts: &[&str]) -> ParticipantProfile {
        ParticipantProfile {
            id,
            name: name.to_string(),
            email: None,
            alternative_names: alts.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn sample() -> Vec<ParticipantProfile> {
        vec![
            profile(1, "Anna", &["Ania", "Anka"]),
            profile(2, "Marek", &[]),
            profile(3, "Kasia", &["Katarzyna"]),
            profile(4, "Piotr", &["Piotrek"]),
            profile(5, "Zofia", &["Zosia"]),
        ]
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Anna  "), "anna");
        assert_eq!(normalize_name("Jan \t  Kowalski"), "jan kowalski");
        assert_eq!(normalize_name("ŁUKASZ"), "łukasz");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn test_match_by_display_name_case_insensitive() {
        let list = sample();
        assert_eq!(match_participant(&list, "anna").map(|p| p.id), Some(1));
        assert_eq!(match_participant(&list, " MAREK ").map(|p| p.id), Some(2));
    }

    #[test]
    fn test_match_by_alias() {
        let list = sample();
        assert_eq!(match_participant(&list, "zosia").map(|p| p.id), Some(5));
        assert_eq!(match_participant(&list, "KATARZYNA").map(|p| p.id), Some(3));
    }

    #[test]
    fn test_unknown_name() {
        let list = sample();
        assert!(match_participant(&list, "Zzz").is_none());
        assert!(match_participant(&list, "").is_none());
    }

    #[test]
    fn test_display_name_wins_over_alias() {
        let list = vec![profile(1, "Ola", &["Kasia"]), profile(7, "Kasia", &[])];
        assert_eq!(match_participant(&list, "kasia").map(|p| p.id), Some(7));
    }

    #[test]
    fn test_names_conflict() {
        let list = sample();
        assert!(names_conflict(&list, "ania", None));
        assert!(names_conflict(&list, "PIOTR", None));
        assert!(!names_conflict(&list, "Ania", Some(1)));
        assert!(!names_conflict(&list, "Tomek", None));
    }
}
