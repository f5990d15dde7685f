use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use thiserror::Error;

/// 默认最大尝试次数
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("Need at least 2 participants to perform draw, got {count}")]
    InsufficientParticipants { count: usize },

    #[error(
        "Could not find valid draw after {attempts} attempts, exclusion rules may be too restrictive"
    )]
    InfeasibleExclusions { attempts: usize },

    #[error("Participant appears more than once in the draw input")]
    DuplicateParticipant,
}

/// 一条抽签结果：giver 给 recipient 准备礼物
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawPair<T> {
    pub giver: T,
    pub recipient: T,
}

/// 使用线程随机数生成一次抽签
pub fn generate_assignment<T>(
    participants: &[T],
    exclusions: &[(T, T)],
    max_attempts: usize,
) -> Result<Vec<DrawPair<T>>, DrawError>
where
    T: Eq + Hash + Clone,
{
    let mut rng = rand::thread_rng();
    generate_assignment_with_rng(participants, exclusions, max_attempts, &mut rng)
}

/// 拒绝采样:
/// 1. 对下标 [0..N) 做均匀洗牌 (Fisher-Yates)
/// 2. 检查无人抽到自己、无人抽到被排除的对象
/// 3. 不满足则重试，超过 max_attempts 次返回 InfeasibleExclusions
///
/// 成功时结果按 participants 顺序返回，收礼人集合与送礼人集合相同
pub fn generate_assignment_with_rng<T, R>(
    participants: &[T],
    exclusions: &[(T, T)],
    max_attempts: usize,
    rng: &mut R,
) -> Result<Vec<DrawPair<T>>, DrawError>
where
    T: Eq + Hash + Clone,
    R: Rng + ?Sized,
{
    let n = participants.len();
    if n < 2 {
        return Err(DrawError::InsufficientParticipants { count: n });
    }

    let excluded = build_exclusion_map(participants, exclusions)?;
    let mut shuffled: Vec<usize> = (0..n).collect();

    for attempt in 1..=max_attempts {
        shuffled.shuffle(rng);
        if is_valid_permutation(&shuffled, &excluded) {
            log::info!("Draw for {n} participants found after {attempt} attempt(s)");
            return Ok(participants
                .iter()
                .zip(shuffled.iter())
                .map(|(giver, &r)| DrawPair {
                    giver: giver.clone(),
                    recipient: participants[r].clone(),
                })
                .collect());
        }
    }

    let blocked = blocked_participants(&excluded);
    if !blocked.is_empty() {
        log::warn!(
            "{} participant(s) have every other participant excluded: indices {:?}",
            blocked.len(),
            blocked
        );
    }

    Err(DrawError::InfeasibleExclusions {
        attempts: max_attempts,
    })
}

/// 构建排除邻接表：下标 -> 不可抽中的下标集合（双向插入）
///
/// 引用了不在 participants 中的 id 的规则会被忽略；自身配对同样忽略，
/// 因为“不能抽到自己”已由错排约束保证。
pub fn build_exclusion_map<T>(
    participants: &[T],
    exclusions: &[(T, T)],
) -> Result<Vec<HashSet<usize>>, DrawError>
where
    T: Eq + Hash,
{
    let mut index: HashMap<&T, usize> = HashMap::with_capacity(participants.len());
    for (i, p) in participants.iter().enumerate() {
        if index.insert(p, i).is_some() {
            return Err(DrawError::DuplicateParticipant);
        }
    }

    let mut excluded = vec![HashSet::new(); participants.len()];
    for (a, b) in exclusions {
        let (Some(&i), Some(&j)) = (index.get(a), index.get(b)) else {
            continue;
        };
        if i == j {
            continue;
        }
        excluded[i].insert(j);
        excluded[j].insert(i);
    }

    Ok(excluded)
}

/// shuffled[i] 是下标 i 的收礼人
pub fn is_valid_permutation(shuffled: &[usize], excluded: &[HashSet<usize>]) -> bool {
    shuffled
        .iter()
        .enumerate()
        .all(|(i, &r)| r != i && !excluded[i].contains(&r))
}

/// 所有其他人都被排除的下标（必然无解），仅用于日志诊断
pub fn blocked_participants(excluded: &[HashSet<usize>]) -> Vec<usize> {
    let n = excluded.len();
    excluded
        .iter()
        .enumerate()
        .filter(|(_, set)| set.len() + 1 >= n)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn assert_valid(pairs: &[DrawPair<&str>], participants: &[&str], exclusions: &[(&str, &str)]) {
        assert_eq!(pairs.len(), participants.len());

        let givers: Vec<&str> = pairs.iter().map(|p| p.giver).collect();
        assert_eq!(givers, participants);

        let mut recipients: Vec<&str> = pairs.iter().map(|p| p.recipient).collect();
        recipients.sort();
        let mut expected = participants.to_vec();
        expected.sort();
        assert_eq!(recipients, expected);

        for pair in pairs {
            assert_ne!(pair.giver, pair.recipient);
            for (a, b) in exclusions {
                assert!(!(pair.giver == *a && pair.recipient == *b));
                assert!(!(pair.giver == *b && pair.recipient == *a));
            }
        }
    }

    #[test]
    fn test_two_participants_swap() {
        let pairs = generate_assignment(&["A", "B"], &[], DEFAULT_MAX_ATTEMPTS).unwrap();
        assert_eq!(
            pairs,
            vec![
                DrawPair {
                    giver: "A",
                    recipient: "B",
                },
                DrawPair {
                    giver: "B",
                    recipient: "A",
                },
            ]
        );
    }

    #[test]
    fn test_five_names_form_derangement() {
        let names = ["Anna", "Marek", "Kasia", "Piotr", "Zofia"];
        for _ in 0..200 {
            let pairs = generate_assignment(&names, &[], DEFAULT_MAX_ATTEMPTS).unwrap();
            assert_valid(&pairs, &names, &[]);
            let anna = pairs.iter().find(|p| p.giver == "Anna").unwrap();
            assert!(["Marek", "Kasia", "Piotr", "Zofia"].contains(&anna.recipient));
        }
    }

    #[test]
    fn test_empty_exclusions_always_succeed() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 2..=12 {
            let ids: Vec<u32> = (0..n).collect();
            for _ in 0..20 {
                let pairs =
                    generate_assignment_with_rng(&ids, &[], DEFAULT_MAX_ATTEMPTS, &mut rng)
                        .unwrap();
                assert!(pairs.iter().all(|p| p.giver != p.recipient));
            }
        }
    }

    #[test]
    fn test_exclusion_is_symmetric() {
        let names = ["Anna", "Marek", "Kasia", "Piotr"];
        // 只写一个方向，两个方向都必须被禁止
        let exclusions = [("Anna", "Marek"), ("Kasia", "Piotr")];
        for _ in 0..200 {
            let pairs = generate_assignment(&names, &exclusions, DEFAULT_MAX_ATTEMPTS).unwrap();
            assert_valid(&pairs, &names, &exclusions);
        }
    }

    #[test]
    fn test_fully_excluded_three_is_infeasible() {
        let names = ["A", "B", "C"];
        let exclusions = [("A", "B"), ("B", "C"), ("A", "C")];
        let err = generate_assignment(&names, &exclusions, DEFAULT_MAX_ATTEMPTS).unwrap_err();
        assert_eq!(err, DrawError::InfeasibleExclusions { attempts: 1000 });
    }

    #[test]
    fn test_attempt_bound_is_respected() {
        let names = ["A", "B", "C", "D"];
        let exclusions = [
            ("A", "B"),
            ("A", "C"),
            ("A", "D"),
            ("B", "C"),
            ("B", "D"),
            ("C", "D"),
        ];
        let err = generate_assignment(&names, &exclusions, 3).unwrap_err();
        assert_eq!(err, DrawError::InfeasibleExclusions { attempts: 3 });
    }

    #[test]
    fn test_insufficient_participants() {
        let empty: [&str; 0] = [];
        assert_eq!(
            generate_assignment(&empty, &[], DEFAULT_MAX_ATTEMPTS).unwrap_err(),
            DrawError::InsufficientParticipants { count: 0 }
        );
        assert_eq!(
            generate_assignment(&["Solo"], &[], DEFAULT_MAX_ATTEMPTS).unwrap_err(),
            DrawError::InsufficientParticipants { count: 1 }
        );
    }

    #[test]
    fn test_unknown_participant_in_exclusion_is_ignored() {
        let names = ["A", "B", "C"];
        let exclusions = [("A", "Ghost"), ("Ghost", "Other"), ("B", "B")];
        let pairs = generate_assignment(&names, &exclusions, DEFAULT_MAX_ATTEMPTS).unwrap();
        assert_valid(&pairs, &names, &[]);
    }

    #[test]
    fn test_duplicate_participant_rejected() {
        let err = generate_assignment(&[1, 2, 2], &[], DEFAULT_MAX_ATTEMPTS).unwrap_err();
        assert_eq!(err, DrawError::DuplicateParticipant);
    }

    #[test]
    fn test_couples_force_unique_solution() {
        // 4 人两对情侣，每人只能抽到另一对中的一人
        let names = ["A", "B", "C", "D"];
        let exclusions = [("A", "B"), ("C", "D")];
        let mut rng = StdRng::seed_from_u64(42);
        let pairs =
            generate_assignment_with_rng(&names, &exclusions, DEFAULT_MAX_ATTEMPTS, &mut rng)
                .unwrap();
        assert_valid(&pairs, &names, &exclusions);
    }

    #[test]
    fn test_exclusion_map_and_blocked() {
        let names = ["A", "B", "C"];
        let map = build_exclusion_map(&names, &[("A", "B"), ("A", "C")]).unwrap();
        assert!(map[0].contains(&1) && map[0].contains(&2));
        assert!(map[1].contains(&0));
        assert!(map[2].contains(&0));
        assert_eq!(blocked_participants(&map), vec![0]);

        assert!(is_valid_permutation(&[1, 2, 0], &vec![HashSet::new(); 3]));
        assert!(!is_valid_permutation(&[0, 2, 1], &vec![HashSet::new(); 3]));
        assert!(!is_valid_permutation(&[1, 2, 0], &map));
    }
}
