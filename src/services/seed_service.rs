use crate::config::SeedConfig;
use crate::entities::{participant_entity as participants, seed_version_entity as seed_versions};
use crate::error::{AppError, AppResult};
use crate::services::event_service::{find_active_event, insert_event};
use crate::services::exclusion_service::{insert_exclusion, pair_exists};
use crate::models::ParticipantProfile;
use crate::services::participant_service::{
    clean_aliases, insert_participant, load_profiles, replace_aliases,
};
use crate::utils::{names_conflict, normalize_name};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use std::collections::HashMap;

/// 导入结果统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub applied: bool,
    pub participants_created: usize,
    pub participants_updated: usize,
    pub exclusions_created: usize,
    pub event_created: bool,
}

#[derive(Clone)]
pub struct SeedService {
    pool: DatabaseConnection,
}

impl SeedService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 按版本导入初始数据
    ///
    /// - 版本已记录时直接跳过
    /// - 参与者按归一化后的显示名 upsert（别名整体替换），不删除任何已有参与者或抽签结果
    /// - 名字或别名与其他参与者冲突时整体回滚，返回 ConfigError
    /// - 未提供 email 时保留已有值
    /// - 排除规则按名字解析，已存在（任一方向）则跳过
    /// - 没有激活活动时创建配置中的活动
    pub async fn apply_seed(&self, seed: &SeedConfig) -> AppResult<SeedReport> {
        let txn = self.pool.begin().await?;

        let already = seed_versions::Entity::find_by_id(seed.version)
            .one(&txn)
            .await?;
        if already.is_some() {
            log::debug!("Seed version {} already applied", seed.version);
            return Ok(SeedReport::default());
        }

        let mut report = SeedReport {
            applied: true,
            ..Default::default()
        };
        let mut profiles = load_profiles(&txn).await?;
        let mut ids: HashMap<String, i32> = HashMap::new();

        for p in &seed.participants {
            let name = p.name.trim();
            if name.is_empty() {
                return Err(AppError::ConfigError(
                    "Seed participant name must not be empty".to_string(),
                ));
            }
            let key = normalize_name(name);
            let alternative_names = clean_aliases(name, &p.alternative_names);

            let existing = profiles
                .iter()
                .find(|profile| normalize_name(&profile.name) == key)
                .map(|profile| profile.id);
            let candidates = alternative_names.iter().map(String::as_str);
            for candidate in std::iter::once(name).chain(candidates) {
                if names_conflict(&profiles, candidate, existing) {
                    return Err(AppError::ConfigError(format!(
                        "Seed name '{candidate}' is already used by another participant"
                    )));
                }
            }

            let id = match existing {
                Some(id) => {
                    if let Some(email) = &p.email {
                        participants::ActiveModel {
                            id: Set(id),
                            email: Set(Some(email.clone())),
                            ..Default::default()
                        }
                        .update(&txn)
                        .await?;
                    }
                    replace_aliases(&txn, id, &alternative_names).await?;
                    if let Some(profile) = profiles.iter_mut().find(|profile| profile.id == id) {
                        profile.alternative_names = alternative_names;
                    }
                    report.participants_updated += 1;
                    id
                }
                None => {
                    let created =
                        insert_participant(&txn, name, p.email.clone(), &alternative_names)
                            .await?;
                    let id = created.id;
                    profiles.push(ParticipantProfile::from_model(created, alternative_names));
                    report.participants_created += 1;
                    id
                }
            };
            ids.insert(key, id);
        }

        for ex in &seed.exclusions {
            let (Some(&first), Some(&second)) =
                (ids.get(&normalize_name(&ex.first)), ids.get(&normalize_name(&ex.second)))
            else {
                log::warn!(
                    "Skipping seed exclusion {} <-> {}: unknown participant",
                    ex.first,
                    ex.second
                );
                continue;
            };
            if first == second || pair_exists(&txn, first, second).await? {
                continue;
            }
            insert_exclusion(&txn, first, second, ex.reason.clone()).await?;
            report.exclusions_created += 1;
        }

        if find_active_event(&txn).await?.is_none() {
            insert_event(&txn, &seed.event.name, seed.event.year, true).await?;
            report.event_created = true;
        }

        seed_versions::ActiveModel {
            version: Set(seed.version),
            applied_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        log::info!(
            "Seed version {} applied: {} participant(s) created, {} updated, {} exclusion(s), event created: {}",
            seed.version,
            report.participants_created,
            report.participants_updated,
            report.exclusions_created,
            report.event_created
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SeedExclusion, SeedParticipant};
    use crate::database::test_pool;
    use crate::models::CreateParticipantRequest;
    use crate::services::{EventService, ExclusionService, ParticipantService};
    use crate::utils::DrawLocks;
    use std::sync::Arc;

    fn participant(name: &str, alts: &[&str]) -> SeedParticipant {
        SeedParticipant {
            name: name.to_string(),
            email: None,
            alternative_names: alts.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_default_seed_applies_once() {
        let pool = test_pool().await;
        let service = SeedService::new(pool.clone());
        let seed = SeedConfig::default();

        let first = service.apply_seed(&seed).await.unwrap();
        assert!(first.applied);
        assert_eq!(first.participants_created, 5);
        assert!(first.event_created);

        let second = service.apply_seed(&seed).await.unwrap();
        assert!(!second.applied);

        let names = ParticipantService::new(pool.clone(), Arc::new(DrawLocks::new()))
            .list_names().await.unwrap();
        assert_eq!(names, vec!["Anna", "Kasia", "Marek", "Piotr", "Zofia"]);
        assert!(EventService::new(pool).get_active_event().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_new_version_adds_without_wiping() {
        let pool = test_pool().await;
        let service = SeedService::new(pool.clone());
        let mut seed = SeedConfig::default();
        service.apply_seed(&seed).await.unwrap();

        seed.version = 2;
        seed.participants = vec![participant("Anna", &["Ania"]), participant("Tomek", &[])];
        seed.exclusions = vec![
            SeedExclusion {
                first: "Anna".into(),
                second: "Tomek".into(),
                reason: Some("couple".into()),
            },
            SeedExclusion {
                first: "Anna".into(),
                second: "Nobody".into(),
                reason: None,
            },
        ];
        let report = service.apply_seed(&seed).await.unwrap();
        assert_eq!(report.participants_created, 1);
        assert_eq!(report.participants_updated, 1);
        assert_eq!(report.exclusions_created, 1);
        assert!(!report.event_created);

        let participants = ParticipantService::new(pool.clone(), Arc::new(DrawLocks::new()));
        assert_eq!(participants.list_names().await.unwrap().len(), 6);
        let anna = participants.find_by_name("ania").await.unwrap().unwrap();
        assert_eq!(anna.name, "Anna");
        assert_eq!(ExclusionService::new(pool).list_exclusions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_case_only_duplicate_updates_existing() {
        let pool = test_pool().await;
        let service = SeedService::new(pool.clone());
        let mut seed = SeedConfig::default();
        service.apply_seed(&seed).await.unwrap();

        seed.version = 2;
        seed.participants = vec![participant("  anna ", &["Anka"])];
        seed.exclusions = vec![SeedExclusion {
            first: "ANNA".into(),
            second: "kasia".into(),
            reason: None,
        }];
        let report = service.apply_seed(&seed).await.unwrap();
        assert_eq!(report.participants_created, 0);
        assert_eq!(report.participants_updated, 1);
        // kasia 不在本次导入的名单里，规则跳过
        assert_eq!(report.exclusions_created, 0);

        let participants = ParticipantService::new(pool.clone(), Arc::new(DrawLocks::new()));
        let names = participants.list_names().await.unwrap();
        assert_eq!(names, vec!["Anna", "Kasia", "Marek", "Piotr", "Zofia"]);
        let anna = participants.find_by_name("anka").await.unwrap().unwrap();
        assert_eq!(anna.name, "Anna");
    }

    #[tokio::test]
    async fn test_conflicting_names_roll_back() {
        let pool = test_pool().await;
        let service = SeedService::new(pool.clone());
        let mut seed = SeedConfig::default();
        service.apply_seed(&seed).await.unwrap();

        // 新参与者的别名与已有显示名冲突
        seed.version = 2;
        seed.participants = vec![participant("Tomek", &["Kasia"])];
        let err = service.apply_seed(&seed).await.unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));

        // 显示名与同批导入的别名冲突
        seed.version = 3;
        seed.participants = vec![participant("Ola", &["Zosia"]), participant("zosia", &[])];
        let err = service.apply_seed(&seed).await.unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));

        // 已有参与者换上别人的名字作为别名
        seed.version = 4;
        seed.participants = vec![participant("Marek", &["Piotr"])];
        let err = service.apply_seed(&seed).await.unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));

        let participants = ParticipantService::new(pool.clone(), Arc::new(DrawLocks::new()));
        let names = participants.list_names().await.unwrap();
        assert_eq!(names, vec!["Anna", "Kasia", "Marek", "Piotr", "Zofia"]);
        assert!(participants.find_by_name("Tomek").await.unwrap().is_none());
        assert!(participants.find_by_name("Ola").await.unwrap().is_none());
        let kasia = participants.find_by_name("kasia").await.unwrap().unwrap();
        assert_eq!(kasia.name, "Kasia");

        // 失败的版本未被记录，修正后可以再次导入
        seed.participants = vec![participant("Tomek", &["Tomasz"])];
        let report = service.apply_seed(&seed).await.unwrap();
        assert!(report.applied);
        assert_eq!(report.participants_created, 1);
    }

    #[tokio::test]
    async fn test_missing_email_keeps_existing() {
        let pool = test_pool().await;
        let participants = ParticipantService::new(pool.clone(), Arc::new(DrawLocks::new()));
        participants
            .create_participant(CreateParticipantRequest {
                name: "Anna".to_string(),
                email: Some("anna@example.com".to_string()),
                alternative_names: vec![],
            })
            .await
            .unwrap();

        let service = SeedService::new(pool.clone());
        let report = service.apply_seed(&SeedConfig::default()).await.unwrap();
        assert_eq!(report.participants_updated, 1);
        let anna = participants.find_by_name("Anna").await.unwrap().unwrap();
        assert_eq!(anna.email.as_deref(), Some("anna@example.com"));

        let mut seed = SeedConfig::default();
        seed.version = 2;
        seed.participants = vec![SeedParticipant {
            email: Some("anna@example.org".to_string()),
            ..participant("Anna", &[])
        }];
        service.apply_seed(&seed).await.unwrap();
        let anna = participants.find_by_name("Anna").await.unwrap().unwrap();
        assert_eq!(anna.email.as_deref(), Some("anna@example.org"));
    }
}
