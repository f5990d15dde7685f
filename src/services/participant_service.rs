use crate::entities::{
    draw_result_entity as draw_results, exclusion_rule_entity as exclusions,
    participant_alias_entity as aliases, participant_entity as participants,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateParticipantRequest, DeleteParticipantResponse, ParticipantProfile, ParticipantResponse,
};
use crate::services::event_service::find_active_event;
use crate::utils::{DrawLocks, match_participant, names_conflict, normalize_name};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

#[derive(Clone)]
pub struct ParticipantService {
    pool: DatabaseConnection,
    locks: Arc<DrawLocks>,
}

impl ParticipantService {
    pub fn new(pool: DatabaseConnection, locks: Arc<DrawLocks>) -> Self {
        Self { pool, locks }
    }

    /// 所有参与者显示名（排序后）
    pub async fn list_names(&self) -> AppResult<Vec<String>> {
        let mut names: Vec<String> = participants::Entity::find()
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|p| p.name)
            .collect();
        sort_names(&mut names);
        Ok(names)
    }

    /// 参与者列表（管理端，含别名）
    pub async fn list_participants(&self) -> AppResult<Vec<ParticipantResponse>> {
        let list = participants::Entity::find()
            .order_by_asc(participants::Column::Id)
            .all(&self.pool)
            .await?;
        let mut alias_map = load_alias_map(&self.pool).await?;

        Ok(list
            .into_iter()
            .map(|p| {
                let alts = alias_map.remove(&p.id).unwrap_or_default();
                ParticipantResponse::new(p, alts)
            })
            .collect())
    }

    /// 按名字或别名查找参与者
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<ParticipantProfile>> {
        let profiles = load_profiles(&self.pool).await?;
        Ok(match_participant(&profiles, name).cloned())
    }

    /// 新增参与者
    /// - 显示名不能为空，且不能与其他人的显示名/别名冲突
    /// - 别名去重，同样不能冲突
    pub async fn create_participant(
        &self,
        request: CreateParticipantRequest,
    ) -> AppResult<ParticipantResponse> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError(
                "Participant name is required".to_string(),
            ));
        }
        if name.chars().count() > 255 {
            return Err(AppError::ValidationError(
                "Participant name must be at most 255 characters".to_string(),
            ));
        }
        let email = match request.email.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(e) if is_plausible_email(e) => Some(e.to_string()),
            Some(e) => {
                return Err(AppError::ValidationError(format!("Invalid email: {e}")));
            }
        };
        let alternative_names = clean_aliases(&name, &request.alternative_names);

        let txn = self.pool.begin().await?;
        let existing = load_profiles(&txn).await?;
        for candidate in std::iter::once(&name).chain(alternative_names.iter()) {
            if names_conflict(&existing, candidate, None) {
                return Err(AppError::Conflict(format!(
                    "Name '{candidate}' is already used by another participant"
                )));
            }
        }

        let created = insert_participant(&txn, &name, email, &alternative_names).await?;
        txn.commit().await?;

        log::info!("Created participant {} ({})", created.id, created.name);
        Ok(ParticipantResponse::new(created, alternative_names))
    }

    /// 删除参与者（管理操作）
    ///
    /// 先持有当前激活活动及已引用该参与者的活动的抽签锁，再在同一事务内:
    /// 1. 找出抽签结果中涉及该参与者的活动，整体删除这些活动的结果
    ///    (只删单行会留下不完整的配对)
    /// 2. 删除涉及该参与者的排除规则、别名
    /// 3. 删除参与者
    pub async fn delete_participant(
        &self,
        participant_id: i32,
    ) -> AppResult<DeleteParticipantResponse> {
        let mut locked_events = referencing_events(&self.pool, participant_id).await?;
        if let Some(active) = find_active_event(&self.pool).await? {
            locked_events.push(active.id);
        }
        locked_events.sort_unstable();
        locked_events.dedup();
        let mut guards = Vec::with_capacity(locked_events.len());
        for event_id in &locked_events {
            guards.push(self.locks.acquire(*event_id).await);
        }

        let txn = self.pool.begin().await?;

        participants::Entity::find_by_id(participant_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Participant {participant_id} not found")))?;

        let event_ids = referencing_events(&txn, participant_id).await?;
        if !event_ids.is_empty() {
            draw_results::Entity::delete_many()
                .filter(draw_results::Column::EventId.is_in(event_ids.clone()))
                .exec(&txn)
                .await?;
        }

        let exclusions_removed = exclusions::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(exclusions::Column::Participant1Id.eq(participant_id))
                    .add(exclusions::Column::Participant2Id.eq(participant_id)),
            )
            .exec(&txn)
            .await?
            .rows_affected;

        aliases::Entity::delete_many()
            .filter(aliases::Column::ParticipantId.eq(participant_id))
            .exec(&txn)
            .await?;

        participants::Entity::delete_by_id(participant_id)
            .exec(&txn)
            .await?;

        txn.commit().await?;
        drop(guards);

        if !event_ids.is_empty() {
            log::warn!(
                "Participant {participant_id} deleted; draw results invalidated for events {event_ids:?}"
            );
        } else {
            log::info!("Participant {participant_id} deleted");
        }

        Ok(DeleteParticipantResponse {
            id: participant_id,
            exclusions_removed,
            draws_invalidated: event_ids.len() as u64,
        })
    }
}

/// 抽签结果中涉及某参与者（送礼或收礼）的活动
async fn referencing_events<C>(conn: &C, participant_id: i32) -> Result<Vec<i32>, DbErr>
where
    C: ConnectionTrait,
{
    draw_results::Entity::find()
        .select_only()
        .column(draw_results::Column::EventId)
        .distinct()
        .filter(
            Condition::any()
                .add(draw_results::Column::ParticipantId.eq(participant_id))
                .add(draw_results::Column::DrawsForId.eq(participant_id)),
        )
        .into_tuple()
        .all(conn)
        .await
}

/// 读取参与者及别名快照（按 id 升序）
pub(crate) async fn load_profiles<C>(conn: &C) -> Result<Vec<ParticipantProfile>, DbErr>
where
    C: ConnectionTrait,
{
    let list = participants::Entity::find()
        .order_by_asc(participants::Column::Id)
        .all(conn)
        .await?;
    let mut alias_map = load_alias_map(conn).await?;

    Ok(list
        .into_iter()
        .map(|p| {
            let alts = alias_map.remove(&p.id).unwrap_or_default();
            ParticipantProfile::from_model(p, alts)
        })
        .collect())
}

async fn load_alias_map<C>(conn: &C) -> Result<HashMap<i32, Vec<String>>, DbErr>
where
    C: ConnectionTrait,
{
    let rows = aliases::Entity::find()
        .order_by_asc(aliases::Column::Id)
        .all(conn)
        .await?;
    let mut map: HashMap<i32, Vec<String>> = HashMap::new();
    for row in rows {
        map.entry(row.participant_id).or_default().push(row.alias);
    }
    Ok(map)
}

pub(crate) async fn insert_participant<C>(
    conn: &C,
    name: &str,
    email: Option<String>,
    alternative_names: &[String],
) -> Result<participants::Model, DbErr>
where
    C: ConnectionTrait,
{
    let created = participants::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    replace_aliases(conn, created.id, alternative_names).await?;
    Ok(created)
}

/// 覆盖写入某参与者的别名
pub(crate) async fn replace_aliases<C>(
    conn: &C,
    participant_id: i32,
    alternative_names: &[String],
) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    aliases::Entity::delete_many()
        .filter(aliases::Column::ParticipantId.eq(participant_id))
        .exec(conn)
        .await?;

    if alternative_names.is_empty() {
        return Ok(());
    }
    let rows = alternative_names.iter().map(|alias| aliases::ActiveModel {
        participant_id: Set(participant_id),
        alias: Set(alias.clone()),
        ..Default::default()
    });
    aliases::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

/// 别名去空白、去重，并去掉与显示名相同的项
pub(crate) fn clean_aliases(name: &str, raw: &[String]) -> Vec<String> {
    let own = normalize_name(name);
    let mut seen = BTreeSet::new();
    raw.iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .filter(|a| {
            let key = normalize_name(a);
            key != own && seen.insert(key)
        })
        .collect()
}

/// 大小写不敏感排序，相同时按原始字符串
fn sort_names(names: &mut [String]) {
    names.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}
