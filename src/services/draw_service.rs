use crate::entities::{
    draw_result_entity as draw_results, event_entity as events, participant_entity as participants,
};
use crate::error::{AppError, AppResult};
use crate::models::{CheckResultResponse, DrawStatusResponse, ResetDrawResponse};
use crate::services::event_service::find_active_event;
use crate::services::exclusion_service::load_pairs;
use crate::services::participant_service::load_profiles;
use crate::utils::{DrawLocks, generate_assignment, match_participant};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr, TransactionTrait,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct DrawService {
    pool: DatabaseConnection,
    locks: Arc<DrawLocks>,
    max_attempts: usize,
}

impl DrawService {
    pub fn new(pool: DatabaseConnection, locks: Arc<DrawLocks>, max_attempts: usize) -> Self {
        Self {
            pool,
            locks,
            max_attempts,
        }
    }

    /// 查询某人需要给谁准备礼物
    ///
    /// 逻辑:
    /// 1. 校验名字非空
    /// 2. 读取当前激活的活动 (不存在 -> NoActiveEvent)
    /// 3. 按显示名/别名匹配参与者 (不存在 -> ParticipantNotFound)
    /// 4. 确保该活动已抽签 (首次查询时抽签并整体写入)
    /// 5. 返回收礼人显示名 (缺行 -> AssignmentMissing)
    pub async fn check_result(&self, name: &str) -> AppResult<CheckResultResponse> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError("Name is required".to_string()));
        }

        let event = find_active_event(&self.pool)
            .await?
            .ok_or(AppError::NoActiveEvent)?;

        let profiles = load_profiles(&self.pool).await?;
        let participant = match_participant(&profiles, name)
            .ok_or_else(|| AppError::ParticipantNotFound(name.to_string()))?;

        let results = self.ensure_draw(event.id).await?;
        let missing = || AppError::AssignmentMissing {
            event_id: event.id,
            participant_id: participant.id,
        };

        let row = results
            .iter()
            .find(|r| r.participant_id == participant.id)
            .ok_or_else(missing)?;

        let recipient = participants::Entity::find_by_id(row.draws_for_id)
            .one(&self.pool)
            .await?
            .ok_or_else(missing)?;

        Ok(CheckResultResponse {
            draws_for: recipient.name,
        })
    }

    /// 确保活动已有抽签结果，没有则抽签一次
    ///
    /// 同一活动的生成与写入由 DrawLocks 串行化；加锁后再读一次，
    /// 先到者写入，后到者直接读取。跨进程的竞争由
    /// (event_id, participant_id) 唯一索引兜底：写入失败方回滚后重新读取。
    pub async fn ensure_draw(&self, event_id: i32) -> AppResult<Vec<draw_results::Model>> {
        let results = self.results_for_event(event_id).await?;
        if !results.is_empty() {
            return Ok(results);
        }

        let _guard = self.locks.acquire(event_id).await;

        let results = self.results_for_event(event_id).await?;
        if !results.is_empty() {
            log::debug!("Draw for event {event_id} was completed by a concurrent request");
            return Ok(results);
        }

        match self.perform_draw(event_id).await {
            Ok(rows) => Ok(rows),
            Err(err) if is_unique_violation(&err) => {
                log::debug!("Lost draw race for event {event_id}, reloading persisted result");
                let rows = self.results_for_event(event_id).await?;
                if rows.is_empty() { Err(err) } else { Ok(rows) }
            }
            Err(err) => Err(err),
        }
    }

    /// 活动抽签状态（不暴露配对内容）
    pub async fn draw_status(&self, event_id: i32) -> AppResult<DrawStatusResponse> {
        self.ensure_event_exists(event_id).await?;
        let pairs = draw_results::Entity::find()
            .filter(draw_results::Column::EventId.eq(event_id))
            .count(&self.pool)
            .await?;
        Ok(DrawStatusResponse {
            event_id,
            drawn: pairs > 0,
            pairs,
        })
    }

    /// 删除活动的全部抽签结果，下次查询时重新抽签
    pub async fn reset_draw(&self, event_id: i32) -> AppResult<ResetDrawResponse> {
        self.ensure_event_exists(event_id).await?;

        let _guard = self.locks.acquire(event_id).await;
        let rows_deleted = draw_results::Entity::delete_many()
            .filter(draw_results::Column::EventId.eq(event_id))
            .exec(&self.pool)
            .await?
            .rows_affected;

        log::warn!("Draw for event {event_id} reset, {rows_deleted} row(s) deleted");
        Ok(ResetDrawResponse {
            event_id,
            rows_deleted,
        })
    }

    async fn results_for_event(&self, event_id: i32) -> AppResult<Vec<draw_results::Model>> {
        Ok(draw_results::Entity::find()
            .filter(draw_results::Column::EventId.eq(event_id))
            .order_by_asc(draw_results::Column::Id)
            .all(&self.pool)
            .await?)
    }

    async fn ensure_event_exists(&self, event_id: i32) -> AppResult<()> {
        events::Entity::find_by_id(event_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {event_id} not found")))?;
        Ok(())
    }

    /// 读取参与者/排除规则快照，抽签并在一个事务中写入全部结果
    async fn perform_draw(&self, event_id: i32) -> AppResult<Vec<draw_results::Model>> {
        let txn = self.pool.begin().await?;

        let ids: Vec<i32> = participants::Entity::find()
            .select_only()
            .column(participants::Column::Id)
            .order_by_asc(participants::Column::Id)
            .into_tuple()
            .all(&txn)
            .await?;
        let exclusions = load_pairs(&txn).await?;

        let assignment = generate_assignment(&ids, &exclusions, self.max_attempts)?;

        let now = Utc::now();
        let rows = assignment.iter().map(|pair| draw_results::ActiveModel {
            event_id: Set(event_id),
            participant_id: Set(pair.giver),
            draws_for_id: Set(pair.recipient),
            created_at: Set(now),
            ..Default::default()
        });
        draw_results::Entity::insert_many(rows).exec(&txn).await?;
        txn.commit().await?;

        log::info!(
            "Draw performed for event {event_id}: {} participants, {} exclusion rule(s)",
            ids.len(),
            exclusions.len()
        );
        self.results_for_event(event_id).await
    }
}

fn is_unique_violation(err: &AppError) -> bool {
    match err {
        AppError::DatabaseError(db_err) => {
            matches!(db_err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        }
        _ => false,
    }
}
