use crate::entities::{exclusion_rule_entity as exclusions, participant_entity as participants};
use crate::error::{AppError, AppResult};
use crate::models::{CreateExclusionRequest, ExclusionRuleResponse};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct ExclusionService {
    pool: DatabaseConnection,
}

impl ExclusionService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_exclusions(&self) -> AppResult<Vec<ExclusionRuleResponse>> {
        let list = exclusions::Entity::find()
            .order_by_asc(exclusions::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    /// 新增排除规则
    /// - 两个参与者必须存在且不同
    /// - (A,B) 与 (B,A) 视为同一条规则，重复时返回 Conflict
    pub async fn create_exclusion(
        &self,
        request: CreateExclusionRequest,
    ) -> AppResult<ExclusionRuleResponse> {
        let (first, second) = (request.participant1_id, request.participant2_id);
        if first == second {
            return Err(AppError::ValidationError(
                "A participant cannot be excluded from themselves".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;

        let found = participants::Entity::find()
            .filter(participants::Column::Id.is_in([first, second]))
            .count(&txn)
            .await?;
        if found != 2 {
            return Err(AppError::NotFound(format!(
                "Participant {first} or {second} not found"
            )));
        }

        if pair_exists(&txn, first, second).await? {
            return Err(AppError::Conflict(format!(
                "Exclusion between {first} and {second} already exists"
            )));
        }

        let reason = request
            .reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        let created = insert_exclusion(&txn, first, second, reason).await?;
        txn.commit().await?;

        log::info!("Created exclusion {} ({first} <-> {second})", created.id);
        Ok(created.into())
    }

    pub async fn delete_exclusion(&self, exclusion_id: i32) -> AppResult<()> {
        let result = exclusions::Entity::delete_by_id(exclusion_id)
            .exec(&self.pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "Exclusion {exclusion_id} not found"
            )));
        }
        log::info!("Deleted exclusion {exclusion_id}");
        Ok(())
    }
}

/// 抽签使用的排除对
pub(crate) async fn load_pairs<C>(conn: &C) -> Result<Vec<(i32, i32)>, DbErr>
where
    C: ConnectionTrait,
{
    Ok(exclusions::Entity::find()
        .order_by_asc(exclusions::Column::Id)
        .all(conn)
        .await?
        .iter()
        .map(exclusions::Model::pair)
        .collect())
}

/// 任一方向是否已存在
pub(crate) async fn pair_exists<C>(conn: &C, first: i32, second: i32) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let count = exclusions::Entity::find()
        .filter(
            Condition::any()
                .add(
                    Condition::all()
                        .add(exclusions::Column::Participant1Id.eq(first))
                        .add(exclusions::Column::Participant2Id.eq(second)),
                )
                .add(
                    Condition::all()
                        .add(exclusions::Column::Participant1Id.eq(second))
                        .add(exclusions::Column::Participant2Id.eq(first)),
                ),
        )
        .count(conn)
        .await?;
    Ok(count > 0)
}

pub(crate) async fn insert_exclusion<C>(
    conn: &C,
    first: i32,
    second: i32,
    reason: Option<String>,
) -> Result<exclusions::Model, DbErr>
where
    C: ConnectionTrait,
{
    exclusions::ActiveModel {
        participant1_id: Set(first),
        participant2_id: Set(second),
        reason: Set(reason),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await
}
