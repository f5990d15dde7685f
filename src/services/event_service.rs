use crate::entities::event_entity as events;
use crate::error::{AppError, AppResult};
use crate::models::{CreateEventRequest, EventResponse};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct EventService {
    pool: DatabaseConnection,
}

impl EventService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 当前激活的活动（多个时取 id 最大者）
    pub async fn get_active_event(&self) -> AppResult<Option<events::Model>> {
        Ok(find_active_event(&self.pool).await?)
    }

    /// 活动列表（按年份、id 倒序）
    pub async fn list_events(&self) -> AppResult<Vec<EventResponse>> {
        let list = events::Entity::find()
            .order_by_desc(events::Column::Year)
            .order_by_desc(events::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    /// 创建活动
    /// 激活状态的新活动会在同一事务中停用其他所有活动
    pub async fn create_event(&self, request: CreateEventRequest) -> AppResult<EventResponse> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError(
                "Event name is required".to_string(),
            ));
        }
        if !(2000..=9999).contains(&request.year) {
            return Err(AppError::ValidationError(format!(
                "Invalid event year: {}",
                request.year
            )));
        }

        let is_active = request.is_active.unwrap_or(true);
        let txn = self.pool.begin().await?;
        let created = insert_event(&txn, &name, request.year, is_active).await?;
        txn.commit().await?;

        log::info!(
            "Created event {} ({} {}), active={}",
            created.id,
            created.name,
            created.year,
            created.is_active
        );
        Ok(created.into())
    }

    /// 激活指定活动并停用其他活动
    pub async fn activate_event(&self, event_id: i32) -> AppResult<EventResponse> {
        let txn = self.pool.begin().await?;

        let event = events::Entity::find_by_id(event_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {event_id} not found")))?;

        deactivate_all(&txn).await?;
        let mut am = event.into_active_model();
        am.is_active = Set(true);
        let updated = am.update(&txn).await?;

        txn.commit().await?;
        log::info!("Activated event {event_id}");
        Ok(updated.into())
    }
}

pub(crate) async fn find_active_event<C>(conn: &C) -> Result<Option<events::Model>, DbErr>
where
    C: ConnectionTrait,
{
    events::Entity::find()
        .filter(events::Column::IsActive.eq(true))
        .order_by_desc(events::Column::Id)
        .one(conn)
        .await
}

async fn deactivate_all<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    events::Entity::update_many()
        .col_expr(events::Column::IsActive, Expr::value(false))
        .filter(events::Column::IsActive.eq(true))
        .exec(conn)
        .await?;
    Ok(())
}

/// 在调用方事务内插入活动
pub(crate) async fn insert_event<C>(
    conn: &C,
    name: &str,
    year: i32,
    is_active: bool,
) -> Result<events::Model, DbErr>
where
    C: ConnectionTrait,
{
    if is_active {
        deactivate_all(conn).await?;
    }
    events::ActiveModel {
        name: Set(name.to_string()),
        year: Set(year),
        is_active: Set(is_active),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await
}
