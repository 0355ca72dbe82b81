use anyhow::Context as _;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
};

use bras_access_codes_schema::access_codes;

use crate::domain::pagination::PageRequest;
use crate::domain::repository::AccessCodeRepository;
use crate::domain::types::{AccessCode, CodeCounts, CodeFilter, ConsumeResult};
use crate::error::AccessCodeError;

#[derive(Clone)]
pub struct DbAccessCodeRepository {
    pub db: DatabaseConnection,
}

impl AccessCodeRepository for DbAccessCodeRepository {
    async fn insert_if_absent(&self, record: &AccessCode) -> Result<bool, AccessCodeError> {
        let result = access_codes::ActiveModel {
            id: Set(record.id),
            code: Set(record.code.clone()),
            batch_id: Set(record.batch_id.clone()),
            is_used: Set(false),
            used_at: Set(None),
            used_by_ip: Set(None),
            created_at: Set(record.created_at),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(_) => Ok(true),
            // The unique index on `code` is what makes collisions a
            // normal control path: report them, don't fail.
            Err(ref e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(false)
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context("insert access code")
                .into()),
        }
    }

    async fn try_consume(
        &self,
        code: &str,
        used_by_ip: Option<&str>,
    ) -> Result<ConsumeResult, AccessCodeError> {
        // Single conditional write: only one concurrent caller can
        // satisfy `is_used = false`, which is the whole exactly-once
        // argument. Never split into a read followed by a write.
        let now = Utc::now();
        let mut update = access_codes::Entity::update_many()
            .col_expr(access_codes::Column::IsUsed, Expr::value(true))
            .col_expr(access_codes::Column::UsedAt, Expr::value(Some(now)))
            .filter(access_codes::Column::Code.eq(code))
            .filter(access_codes::Column::IsUsed.eq(false));
        if let Some(ip) = used_by_ip {
            update = update.col_expr(
                access_codes::Column::UsedByIp,
                Expr::value(Some(ip.to_owned())),
            );
        }
        let result = update.exec(&self.db).await.context("consume access code")?;

        if result.rows_affected > 0 {
            return Ok(ConsumeResult::Consumed);
        }

        // Zero rows affected: classify. The read happens after the
        // write, so it can only observe used or absent.
        let exists = access_codes::Entity::find()
            .filter(access_codes::Column::Code.eq(code))
            .one(&self.db)
            .await
            .context("classify consume miss")?;
        Ok(if exists.is_some() {
            ConsumeResult::AlreadyUsed
        } else {
            ConsumeResult::NotFound
        })
    }

    async fn find_by_batch(&self, batch_id: &str) -> Result<Vec<AccessCode>, AccessCodeError> {
        let models = access_codes::Entity::find()
            .filter(access_codes::Column::BatchId.eq(batch_id))
            .order_by_desc(access_codes::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("find codes by batch")?;
        Ok(models.into_iter().map(access_code_from_model).collect())
    }

    async fn list(
        &self,
        filter: CodeFilter,
        page: PageRequest,
    ) -> Result<(Vec<AccessCode>, u64), AccessCodeError> {
        let mut query = access_codes::Entity::find();
        match filter {
            CodeFilter::All => {}
            CodeFilter::Used => query = query.filter(access_codes::Column::IsUsed.eq(true)),
            CodeFilter::Available => query = query.filter(access_codes::Column::IsUsed.eq(false)),
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count listed codes")?;
        let models = query
            .order_by_desc(access_codes::Column::CreatedAt)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list codes")?;

        Ok((
            models.into_iter().map(access_code_from_model).collect(),
            total,
        ))
    }

    async fn counts(&self) -> Result<CodeCounts, AccessCodeError> {
        let used = access_codes::Entity::find()
            .filter(access_codes::Column::IsUsed.eq(true))
            .count(&self.db)
            .await
            .context("count used codes")?;
        let available = access_codes::Entity::find()
            .filter(access_codes::Column::IsUsed.eq(false))
            .count(&self.db)
            .await
            .context("count available codes")?;
        // Deriving total keeps the aggregate identity exact even if a
        // code is redeemed between the two counts.
        Ok(CodeCounts {
            total: used + available,
            used,
            available,
        })
    }
}

fn access_code_from_model(model: access_codes::Model) -> AccessCode {
    AccessCode {
        id: model.id,
        code: model.code,
        batch_id: model.batch_id,
        is_used: model.is_used,
        used_at: model.used_at,
        used_by_ip: model.used_by_ip,
        created_at: model.created_at,
    }
}
