use hearsay_core::brands::BrandConfig;
use sqlx::PgPool;

use crate::DbError;

/// Upsert brands from config into the database, including keywords and
/// per-channel notification settings.
///
/// Returns the number of brands processed (inserted or updated).
/// All upserts run inside a single transaction; if any operation fails
/// the entire batch is rolled back. Keywords are replaced wholesale per
/// brand so removals in the config take effect.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_brands(pool: &PgPool, brands: &[BrandConfig]) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for brand in brands {
        let slug = brand.slug();
        let notifications = &brand.notifications;

        let brand_id: i64 = sqlx::query_scalar(
            "INSERT INTO brands (name, slug, \
                 email_enabled, email_recipient, \
                 slack_enabled, slack_webhook_url, \
                 telegram_enabled, telegram_chat_id, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, true) \
             ON CONFLICT (slug) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 email_enabled = EXCLUDED.email_enabled, \
                 email_recipient = EXCLUDED.email_recipient, \
                 slack_enabled = EXCLUDED.slack_enabled, \
                 slack_webhook_url = EXCLUDED.slack_webhook_url, \
                 telegram_enabled = EXCLUDED.telegram_enabled, \
                 telegram_chat_id = EXCLUDED.telegram_chat_id, \
                 is_active = true, \
                 updated_at = NOW() \
             RETURNING id",
        )
        .bind(&brand.name)
        .bind(&slug)
        .bind(notifications.email.enabled)
        .bind(&notifications.email.destination)
        .bind(notifications.slack.enabled)
        .bind(&notifications.slack.destination)
        .bind(notifications.telegram.enabled)
        .bind(&notifications.telegram.destination)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM brand_keywords WHERE brand_id = $1")
            .bind(brand_id)
            .execute(&mut *tx)
            .await?;

        for keyword in &brand.keywords {
            sqlx::query(
                "INSERT INTO brand_keywords (brand_id, name, kind) \
                 VALUES ($1, $2, $3)",
            )
            .bind(brand_id)
            .bind(&keyword.name)
            .bind(&keyword.kind)
            .execute(&mut *tx)
            .await?;
        }

        count += 1;
    }

    tx.commit().await?;
    Ok(count)
}
