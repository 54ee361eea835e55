use async_trait::async_trait;
use diesel::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

use super::model::AppSettingDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::app_settings::dsl::*;
use ratefeed_core::constants::{
    CACHED_RATE_COIN_KEY, CACHED_RATE_CURRENCY_CODE_KEY, CACHED_RATE_FIAT_KEY,
    CACHED_RATE_SOURCE_KEY, EXCHANGE_CURRENCY_CODE_KEY,
};
use ratefeed_core::errors::{Error, Result};
use ratefeed_core::settings::RateSettingsRepositoryTrait;
use ratefeed_market_data::ExchangeRate;

const CACHED_RATE_KEYS: [&str; 4] = [
    CACHED_RATE_CURRENCY_CODE_KEY,
    CACHED_RATE_COIN_KEY,
    CACHED_RATE_FIAT_KEY,
    CACHED_RATE_SOURCE_KEY,
];

pub struct RateSettingsRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl RateSettingsRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        RateSettingsRepository { pool, writer }
    }

    fn get_setting(&self, setting_key_param: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        app_settings
            .filter(setting_key.eq(setting_key_param))
            .select(setting_value)
            .first::<String>(&mut conn)
            .optional()
            .map_err(|e| StorageError::from(e).into())
    }

    fn get_settings(&self, keys: &[&str]) -> Result<HashMap<String, String>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<(String, String)> = app_settings
            .filter(setting_key.eq_any(keys.to_vec()))
            .select((setting_key, setting_value))
            .load::<(String, String)>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().collect())
    }
}

fn parse_cached_rate(values: &HashMap<String, String>) -> Result<Option<ExchangeRate>> {
    let Some(code) = values.get(CACHED_RATE_CURRENCY_CODE_KEY) else {
        return Ok(None);
    };

    let field = |key: &str| {
        values
            .get(key)
            .ok_or_else(|| Error::InvalidCachedRate(format!("missing '{}'", key)))
    };
    let number = |key: &str| -> Result<i64> {
        let raw = field(key)?;
        raw.parse::<i64>()
            .map_err(|e| Error::InvalidCachedRate(format!("'{}' = '{}': {}", key, raw, e)))
    };

    Ok(Some(ExchangeRate {
        currency_code: code.clone(),
        coin_amount: number(CACHED_RATE_COIN_KEY)?,
        fiat_amount: number(CACHED_RATE_FIAT_KEY)?,
        source: field(CACHED_RATE_SOURCE_KEY)?.clone(),
    }))
}

#[async_trait]
impl RateSettingsRepositoryTrait for RateSettingsRepository {
    fn get_cached_rate(&self) -> Result<Option<ExchangeRate>> {
        let values = self.get_settings(&CACHED_RATE_KEYS)?;
        parse_cached_rate(&values)
    }

    async fn set_cached_rate(&self, rate: &ExchangeRate) -> Result<()> {
        let rows = vec![
            AppSettingDB::new(CACHED_RATE_CURRENCY_CODE_KEY, rate.currency_code.clone()),
            AppSettingDB::new(CACHED_RATE_COIN_KEY, rate.coin_amount.to_string()),
            AppSettingDB::new(CACHED_RATE_FIAT_KEY, rate.fiat_amount.to_string()),
            AppSettingDB::new(CACHED_RATE_SOURCE_KEY, rate.source.clone()),
        ];

        self.writer
            .exec(move |conn| {
                for row in &rows {
                    diesel::replace_into(app_settings)
                        .values(row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(())
            })
            .await
    }

    fn get_exchange_currency_code(&self) -> Result<Option<String>> {
        self.get_setting(EXCHANGE_CURRENCY_CODE_KEY)
    }

    async fn set_exchange_currency_code(&self, code: &str) -> Result<()> {
        let row = AppSettingDB::new(EXCHANGE_CURRENCY_CODE_KEY, code);

        self.writer
            .exec(move |conn| {
                diesel::replace_into(app_settings)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}
