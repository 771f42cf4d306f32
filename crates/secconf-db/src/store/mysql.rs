//! MySQL / MariaDB backend.
//!
//! The driver is async; each call is driven to completion on a private
//! current-thread runtime so the store stays a plain blocking API.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use mysql_async::{
    consts::ColumnType, prelude::Queryable, Conn, Error as MySqlError, OptsBuilder, Params,
    Row, Value as MySqlValue,
};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, warn};

use super::{Store, StoreError, StoreRows};
use crate::{
    connection::Credentials,
    dialect::{Dialect, MySql},
    value::Value,
};

/// `ER_DBACCESS_DENIED_ERROR`, `ER_ACCESS_DENIED_ERROR` and
/// `ER_TABLEACCESS_DENIED_ERROR`.
pub const MYSQL_DENIED_CODES: &[i32] = &[1044, 1045, 1142];

pub struct MySqlStore {
    runtime: Runtime,
    conn: Option<Conn>,
}

impl MySqlStore {
    /// Connects as `credentials.username` to `credentials.database` and
    /// switches the session to UTF-8.
    pub fn connect(host: &str, port: u16, credentials: &Credentials) -> Result<Self, StoreError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| StoreError::new(None, format!("failed to start runtime: {err}")))?;

        let opts = OptsBuilder::default()
            .ip_or_hostname(host)
            .tcp_port(port)
            .db_name(Some(credentials.database.as_str()))
            .user(Some(credentials.username.as_str()))
            .pass(Some(credentials.password.as_str()))
            .init(vec!["SET NAMES utf8mb4"]);

        debug!(
            host,
            port,
            database = %credentials.database,
            user = %credentials.username,
            "connecting to mysql"
        );
        let conn = runtime.block_on(Conn::new(opts)).map_err(store_error)?;

        Ok(Self {
            runtime,
            conn: Some(conn),
        })
    }
}

impl Store for MySqlStore {
    fn dialect(&self) -> &dyn Dialect {
        &MySql
    }

    fn denied_codes(&self) -> &'static [i32] {
        MYSQL_DENIED_CODES
    }

    fn query(&mut self, sql: &str, params: &[Value]) -> Result<StoreRows, StoreError> {
        let Self {
            runtime,
            conn,
        } = self;
        let conn = conn
            .as_mut()
            .ok_or_else(|| StoreError::new(None, "connection already closed"))?;
        let params = to_params(params);

        runtime.block_on(async move {
            let result = conn.exec_iter(sql, params).await.map_err(store_error)?;
            let columns = result
                .columns()
                .map(|columns| {
                    columns
                        .iter()
                        .map(|column| column.name_str().into_owned())
                        .collect()
                })
                .unwrap_or_default();
            let rows: Vec<Row> = result.collect_and_drop().await.map_err(store_error)?;

            Ok::<_, StoreError>(StoreRows {
                columns,
                rows: rows.into_iter().map(from_row).collect(),
            })
        })
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64, StoreError> {
        let Self {
            runtime,
            conn,
        } = self;
        let conn = conn
            .as_mut()
            .ok_or_else(|| StoreError::new(None, "connection already closed"))?;
        let params = to_params(params);

        runtime.block_on(async move {
            conn.exec_drop(sql, params).await.map_err(store_error)?;
            Ok::<_, StoreError>(conn.affected_rows())
        })
    }
}

impl Drop for MySqlStore {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(err) = self.runtime.block_on(conn.disconnect()) {
                warn!("failed to close mysql connection: {err}");
            }
        }
    }
}

fn to_params(params: &[Value]) -> Params {
    if params.is_empty() {
        return Params::Empty;
    }
    Params::Positional(params.iter().map(to_mysql).collect())
}

fn to_mysql(value: &Value) -> MySqlValue {
    match value {
        Value::Null => MySqlValue::NULL,
        Value::Integer(i) => MySqlValue::Int(*i),
        Value::Real(r) => MySqlValue::Double(*r),
        Value::Text(s) => MySqlValue::Bytes(s.clone().into_bytes()),
        Value::Date(d) => MySqlValue::Date(d.year() as u16, d.month() as u8, d.day() as u8, 0, 0, 0, 0),
        Value::DateTime(dt) => {
            MySqlValue::Date(
                dt.year() as u16,
                dt.month() as u8,
                dt.day() as u8,
                dt.hour() as u8,
                dt.minute() as u8,
                dt.second() as u8,
                dt.and_utc().timestamp_subsec_micros(),
            )
        }
    }
}

fn from_row(row: Row) -> Vec<Value> {
    let types: Vec<ColumnType> = row
        .columns_ref()
        .iter()
        .map(|column| column.column_type())
        .collect();

    Row::unwrap(row)
        .into_iter()
        .zip(types)
        .map(|(value, column_type)| from_mysql(value, column_type))
        .collect()
}

fn from_mysql(value: MySqlValue, column_type: ColumnType) -> Value {
    match value {
        MySqlValue::NULL => Value::Null,
        MySqlValue::Bytes(bytes) => Value::Text(String::from_utf8_lossy(&bytes).into_owned()),
        MySqlValue::Int(i) => Value::Integer(i),
        MySqlValue::UInt(u) => {
            i64::try_from(u).map_or_else(|_| Value::Text(u.to_string()), Value::Integer)
        }
        MySqlValue::Float(f) => Value::Real(f.into()),
        MySqlValue::Double(d) => Value::Real(d),
        MySqlValue::Date(year, month, day, hour, minute, second, micros) => {
            // zero dates ("0000-00-00") do not exist on the calendar
            let Some(date) = NaiveDate::from_ymd_opt(year.into(), month.into(), day.into()) else {
                return Value::Null;
            };
            match column_type {
                ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE => Value::Date(date),
                _ => {
                    NaiveTime::from_hms_micro_opt(hour.into(), minute.into(), second.into(), micros)
                        .map_or(Value::Date(date), |time| {
                            Value::DateTime(NaiveDateTime::new(date, time))
                        })
                }
            }
        }
        MySqlValue::Time(negative, days, hours, minutes, seconds, _) => {
            let sign = if negative { "-" } else { "" };
            let hours = u32::from(hours) + days * 24;
            Value::Text(format!("{sign}{hours:02}:{minutes:02}:{seconds:02}"))
        }
    }
}

fn store_error(err: MySqlError) -> StoreError {
    match err {
        MySqlError::Server(server) => StoreError::new(Some(server.code.into()), server.message),
        other => StoreError::new(None, other.to_string()),
    }
}
