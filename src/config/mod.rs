use chrono::NaiveTime;
use std::env;
use std::path::PathBuf;

use crate::engine::EngineSettings;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub admin: AdminConfig,
    pub seating: SeatingConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub key: String,
}

// Initial seating layout; all of it is reconfigurable at runtime through the
// admin operations.
#[derive(Debug, Clone)]
pub struct SeatingConfig {
    pub rows: u32,
    pub cols: u32,
    pub default_price: f64,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "4242".to_string())
                    .parse()
                    .expect("PORT must be a valid number"),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "seatline=debug,tower_http=debug".to_string()),
            },
            storage: StorageConfig {
                data_dir: env::var("DATA_DIR")
                    .unwrap_or_else(|_| "data".to_string())
                    .into(),
            },
            admin: AdminConfig {
                key: env::var("ADMIN_KEY").expect("ADMIN_KEY must be set"),
            },
            seating: SeatingConfig {
                rows: env::var("SEAT_ROWS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .expect("SEAT_ROWS must be a valid number"),
                cols: env::var("SEAT_COLS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .expect("SEAT_COLS must be a valid number"),
                default_price: env::var("DEFAULT_SEAT_PRICE")
                    .unwrap_or_else(|_| "10.0".to_string())
                    .parse()
                    .expect("DEFAULT_SEAT_PRICE must be a valid number"),
                opening_time: parse_hours(
                    &env::var("OPENING_TIME").unwrap_or_else(|_| "18:00".to_string()),
                )
                .expect("OPENING_TIME must be HH:MM"),
                closing_time: parse_hours(
                    &env::var("CLOSING_TIME").unwrap_or_else(|_| "22:00".to_string()),
                )
                .expect("CLOSING_TIME must be HH:MM"),
            },
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            rows: self.seating.rows,
            cols: self.seating.cols,
            default_price: self.seating.default_price,
            opening_time: self.seating.opening_time,
            closing_time: self.seating.closing_time,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

fn parse_hours(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_parse_with_and_without_seconds() {
        assert_eq!(
            parse_hours("18:00"),
            NaiveTime::from_hms_opt(18, 0, 0)
        );
        assert_eq!(
            parse_hours("09:30:15"),
            NaiveTime::from_hms_opt(9, 30, 15)
        );
        assert_eq!(parse_hours("not a time"), None);
    }
}
