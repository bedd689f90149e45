use lapline_core::AppError;
use sqlx::postgres::PgConnectOptions;

/// Configuration for the database connection pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    /// Local development database.
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 5432,
            name: "f1_analytics".into(),
            user: "postgres".into(),
            password: String::new(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    /// Read configuration from environment variables.
    ///
    /// - `DB_HOST` (defaults to `localhost`)
    /// - `DB_PORT` (defaults to 5432)
    /// - `DB_NAME` (defaults to `f1_analytics`)
    /// - `DB_USER` (defaults to `postgres`)
    /// - `DB_PASSWORD` (defaults to empty)
    /// - `DB_MAX_CONNECTIONS` (defaults to 5)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, AppError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("DB_PORT") {
            None => defaults.port,
            Some(raw) => raw.parse().map_err(|_| {
                AppError::ConfigError(format!("Invalid DB_PORT '{raw}': must be a port number"))
            })?,
        };

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            None => defaults.max_connections,
            Some(raw) => {
                let parsed: u32 = raw.parse().map_err(|_| {
                    AppError::ConfigError(format!(
                        "Invalid DB_MAX_CONNECTIONS '{raw}': must be a positive integer"
                    ))
                })?;
                if parsed == 0 {
                    return Err(AppError::ConfigError(
                        "DB_MAX_CONNECTIONS must be at least 1".into(),
                    ));
                }
                parsed
            }
        };

        Ok(Self {
            host: lookup("DB_HOST").unwrap_or(defaults.host),
            port,
            name: lookup("DB_NAME").unwrap_or(defaults.name),
            user: lookup("DB_USER").unwrap_or(defaults.user),
            password: lookup("DB_PASSWORD").unwrap_or(defaults.password),
            max_connections,
        })
    }

    /// Connection options for sqlx. The password is passed as-is, never
    /// interpolated into a URL.
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user);

        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }
}
