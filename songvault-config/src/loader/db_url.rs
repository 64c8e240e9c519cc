use std::{fs::read_to_string, path::Path};

use url::Url;

use crate::{
    ConfigLoadError,
    models::sources::{EnvConfig, FileDatabaseConfig},
};

const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Resolve the PostgreSQL connection URL.
///
/// Precedence: `DATABASE_URL`, `DATABASE_URL_FILE`, `database.url` from the
/// config file, then a URL assembled from `DB_HOST`/`DB_USER`/`DB_NAME`
/// (environment first, config file second) with the password from
/// [`resolve_database_password`].
pub fn resolve_database_url(
    env: &EnvConfig,
    file_database: &FileDatabaseConfig,
) -> Result<Option<String>, ConfigLoadError> {
    if let Some(url) = env.database_url.clone() {
        return Ok(Some(url.trim().to_string()));
    }

    if let Some(path) = env.database_url_file.as_ref()
        && let Some(url) = read_secret_file(path)?
    {
        return Ok(Some(url));
    }

    if let Some(stored_url) = file_database
        .url
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        let mut parsed = Url::parse(stored_url)
            .map_err(|source| ConfigLoadError::InvalidDatabaseUrl { source })?;
        if parsed.password().is_none()
            && let Some(password) =
                resolve_database_password(env, file_database)?
        {
            parsed
                .set_password(Some(&password))
                .map_err(|_| ConfigLoadError::InvalidDatabasePassword)?;
        }
        return Ok(Some(parsed.to_string()));
    }

    let pick = |env_value: &Option<String>, file_value: &Option<String>| {
        env_value
            .clone()
            .or_else(|| file_value.clone())
            .filter(|value| !value.trim().is_empty())
    };
    let host = pick(&env.database_host, &file_database.host);
    let user = pick(&env.database_user, &file_database.user);
    let name = pick(&env.database_name, &file_database.name);

    if let (Some(host), Some(user), Some(name)) = (host, user, name) {
        let port = env
            .database_port
            .or(file_database.port)
            .unwrap_or(DEFAULT_POSTGRES_PORT);
        let mut url = Url::parse(&format!("postgresql://{host}:{port}/{name}"))
            .map_err(|source| ConfigLoadError::InvalidDatabaseUrl { source })?;
        url.set_username(&user).map_err(|_| {
            ConfigLoadError::InvalidDatabaseUsername {
                username: user.clone(),
            }
        })?;
        if let Some(password) = resolve_database_password(env, file_database)? {
            url.set_password(Some(&password))
                .map_err(|_| ConfigLoadError::InvalidDatabasePassword)?;
        }
        return Ok(Some(url.to_string()));
    }

    Ok(None)
}

pub fn resolve_database_password(
    env: &EnvConfig,
    file_database: &FileDatabaseConfig,
) -> Result<Option<String>, ConfigLoadError> {
    if let Some(password) = env.database_password.clone() {
        return Ok(Some(password));
    }

    for path in [
        env.database_password_file.as_ref(),
        file_database.password_file.as_ref(),
    ]
    .into_iter()
    .flatten()
    {
        if let Some(secret) = read_secret_file(path)? {
            return Ok(Some(secret));
        }
    }

    Ok(None)
}

pub fn read_secret_file(
    path: &Path,
) -> Result<Option<String>, ConfigLoadError> {
    let contents =
        read_to_string(path).map_err(|source| ConfigLoadError::SecretFileIo {
            path: path.to_path_buf(),
            source,
        })?;
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}
