use crate::error::AppError;

/// Resolve the database URL.
///
/// `DATABASE_URL` wins when set. Otherwise a Postgres URL is assembled from
/// `POSTGRES_HOST` (default `localhost`), `POSTGRES_PORT` (default `5432`),
/// `POSTGRES_USER`, `POSTGRES_PASSWORD` and `POSTGRES_DBNAME`.
pub fn database_url_from<F>(lookup: &F) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()) {
        return Ok(url);
    }

    let host = lookup("POSTGRES_HOST").unwrap_or_else(|| "localhost".to_string());
    let port = lookup("POSTGRES_PORT").unwrap_or_else(|| "5432".to_string());
    let username = must_var(lookup, "POSTGRES_USER")?;
    let password = must_var(lookup, "POSTGRES_PASSWORD")?;
    let db_name = must_var(lookup, "POSTGRES_DBNAME")?;

    Ok(format!(
        "postgresql://{username}:{password}@{host}:{port}/{db_name}"
    ))
}

/// Get required variable or return error
fn must_var<F>(lookup: &F, name: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .ok_or_else(|| AppError::config(format!("Required environment variable '{name}' is not set")))
}

/// Database URL with the password masked, for logs.
pub fn redacted_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let rest = &url[scheme_end + 3..];
    let Some(at) = rest.find('@') else {
        return url.to_string();
    };
    let userinfo = &rest[..at];
    let user = userinfo.split(':').next().unwrap_or_default();
    format!("{}://{}:***@{}", &url[..scheme_end], user, &rest[at + 1..])
}
