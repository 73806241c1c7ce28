//! Account management commands.

use super::CliError;

/// Promote an existing account to administrator.
///
/// # Errors
///
/// Returns `CliError::NoSuchUser` if no account has that username.
pub async fn promote(username: &str) -> Result<(), CliError> {
    let pool = super::connect().await?;

    let result = sqlx::query("UPDATE users SET role = 'admin', updated_at = NOW() WHERE username = $1")
        .bind(username)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CliError::NoSuchUser(username.to_owned()));
    }

    tracing::info!(username, "Account promoted to admin");
    Ok(())
}
