// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password acquisition via TTY prompt or environment variable.

use nodevault_core::NodeVaultError;
use secrecy::SecretString;

/// Environment variable holding the master password.
pub const PASSWORD_ENV_VAR: &str = "NODEVAULT_PASSWORD";

/// Environment variable holding the password of a backup being imported.
pub const IMPORT_PASSWORD_ENV_VAR: &str = "NODEVAULT_IMPORT_PASSWORD";

fn from_env(var: &str) -> Option<SecretString> {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => Some(SecretString::from(value)),
        _ => None,
    }
}

fn read_tty(label: &str) -> Result<String, NodeVaultError> {
    eprint!("{label}: ");
    rpassword::read_password()
        .map_err(|e| NodeVaultError::Prompt(format!("failed to read password: {e}")))
}

fn is_terminal() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stdin())
}

fn not_provided(var: &str) -> NodeVaultError {
    NodeVaultError::Prompt(format!(
        "no password provided. Set {var} or run interactively."
    ))
}

fn read_password(var: &str, label: &str) -> Result<SecretString, NodeVaultError> {
    if let Some(password) = from_env(var) {
        return Ok(password);
    }
    if is_terminal() {
        let password = read_tty(label)?;
        if password.is_empty() {
            return Err(NodeVaultError::Prompt("empty password not allowed".to_string()));
        }
        return Ok(SecretString::from(password));
    }
    Err(not_provided(var))
}

/// Master password from `NODEVAULT_PASSWORD`, else an interactive prompt.
pub fn get_master_password() -> Result<SecretString, NodeVaultError> {
    read_password(PASSWORD_ENV_VAR, "Master password")
}

/// Master password for a new vault. Prompts twice when interactive.
pub fn get_new_master_password() -> Result<SecretString, NodeVaultError> {
    if let Some(password) = from_env(PASSWORD_ENV_VAR) {
        return Ok(password);
    }
    if is_terminal() {
        let first = read_tty("New master password")?;
        let second = read_tty("Confirm master password")?;
        if first != second {
            return Err(NodeVaultError::Prompt("passwords do not match".to_string()));
        }
        if first.is_empty() {
            return Err(NodeVaultError::Prompt("empty password not allowed".to_string()));
        }
        return Ok(SecretString::from(first));
    }
    Err(not_provided(PASSWORD_ENV_VAR))
}

/// Password of a backup file, from `NODEVAULT_IMPORT_PASSWORD` or a prompt.
pub fn get_import_password() -> Result<SecretString, NodeVaultError> {
    read_password(IMPORT_PASSWORD_ENV_VAR, "Backup password")
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn master_password_from_env_var() {
        // SAFETY: test-only env mutation, serialized.
        unsafe { std::env::set_var(PASSWORD_ENV_VAR, "test-password") };
        let result = get_master_password();
        unsafe { std::env::remove_var(PASSWORD_ENV_VAR) };

        assert_eq!(result.unwrap().expose_secret(), "test-password");
    }

    #[test]
    #[serial]
    fn new_master_password_from_env_var_skips_confirmation() {
        unsafe { std::env::set_var(PASSWORD_ENV_VAR, "test-password") };
        let result = get_new_master_password();
        unsafe { std::env::remove_var(PASSWORD_ENV_VAR) };

        assert!(result.is_ok());
    }

    #[test]
    #[serial]
    fn import_password_uses_its_own_variable() {
        unsafe {
            std::env::set_var(PASSWORD_ENV_VAR, "master");
            std::env::set_var(IMPORT_PASSWORD_ENV_VAR, "backup");
        }
        let result = get_import_password();
        unsafe {
            std::env::remove_var(PASSWORD_ENV_VAR);
            std::env::remove_var(IMPORT_PASSWORD_ENV_VAR);
        }

        assert_eq!(result.unwrap().expose_secret(), "backup");
    }

    #[test]
    #[serial]
    fn empty_env_var_is_ignored() {
        unsafe { std::env::set_var(PASSWORD_ENV_VAR, "") };
        // stdin is not a terminal under the test runner.
        let result = get_master_password();
        unsafe { std::env::remove_var(PASSWORD_ENV_VAR) };

        assert!(matches!(result, Err(NodeVaultError::Prompt(_))));
    }
}
