//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Validate username
///
/// Usernames double as document-store keys, so the character set is
/// restricted to filesystem-safe characters.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    if username.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 6 {
        return Err(format!(
            "Password must be at least 6 characters (current: {})",
            password.len()
        ));
    }

    let mut has_letter = false;
    let mut has_digit = false;
    let mut has_other = false;

    for c in password.chars() {
        if c.is_alphabetic() {
            has_letter = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else {
            has_other = true;
        }
    }

    if !has_letter {
        return Err("Password must contain at least one letter".to_string());
    }

    if !has_digit {
        return Err("Password must contain at least one number".to_string());
    }

    if !has_other {
        return Err(
            "Password must contain at least one non-alphanumeric character (e.g., !, @, #, $)"
                .to_string(),
        );
    }

    Ok(())
}

/// Validate display name
pub fn validate_display_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Display name is required".to_string());
    }

    Ok(())
}

/// Validate an optional display-image URL
///
/// An empty or absent value is fine; a provided value must parse as a URL.
pub fn validate_image_url(image_url: &str) -> Result<(), String> {
    if image_url.trim().is_empty() {
        return Ok(());
    }

    url::Url::parse(image_url.trim()).map_err(|_| "Invalid image URL format".to_string())?;

    Ok(())
}
