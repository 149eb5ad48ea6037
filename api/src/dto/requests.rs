use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Registration accepts any strings; absent fields arrive as empty.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Validate, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Comment cannot be empty."))]
    pub text: String,
}

/// GET /login?error=1&registered=1
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub registered: Option<String>,
}

impl LoginQuery {
    pub fn failed(&self) -> bool {
        self.error.as_deref() == Some("1")
    }

    pub fn registered(&self) -> bool {
        self.registered.as_deref() == Some("1")
    }
}

fn not_blank(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
