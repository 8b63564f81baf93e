//! Account request bodies and their validation.

use serde::Deserialize;

const NAME_MIN_CHARS: usize = 3;
const NAME_MAX_CHARS: usize = 40;

/// `POST /v1/accounts`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("Name is required".to_string());
        }
        check_email(&self.email, &mut errors);
        finish(errors)
    }
}

/// `POST /v1/accounts/login`
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);
        if self.password.is_empty() {
            errors.push("Password is required".to_string());
        }
        finish(errors)
    }
}

/// `PUT /v1/accounts/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateAccountRequest {
    pub name: String,
    pub email: String,
}

impl UpdateAccountRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let name = self.name.trim();
        if name.is_empty() {
            errors.push("Name is required".to_string());
        } else if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name.chars().count()) {
            errors.push(format!(
                "Name must be between {NAME_MIN_CHARS} and {NAME_MAX_CHARS} characters"
            ));
        }
        check_email(&self.email, &mut errors);
        finish(errors)
    }
}

fn check_email(email: &str, errors: &mut Vec<String>) {
    let email = email.trim();
    if email.is_empty() {
        errors.push("Email is required".to_string());
    } else if !is_valid_email(email) {
        errors.push("Email is invalid".to_string());
    }
}

fn finish(errors: Vec<String>) -> Result<(), Vec<String>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Basic email format check.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }
    let domain = parts[1];
    !parts[0].is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("ana@x.com"));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("ana @x.com"));
        assert!(!is_valid_email("ana@x.com."));
    }

    #[test]
    fn test_email_validated_after_trimming() {
        let request = RegisterRequest {
            name: "Ana".to_string(),
            email: "  ana@x.com \n".to_string(),
        };
        assert!(request.validate().is_ok());

        let request = LoginRequest {
            email: " ana@x.com ".to_string(),
            password: "secret".to_string(),
        };
        assert!(request.validate().is_ok());

        let request = RegisterRequest {
            name: "Ana".to_string(),
            email: "   ".to_string(),
        };
        assert_eq!(request.validate().unwrap_err(), vec!["Email is required"]);
    }

    #[test]
    fn test_register_validation() {
        let ok = RegisterRequest {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
        };
        assert!(ok.validate().is_ok());

        let errors = RegisterRequest::default().validate().unwrap_err();
        assert_eq!(errors, vec!["Name is required", "Email is required"]);

        let errors = RegisterRequest {
            name: "Ana".to_string(),
            email: "not-an-email".to_string(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors, vec!["Email is invalid"]);
    }

    #[test]
    fn test_login_validation() {
        let errors = LoginRequest {
            email: "ana@x.com".to_string(),
            password: String::new(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors, vec!["Password is required"]);
    }

    #[test]
    fn test_login_debug_hides_password() {
        let request = LoginRequest {
            email: "ana@x.com".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(!format!("{request:?}").contains("hunter2"));
    }

    #[test]
    fn test_update_name_length() {
        let mut request = UpdateAccountRequest {
            name: "Al".to_string(),
            email: "al@x.com".to_string(),
        };
        assert_eq!(
            request.validate().unwrap_err(),
            vec!["Name must be between 3 and 40 characters"]
        );

        request.name = "Ali".to_string();
        assert!(request.validate().is_ok());

        request.name = "a".repeat(40);
        assert!(request.validate().is_ok());

        request.name = "a".repeat(41);
        assert!(request.validate().is_err());
    }
}
