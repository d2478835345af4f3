use super::{email, min_length, non_empty, optional, phone, required, Form};
use crate::error::{ValidationError, ValidationErrors};
use crate::models::{LoginRequest, PasswordChange, ProfileUpdate, RegisterRequest};

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl Form for LoginForm {
    type Output = LoginRequest;

    fn validate(&self) -> Result<LoginRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(required("email", &self.email).and_then(|_| email("email", &self.email)));
        errors.check(required("password", &self.password));

        errors.into_result(LoginRequest {
            email: self.email.trim().to_lowercase(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl Form for RegisterForm {
    type Output = RegisterRequest;

    fn validate(&self) -> Result<RegisterRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(required("name", &self.name));
        errors.check(required("email", &self.email).and_then(|_| email("email", &self.email)));
        errors.check(optional(&self.phone, |v| phone("phone", v)));
        errors.check(
            required("password", &self.password)
                .and_then(|_| min_length("password", &self.password, MIN_PASSWORD_LENGTH)),
        );
        errors.check(passwords_match(&self.password, &self.confirm_password));

        errors.into_result(RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password: self.password.clone(),
            phone: non_empty(&self.phone),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Form for ProfileForm {
    type Output = ProfileUpdate;

    fn validate(&self) -> Result<ProfileUpdate, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(required("name", &self.name));
        errors.check(required("email", &self.email).and_then(|_| email("email", &self.email)));
        errors.check(optional(&self.phone, |v| phone("phone", v)));

        errors.into_result(ProfileUpdate {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: non_empty(&self.phone),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl Form for PasswordForm {
    type Output = PasswordChange;

    fn validate(&self) -> Result<PasswordChange, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(required("currentPassword", &self.current_password));
        errors.check(
            required("newPassword", &self.new_password)
                .and_then(|_| min_length("newPassword", &self.new_password, MIN_PASSWORD_LENGTH)),
        );
        errors.check(passwords_match(&self.new_password, &self.confirm_password));
        if !self.new_password.is_empty() && self.new_password == self.current_password {
            errors.push(ValidationError::InvalidFormat {
                field: "newPassword".to_string(),
                reason: "must differ from the current password".to_string(),
            });
        }

        errors.into_result(PasswordChange {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
        })
    }
}

fn passwords_match(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password != confirmation {
        return Err(ValidationError::Mismatch {
            field: "confirmPassword".to_string(),
            other: "password".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_validity_toggles() {
        let mut form = LoginForm::default();
        assert!(!form.is_valid());

        form.email = " Rider@Example.com ".to_string();
        assert!(!form.is_valid());

        form.password = "secret".to_string();
        let request = form.validate().unwrap();
        assert_eq!(request.email, "rider@example.com");
    }

    #[test]
    fn test_register_collects_every_failure() {
        let form = RegisterForm {
            name: "".to_string(),
            email: "not-an-email".to_string(),
            phone: "123".to_string(),
            password: "short".to_string(),
            confirm_password: "different".to_string(),
        };
        let errors = form.validate().unwrap_err();
        for field in ["name", "email", "phone", "password", "confirmPassword"] {
            assert!(errors.has_field(field), "missing error for {}", field);
        }
    }

    #[test]
    fn test_register_blank_phone_is_omitted() {
        let form = RegisterForm {
            name: "Achieng".to_string(),
            email: "achieng@example.com".to_string(),
            phone: "  ".to_string(),
            password: "longenough".to_string(),
            confirm_password: "longenough".to_string(),
        };
        assert_eq!(form.validate().unwrap().phone, None);
    }

    #[test]
    fn test_password_must_change() {
        let form = PasswordForm {
            current_password: "samesame1".to_string(),
            new_password: "samesame1".to_string(),
            confirm_password: "samesame1".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.has_field("newPassword"));
    }
}
