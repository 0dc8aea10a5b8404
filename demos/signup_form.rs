//! Signup form example - fail fast vs. report everything
//!
//! Run with: cargo run --example signup_form

use confluence::{binding, zip, zip_or_accumulate, Outcome};

// Domain types
#[derive(Debug, Clone, PartialEq)]
struct Email(String);

#[derive(Debug, Clone, PartialEq)]
struct Password(String);

#[derive(Debug, Clone, PartialEq)]
struct Age(u8);

#[derive(Debug, PartialEq)]
struct User {
    email: Email,
    password: Password,
    age: Age,
}

// Raw input from form
struct SignupForm {
    email: String,
    password: String,
    password_confirm: String,
    age: String,
}

#[derive(Debug, Clone, PartialEq)]
enum FormError {
    InvalidEmail { value: String },
    PasswordTooShort { min_length: usize },
    PasswordMismatch,
    InvalidAge { value: String },
    AgeTooYoung { age: u8, minimum: u8 },
}

fn validate_email(email: &str) -> Outcome<Email, FormError> {
    if email.contains('@') && email.contains('.') {
        Outcome::success(Email(email.to_string()))
    } else {
        Outcome::failure(FormError::InvalidEmail {
            value: email.to_string(),
        })
    }
}

fn validate_password(pwd: &str, confirm: &str) -> Outcome<Password, FormError> {
    binding(|scope| {
        scope.ensure(pwd.len() >= 8, || FormError::PasswordTooShort { min_length: 8 })?;
        scope.ensure(pwd == confirm, || FormError::PasswordMismatch)?;
        Ok(Password(pwd.to_string()))
    })
}

fn validate_age(raw: &str) -> Outcome<Age, FormError> {
    binding(|scope| {
        let age: u8 = scope.bind(raw.parse::<u8>().map_err(|_| FormError::InvalidAge {
            value: raw.to_string(),
        }))?;
        scope.ensure(age >= 13, || FormError::AgeTooYoung { age, minimum: 13 })?;
        Ok(Age(age))
    })
}

/// Stops at the first problem; good for APIs.
fn register_fast(form: &SignupForm) -> Outcome<User, FormError> {
    zip(
        (
            || validate_email(&form.email),
            || validate_password(&form.password, &form.password_confirm),
            || validate_age(&form.age),
        ),
        |(email, password, age)| User {
            email,
            password,
            age,
        },
    )
}

/// Reports every problem; good for showing a form back to a person.
fn register_all(form: &SignupForm) -> Outcome<User, Vec<FormError>> {
    zip_or_accumulate(
        (
            || validate_email(&form.email),
            || validate_password(&form.password, &form.password_confirm),
            || validate_age(&form.age),
        ),
        |(email, password, age)| User {
            email,
            password,
            age,
        },
    )
}

fn main() {
    let good = SignupForm {
        email: "ada@example.com".to_string(),
        password: "correct horse".to_string(),
        password_confirm: "correct horse".to_string(),
        age: "36".to_string(),
    };
    let bad = SignupForm {
        email: "not-an-email".to_string(),
        password: "short".to_string(),
        password_confirm: "shorter".to_string(),
        age: "9".to_string(),
    };

    println!("=== Valid form ===");
    println!("fail fast:  {:?}", register_fast(&good));
    println!("accumulate: {:?}", register_all(&good));

    println!("\n=== Invalid form ===");
    println!("fail fast:  {:?}", register_fast(&bad));
    match register_all(&bad) {
        Outcome::Success(user) => println!("unexpected success: {:?}", user),
        Outcome::Failure(errors) => {
            println!("accumulate: {} problems", errors.len());
            for error in errors {
                println!("  - {:?}", error);
            }
        }
    }
}
