//! Account commands: register, login, password reset and profile

use crate::api::{ProfileUpdate, RegisterRequest, WardaClient};
use crate::error::Result;
use colored::Colorize;

/// Register a new account and print its id
pub async fn register(
    client: &WardaClient,
    name: String,
    email: String,
    phone: String,
    password: String,
) -> Result<()> {
    let request = RegisterRequest {
        name,
        email,
        phone,
        password,
    };
    let auth = client.register(&request).await?;

    println!(
        "{}",
        format!("Registered {} <{}>", auth.name, auth.email).green()
    );
    print_export_hint(auth.user_id);
    Ok(())
}

/// Log in and print the user id
///
/// The id is printed rather than stored; the shell owns persisting it.
pub async fn login(client: &WardaClient, email: &str, password: &str) -> Result<()> {
    let auth = client.login(email, password).await?;

    println!("{}", format!("Welcome back, {}", auth.name).green());
    print_export_hint(auth.user_id);
    Ok(())
}

/// Reset the password of an account
pub async fn reset_password(client: &WardaClient, email: &str, new_password: &str) -> Result<()> {
    let message = client.reset_password(email, new_password).await?;
    println!("{}", message.green());
    Ok(())
}

/// Show the profile, or update it when any field is given
///
/// The server replaces all three fields at once, so missing ones are filled
/// from the current profile before the update is sent.
pub async fn profile(
    client: &WardaClient,
    user_id: i64,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
) -> Result<()> {
    let current = client.profile(user_id).await?;

    let profile = if name.is_none() && email.is_none() && phone.is_none() {
        current
    } else {
        let update = ProfileUpdate {
            name: name.unwrap_or(current.name),
            email: email.unwrap_or(current.email),
            phone: phone.unwrap_or(current.phone),
        };
        let updated = client.update_profile(user_id, &update).await?;
        println!("{}", "Profile updated".green());
        updated
    };

    println!("{:<8} {}", "id".bold(), profile.id);
    println!("{:<8} {}", "name".bold(), profile.name);
    println!("{:<8} {}", "email".bold(), profile.email);
    println!("{:<8} {}", "phone".bold(), profile.phone);
    println!("{:<8} {}", "since".bold(), profile.created_at);
    Ok(())
}

fn print_export_hint(user_id: i64) {
    println!("User id: {}", user_id.to_string().cyan());
    println!(
        "Use {} to run further commands as this user.",
        format!("export WARDA_USER_ID={}", user_id).cyan()
    );
}
