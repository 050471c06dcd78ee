use anyhow::{Result, bail};
use colored::Colorize;
use newsdesk_core::i18n::{Language, MessageKey};
use newsdesk_core::session::{Access, Account, RouteGuard};

use super::prompt;
use crate::app::AppContext;

pub async fn login(
    ctx: &AppContext,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    println!(
        "{} {}",
        ctx.text(MessageKey::LoginWelcome).bright_magenta().bold(),
        format!("· {}", ctx.text(MessageKey::LoginTitle)).bright_black()
    );

    let username = match username {
        Some(username) => username,
        None => match prompt::line(ctx.text(MessageKey::LoginUsername))? {
            Some(username) if !username.trim().is_empty() => username.trim().to_string(),
            _ => bail!(ctx.text(MessageKey::LoginError)),
        },
    };

    let password = match password {
        Some(password) => password,
        None => match prompt::password(ctx.text(MessageKey::LoginPassword))? {
            Some(password) => password,
            None => bail!(ctx.text(MessageKey::LoginError)),
        },
    };

    match ctx.session.login(&username, &password).await {
        Ok(account) => {
            println!("{} {}", "✓".green(), login_success(ctx.language(), &account));
            Ok(())
        }
        Err(e) => bail!(e.user_message(ctx.language())),
    }
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    ctx.session.logout()?;
    println!("{}", ctx.text(MessageKey::LoggedOut).green());
    Ok(())
}

pub async fn status(ctx: &AppContext) -> Result<()> {
    println!("{}", ctx.text(MessageKey::SessionPending).bright_black());
    ctx.session.initialize().await;

    let session = ctx.session.session();
    match RouteGuard::evaluate(&session) {
        Access::Authorized => {
            if let Some(account) = session.account() {
                println!("{} {}", "●".green(), describe_account(account));
            }
        }
        Access::Pending | Access::Redirect => {
            println!(
                "{} {}",
                "○".bright_black(),
                ctx.text(MessageKey::SessionRequired)
            );
        }
    }
    println!(
        "{}",
        format!("  {} · {}", ctx.config.api_base_url, session.status()).bright_black()
    );
    Ok(())
}

fn login_success(language: Language, account: &Account) -> String {
    format!(
        "{}: {}",
        MessageKey::CommonSuccess.text(language),
        describe_account(account)
    )
}

fn describe_account(account: &Account) -> String {
    let mut line = account.display_name().to_string();
    if account.display_name() != account.username {
        line.push_str(&format!(" ({})", account.username));
    }
    if !account.email.is_empty() {
        line.push_str(&format!(" <{}>", account.email));
    }
    if account.is_admin {
        line.push_str(" [admin]");
    }
    if !account.active {
        line.push_str(" [inactive]");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsdesk_core::session::AccountId;

    #[test]
    fn test_describe_account() {
        let mut account = Account {
            id: AccountId::from(1),
            username: "admin".to_string(),
            email: String::new(),
            full_name: None,
            is_admin: true,
            active: true,
        };
        assert_eq!(describe_account(&account), "admin [admin]");

        account.full_name = Some("Maria Silva".to_string());
        account.email = "maria@example.com".to_string();
        account.is_admin = false;
        assert_eq!(
            describe_account(&account),
            "Maria Silva (admin) <maria@example.com>"
        );
    }

    #[test]
    fn test_login_success_is_localized() {
        let account = Account {
            id: AccountId::from("7"),
            username: "ana".to_string(),
            email: String::new(),
            full_name: None,
            is_admin: false,
            active: true,
        };

        assert_eq!(login_success(Language::Pt, &account), "Sucesso: ana");
        assert_eq!(login_success(Language::Es, &account), "Éxito: ana");
    }
}
