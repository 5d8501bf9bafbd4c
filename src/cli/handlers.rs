// src/cli/handlers.rs
use crate::application::{
    AdminConsole, AuthContext, TagEditor, TagExporter, TagGenerationService,
};
use crate::cli::args::{
    AdminCommand, AdminPlanCommand, AdminUserCommand, AuthCommand, ConfigCommand, LinkCommand,
    TagCommand,
};
use crate::domain::{
    DomainError, ExportFormat, ExportScope, PlanDraft, QuotaDecision, Registration,
};
use crate::infrastructure::{
    AuthClient, Config, FileTokenStore, JsonWorkspaceRepository, NlpClient, SystemClipboard,
};
use crate::ports::console;
use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

type Session = AuthContext<AuthClient, FileTokenStore>;

/// Resolved configuration plus the paths every command works against.
#[derive(Debug)]
pub struct Workbench {
    pub config: Config,
    pub config_path: PathBuf,
    pub workspace_path: PathBuf,
}

impl Workbench {
    pub fn new(config: Config, config_path: PathBuf, workspace: Option<PathBuf>) -> Result<Self> {
        let workspace_path = match workspace {
            Some(path) => path,
            None => config.workspace_path()?,
        };
        debug!(config = %config_path.display(), workspace = %workspace_path.display(), "Workbench ready");
        Ok(Self {
            config,
            config_path,
            workspace_path,
        })
    }

    fn editor(&self) -> TagEditor<JsonWorkspaceRepository> {
        let repository = JsonWorkspaceRepository::new(&self.workspace_path)
            .with_default_base_url(self.config.default_base_url());
        TagEditor::new(repository)
    }

    fn session(&self) -> Result<Session> {
        let client = AuthClient::new(&self.config.api.auth_url, self.config.api.auth_timeout_secs)?;
        let store = FileTokenStore::new(self.config.session_path()?);
        Ok(AuthContext::new(client, store))
    }

    /// Session restored from stored tokens; errors when nobody is logged in.
    fn logged_in(&self) -> Result<Session> {
        let mut session = self.session()?;
        if session.hydrate()?.is_none() {
            return Err(DomainError::LoginRequired.into());
        }
        Ok(session)
    }

    fn nlp(&self) -> Result<NlpClient> {
        NlpClient::new(&self.config.api.nlp_url, self.config.api.nlp_timeout_secs)
    }
}

pub fn generate(bench: &Workbench, text: Option<String>, file: Option<&Path>) -> Result<()> {
    let text = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read text from stdin")?;
            buf
        }
    };

    let mut session = bench.session()?;
    session.hydrate()?;
    let service = TagGenerationService::new(bench.nlp()?);
    let editor = bench.editor();

    let count = editor.edit(|workspace| service.generate(&mut session, workspace, &text))?;
    println!("Generated {count} tags\n");
    println!("{}", console::render_tag_list(&editor.workspace()?));
    if let QuotaDecision::Allowed { remaining } = session.quota() {
        println!("\n{remaining} tags remaining this month");
    }
    Ok(())
}

pub fn show_tags(bench: &Workbench, json: bool) -> Result<()> {
    let workspace = bench.editor().workspace()?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&workspace).context("Failed to serialize workspace")?
        );
    } else {
        println!("{}", console::render_tag_list(&workspace));
    }
    Ok(())
}

pub fn tag(bench: &Workbench, command: TagCommand) -> Result<()> {
    let editor = bench.editor();
    match command {
        TagCommand::Add { tag } => {
            if editor.add(&tag)? {
                println!("Added {}", tag.trim());
            } else {
                println!("Not added: tag is blank or already present");
            }
        }
        TagCommand::Rename { old, new } => {
            editor.rename(&old, &new)?;
            println!("Renamed {old} to {}", new.trim());
        }
        TagCommand::Remove { tag } => {
            if editor.remove(&tag)? {
                println!("Removed {tag}");
            } else {
                println!("No such tag: {tag}");
            }
        }
        TagCommand::Toggle { tag } => {
            let selected = editor.toggle(&tag)?;
            println!("{tag} {}", if selected { "selected" } else { "deselected" });
        }
        TagCommand::Select { tags } => {
            editor.edit(|ws| tags.iter().try_for_each(|t| ws.select(t)))?;
            println!("Selected {} tag(s)", tags.len());
        }
        TagCommand::Deselect { tags } => {
            let count = editor.edit(|ws| Ok(tags.iter().filter(|t| ws.deselect(t)).count()))?;
            println!("Deselected {count} tag(s)");
        }
        TagCommand::SelectAll => {
            let count = editor.select_all()?;
            println!("Selected all {count} tags");
        }
        TagCommand::DeselectAll => {
            editor.deselect_all()?;
            println!("Selection cleared");
        }
    }
    Ok(())
}

pub fn link(bench: &Workbench, command: LinkCommand) -> Result<()> {
    let editor = bench.editor();
    match command {
        LinkCommand::Set { tag, url } => {
            editor.set_link(&tag, &url)?;
            if url.trim().is_empty() {
                println!("Removed link of {tag}");
            } else {
                println!("Linked {tag} -> {}", url.trim());
            }
        }
        LinkCommand::Clear { tag } => {
            if editor.clear_link(&tag)? {
                println!("Removed link of {tag}");
            } else {
                println!("{tag} has no link");
            }
        }
        LinkCommand::Base { url, apply } => {
            let base = url.unwrap_or_default();
            let linked = editor.set_base_url(&base, apply)?;
            if base.trim().is_empty() {
                println!("Base URL cleared");
            } else {
                println!("Base URL set to {}", base.trim());
            }
            if apply {
                println!("Linked {linked} tag(s)");
            }
        }
    }
    Ok(())
}

pub fn export(
    bench: &Workbench,
    format: Option<ExportFormat>,
    selected: bool,
    to_stdout: bool,
) -> Result<()> {
    let workspace = bench.editor().workspace()?;
    let format = format.unwrap_or(bench.config.export.format);
    let scope = if selected {
        ExportScope::Selected
    } else {
        ExportScope::All
    };
    let exporter = TagExporter::new();
    let payload = exporter.render(&workspace, format, scope)?;

    if to_stdout {
        println!("{}", payload.primary());
        return Ok(());
    }
    let mut clipboard = SystemClipboard::new();
    let outcome = exporter.copy(&mut clipboard, &payload)?;
    println!("{} ({} tags, {format})", outcome.message(), payload.count);
    Ok(())
}

pub fn auth(bench: &Workbench, command: AuthCommand) -> Result<()> {
    let mut session = bench.session()?;
    match command {
        AuthCommand::Login { email, password } => {
            let user = session.login(&email, &password)?;
            println!("Logged in as {} <{}>", user.name, user.email);
        }
        AuthCommand::Register {
            name,
            email,
            password,
            confirm,
        } => {
            let confirm = confirm.unwrap_or_else(|| password.clone());
            let registration = Registration {
                name,
                email,
                password,
            };
            let user = session.register(registration, &confirm)?;
            println!("Registered {}", user.email);
            if !user.is_email_verified {
                println!("Check your inbox to verify your email address.");
            }
        }
        AuthCommand::Logout => {
            if session.restore_tokens() {
                session.logout();
                println!("Logged out");
            } else {
                println!("Not logged in");
            }
        }
        AuthCommand::Me { json } => {
            let user = session
                .hydrate()?
                .ok_or(DomainError::LoginRequired)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(user).context("Failed to serialize user")?
                );
            } else {
                println!("{}", console::render_user(user));
            }
        }
        AuthCommand::VerifyEmail { token } => {
            println!("{}", session.verify_email(&token)?);
        }
        AuthCommand::ForgotPassword { email } => {
            println!("{}", session.forgot_password(&email)?);
        }
        AuthCommand::ResetPassword {
            token,
            password,
            confirm,
        } => {
            let confirm = confirm.unwrap_or_else(|| password.clone());
            println!("{}", session.reset_password(&token, &password, &confirm)?);
        }
        AuthCommand::ChangePassword {
            current,
            new,
            confirm,
        } => {
            let mut session = bench.logged_in()?;
            let confirm = confirm.unwrap_or_else(|| new.clone());
            println!("{}", session.change_password(&current, &new, &confirm)?);
        }
        AuthCommand::ResendVerification { email } => {
            let email = match email {
                Some(email) => email,
                None => bench
                    .logged_in()?
                    .user()
                    .map(|u| u.email.clone())
                    .unwrap_or_default(),
            };
            println!("{}", session.resend_verification(&email)?);
        }
    }
    Ok(())
}

pub fn usage(bench: &Workbench) -> Result<()> {
    let session = bench.logged_in()?;
    if let Some(user) = session.user() {
        println!("{}", console::render_usage(user));
    }
    Ok(())
}

pub fn admin(bench: &Workbench, command: AdminCommand) -> Result<()> {
    let mut session = bench.logged_in()?;
    let mut admin_console = AdminConsole::open(&mut session, &bench.config.admin.emails)?;
    match command {
        AdminCommand::User(AdminUserCommand::List { json }) => {
            let users = admin_console.list_users()?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&users).context("Failed to serialize users")?
                );
            } else {
                print!("{}", console::render_user_table(&users));
            }
        }
        AdminCommand::User(AdminUserCommand::SetPlan { user_id, plan }) => {
            admin_console.set_user_plan(&user_id, plan)?;
            println!("User {user_id} moved to {}", plan.display_name());
        }
        AdminCommand::User(AdminUserCommand::Delete { user_id }) => {
            admin_console.delete_user(&user_id)?;
            println!("Deleted user {user_id}");
        }
        AdminCommand::Plan(AdminPlanCommand::List { json }) => {
            let plans = admin_console.list_plans()?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&plans).context("Failed to serialize plans")?
                );
            } else {
                print!("{}", console::render_plan_table(&plans));
            }
        }
        AdminCommand::Plan(AdminPlanCommand::Create {
            name,
            price,
            limit,
            features,
        }) => {
            let draft = PlanDraft {
                name: Some(name),
                price: Some(price),
                monthly_limit: Some(limit),
                features: Some(features),
            };
            let plan = admin_console.create_plan(&draft)?;
            println!("Created plan {} ({})", plan.name, plan.id);
        }
        AdminCommand::Plan(AdminPlanCommand::Update {
            plan_id,
            name,
            price,
            limit,
            features,
        }) => {
            let draft = PlanDraft {
                name,
                price,
                monthly_limit: limit,
                features: (!features.is_empty()).then_some(features),
            };
            let plan = admin_console.update_plan(&plan_id, &draft)?;
            println!("Updated plan {} ({})", plan.name, plan.id);
        }
        AdminCommand::Plan(AdminPlanCommand::Delete { plan_id }) => {
            admin_console.delete_plan(&plan_id)?;
            println!("Deleted plan {plan_id}");
        }
    }
    Ok(())
}

pub fn health(bench: &Workbench) -> Result<()> {
    let nlp = bench.nlp()?;
    let auth = AuthClient::new(&bench.config.api.auth_url, bench.config.api.auth_timeout_secs)?;
    let mut healthy = true;
    for (name, url, status) in [
        ("tag generation", nlp.base_url().to_string(), nlp.health()),
        ("auth", auth.base_url().to_string(), auth.health()),
    ] {
        match status {
            Ok(status) => println!("{name:<16} {url:<32} {status}"),
            Err(e) => {
                healthy = false;
                println!("{name:<16} {url:<32} DOWN ({e})");
            }
        }
    }
    if !healthy {
        bail!("One or more services are unavailable");
    }
    Ok(())
}

pub fn config(bench: &Workbench, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Init { force } => {
            if bench.config_path.exists() && !force {
                bail!(
                    "Config file already exists at {} (use --force to overwrite)",
                    bench.config_path.display()
                );
            }
            Config::create_default(&bench.config_path)?;
            info!(path = %bench.config_path.display(), "Config written");
            println!("Wrote {}", bench.config_path.display());
        }
        ConfigCommand::Show => {
            let rendered =
                toml::to_string_pretty(&bench.config).context("Failed to render config")?;
            println!("# {}\n{rendered}", bench.config_path.display());
            println!("# workspace: {}", bench.workspace_path.display());
        }
    }
    Ok(())
}
