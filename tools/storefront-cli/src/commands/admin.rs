//! Admin dashboard commands.

use anyhow::{bail, Context as _, Result};
use chrono::Utc;
use dialoguer::{Confirm, Password};
use storefront_catalog::ProductId;
use storefront_data::{parse_price, AdminClient, ImageUpload, ProductForm};
use storefront_ui::admin::{NotificationKind, EMPTY_LIST_MESSAGE};
use storefront_ui::{AdminPage, ListState, LoginOutcome};

use super::{AdminArgs, AdminCommand, ProductFields};
use crate::context::Context;
use crate::output::{fit, tags_line};

/// Run the admin command.
pub async fn run(args: AdminArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AdminCommand::Login { password } => login(password, ctx).await,
        AdminCommand::Logout => logout(ctx),
        AdminCommand::Status => status(ctx),
        AdminCommand::List { html } => list(html, ctx).await,
        AdminCommand::Create(fields) => create(fields, ctx).await,
        AdminCommand::Update { id, fields } => update(ProductId::new(id), fields, ctx).await,
        AdminCommand::Delete { id, yes } => delete(ProductId::new(id), yes, ctx).await,
    }
}

async fn login(password: Option<String>, ctx: &Context) -> Result<()> {
    let mut page = ctx.admin_page()?;
    let password = match password {
        Some(password) => password,
        None => Password::new().with_prompt("Contraseña").interact()?,
    };

    match page.login(&password).await {
        LoginOutcome::Unlocked => {
            ctx.output.success("Sesión iniciada.");
            print_list(&page, false, ctx);
            Ok(())
        }
        LoginOutcome::Rejected => {
            let message = page
                .login_message()
                .map(|m| m.text.clone())
                .unwrap_or_default();
            bail!(message)
        }
        LoginOutcome::Unreachable => report(&page).map(|_| ()),
    }
}

fn logout(ctx: &Context) -> Result<()> {
    let mut session = ctx.session()?;
    session.clear()?;
    ctx.output.success("Sesión cerrada.");
    Ok(())
}

fn status(ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    let flag = session.flag().filter(|f| f.authenticated);

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "authenticated": flag.is_some(),
            "since": flag.as_ref().map(|f| f.since),
            "store": session.store().path(),
        }));
        return Ok(());
    }

    match flag {
        Some(flag) => {
            let minutes = (Utc::now() - flag.since).num_minutes().max(0);
            ctx.output.success(&format!(
                "Sesión activa desde {} (hace {} min)",
                flag.since.format("%Y-%m-%d %H:%M:%S UTC"),
                minutes
            ))
        }
        None => ctx.output.info("No hay sesión activa."),
    }
    ctx.output.kv("Almacén", &session.store().path().display().to_string());
    Ok(())
}

/// Open the dashboard from the stored session, or explain how to log in.
async fn unlocked_page(ctx: &Context) -> Result<AdminPage<AdminClient>> {
    let mut page = ctx.admin_page()?;
    let spinner = ctx.output.spinner("Cargando productos...");
    let unlocked = page.restore().await;
    spinner.finish_and_clear();
    if !unlocked {
        bail!("No has iniciado sesión. Ejecuta `storefront admin login` primero.");
    }
    Ok(page)
}

async fn list(html: bool, ctx: &Context) -> Result<()> {
    let page = unlocked_page(ctx).await?;
    if let ListState::Error(message) = page.list() {
        bail!("{message}");
    }
    print_list(&page, html, ctx);
    Ok(())
}

fn print_list(page: &AdminPage<AdminClient>, html: bool, ctx: &Context) {
    match page.list() {
        ListState::Table(products) => {
            if ctx.output.is_json() {
                ctx.output.json(products);
                return;
            }
            if html {
                ctx.output.raw(&page.render_table());
                return;
            }
            let widths = [6, 28, 14, 24, 30];
            ctx.output.table_row(&["ID", "Nombre", "Precio", "Categorías", "Etiquetas"], &widths);
            for product in products {
                ctx.output.table_row(
                    &[
                        product.id.to_string().as_str(),
                        fit(&product.name, 28).as_str(),
                        product.money(ctx.config.display.currency).display_code().as_str(),
                        fit(&product.categories.join(", "), 24).as_str(),
                        tags_line(product).as_str(),
                    ],
                    &widths,
                );
            }
        }
        ListState::Empty => ctx.output.info(EMPTY_LIST_MESSAGE),
        ListState::Error(message) => ctx.output.warn(message),
        ListState::Idle | ListState::Loading => {}
    }
}

/// Print the page's notification; an error notification becomes the command error.
fn report(page: &AdminPage<AdminClient>) -> Result<bool> {
    match page.notification() {
        Some(n) if n.kind == NotificationKind::Error => bail!("{}", n.message),
        Some(n) => {
            println!("{} {}", console::style("✓").green(), n.message);
            Ok(true)
        }
        None => Ok(false),
    }
}

fn apply_fields(mut form: ProductForm, fields: ProductFields) -> Result<ProductForm> {
    if let Some(name) = fields.name {
        form.name = name;
    }
    if let Some(price) = fields.price {
        form.price = parse_price(&price).map_err(|e| anyhow::anyhow!(e.user_message()))?;
    }
    if let Some(description) = fields.description {
        form.description = description;
    }
    if let Some(categories) = fields.categories {
        form.categories = categories;
    }
    if let Some(tags) = fields.tags {
        form.tags = tags;
    }
    if let Some(path) = fields.image {
        let upload = ImageUpload::from_path(&path)
            .map_err(|e| anyhow::anyhow!(e.user_message()))
            .with_context(|| format!("No se pudo usar la imagen {}", path.display()))?;
        form.image = Some(upload);
    }
    Ok(form)
}

async fn create(fields: ProductFields, ctx: &Context) -> Result<()> {
    if fields.name.is_none() || fields.price.is_none() {
        bail!("--name y --price son obligatorios");
    }
    let mut page = unlocked_page(ctx).await?;
    page.open_create();
    let initial = page.form().map(|f| f.initial.clone()).unwrap_or_default();
    let form = apply_fields(initial, fields)?;

    page.submit(form).await;
    report(&page)?;
    Ok(())
}

async fn update(id: ProductId, fields: ProductFields, ctx: &Context) -> Result<()> {
    let mut page = unlocked_page(ctx).await?;
    if !page.open_edit(id) {
        bail!("No existe un producto con id {id}");
    }
    let Some(state) = page.form() else {
        bail!("No existe un producto con id {id}");
    };
    if let Some(preview) = &state.preview {
        tracing::debug!(%preview, "current image");
    }
    let form = apply_fields(state.initial.clone(), fields)?;
    if form.image.is_none() {
        ctx.output.info("Se conserva la imagen actual.");
    }

    page.submit(form).await;
    report(&page)?;
    Ok(())
}

async fn delete(id: ProductId, yes: bool, ctx: &Context) -> Result<()> {
    let mut page = unlocked_page(ctx).await?;
    let Some(confirmation) = page.request_delete(id).cloned() else {
        bail!("No existe un producto con id {id}");
    };

    if !yes {
        ctx.output.header("Eliminar producto");
        ctx.output.kv("Nombre", &confirmation.name);
        ctx.output.kv("Precio", &confirmation.price);
        ctx.output.kv("Imagen", &confirmation.image);
        let confirmed = Confirm::new()
            .with_prompt("¿Eliminar este producto?")
            .default(false)
            .interact()?;
        if !confirmed {
            page.cancel_delete();
            ctx.output.warn("Eliminación cancelada");
            return Ok(());
        }
    }

    page.confirm_delete().await;
    report(&page)?;
    Ok(())
}
