//! Administrator management: list, create, edit and delete.
//!
//! Listing needs super admin. Creating needs the owner tier. Editing and
//! deleting follow [`bicho_core::permissions::can_modify`]: a strictly higher
//! rank than the target, at least super super admin, and never oneself.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use bicho_core::{Action, AdministratorId, Role};
use serde::Deserialize;
use tracing::instrument;

use crate::api::{Administrator, AdministratorInput};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{CurrentAdmin, RequireAdminAuth, require};
use crate::state::AppState;

use super::{AdminView, Outcome, SearchParams, confirm_page, notice_page, render};

const PATH: &str = "/app/administrator";

const CREATED: Outcome = Outcome {
    success: "Administrador criado!",
    failure: "Administrador não pode ser criado!",
};

const EDITED: Outcome = Outcome {
    success: "Administrador editado!",
    failure: "Administrador não pode ser editado!",
};

const DELETED: Outcome = Outcome {
    success: "Administrador eliminado!",
    failure: "Administrador não pode ser eliminado!",
};

fn matches(row: &AdministratorRow, query: &str) -> bool {
    row.administrator.haystack().contains(query)
}

// =============================================================================
// Form validation
// =============================================================================

/// Validate a new password: 12 to 128 characters.
///
/// # Errors
///
/// Returns the message to show next to the field.
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    let len = password.chars().count();
    if len == 0 {
        Err("Senha é obrigatória")
    } else if !(12..=128).contains(&len) {
        Err("Senha deve ter entre 12 e 128 caracteres")
    } else {
        Ok(())
    }
}

/// Parse a fixed-width number with no leading zero.
fn fixed_digits(value: &str, width: usize) -> Option<u64> {
    let value = value.trim();
    if value.len() != width || value.starts_with('0') || !value.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    value.parse().ok()
}

/// Administrator form fields as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdministratorForm {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub bank_account: String,
    #[serde(default)]
    pub password: String,
}

impl AdministratorForm {
    /// Prefill from an existing administrator. The password stays empty.
    #[must_use]
    pub fn from_administrator(administrator: &Administrator) -> Self {
        Self {
            role: administrator.role.as_str().to_string(),
            name: administrator.name.clone(),
            phone: administrator.phone.clone(),
            bank_account: administrator.bank_account.clone(),
            password: String::new(),
        }
    }

    /// Check every field. `assignable` lists the roles the actor may grant.
    ///
    /// # Errors
    ///
    /// Returns one message per invalid field.
    pub fn validate(&self, assignable: &[Role]) -> Result<AdministratorInput, Vec<&'static str>> {
        let mut errors = Vec::new();

        let role = self
            .role
            .parse::<Role>()
            .ok()
            .filter(|role| assignable.contains(role));
        if role.is_none() {
            errors.push("Cargo inválido");
        }

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("Nome é obrigatório");
        } else if name.chars().count() > 128 {
            errors.push("Nome deve ter entre 1 e 128 caracteres");
        }

        if self.phone.trim().is_empty() {
            errors.push("Nº de telefone é obrigatório");
        } else if fixed_digits(&self.phone, 10).is_none() {
            errors.push("Nº de telefone deve ter 10 caracteres");
        }

        let bank_account = if self.bank_account.trim().is_empty() {
            errors.push("Conta bancária é obrigatória");
            None
        } else {
            let parsed = fixed_digits(&self.bank_account, 8);
            if parsed.is_none() {
                errors.push("Conta bancária deve ter 8 caracteres");
            }
            parsed
        };

        if let Err(message) = validate_password(&self.password) {
            errors.push(message);
        }

        match (role, bank_account) {
            (Some(role), Some(bank_account)) if errors.is_empty() => Ok(AdministratorInput {
                role,
                name: name.to_string(),
                phone: self.phone.trim().to_string(),
                bank_account,
                password: self.password.clone(),
            }),
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// One card on the administrators page.
#[derive(Debug, Clone)]
pub struct AdministratorRow {
    pub administrator: Administrator,
    /// Edit and delete are offered.
    pub can_modify: bool,
}

/// Administrators list template.
#[derive(Template)]
#[template(path = "administrators/index.html")]
pub struct AdministratorsTemplate {
    pub admin: AdminView,
    pub query: String,
    pub total: usize,
    pub administrators: Vec<AdministratorRow>,
    pub can_create: bool,
}

/// A role choice in the form.
#[derive(Debug, Clone)]
pub struct RoleOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Create/edit form template.
#[derive(Template)]
#[template(path = "administrators/form.html")]
pub struct AdministratorFormTemplate {
    pub admin: AdminView,
    pub title: &'static str,
    pub submit: &'static str,
    pub action: String,
    pub roles: Vec<RoleOption>,
    pub form: AdministratorForm,
    pub errors: Vec<&'static str>,
}

struct FormPage {
    title: &'static str,
    submit: &'static str,
    action: String,
}

fn form_page(
    admin: &CurrentAdmin,
    page: FormPage,
    form: AdministratorForm,
    errors: Vec<&'static str>,
) -> Html<String> {
    let roles = admin
        .role()
        .below()
        .into_iter()
        .map(|role| RoleOption {
            value: role.as_str(),
            label: role.label(),
            selected: role.as_str() == form.role,
        })
        .collect();

    render(&AdministratorFormTemplate {
        admin: AdminView::new(admin, PATH),
        title: page.title,
        submit: page.submit,
        action: page.action,
        roles,
        form,
        errors,
    })
}

fn create_page() -> FormPage {
    FormPage {
        title: "Criar administrador",
        submit: "Criar",
        action: format!("{PATH}/create"),
    }
}

fn edit_page(id: &AdministratorId) -> FormPage {
    FormPage {
        title: "Editar administrador",
        submit: "Editar",
        action: format!("{PATH}/{}", urlencoding::encode(id.as_str())),
    }
}

fn back_to_list() -> Response {
    Redirect::to(PATH).into_response()
}

/// Fetch `id` if the actor may modify it.
async fn modifiable(
    admin: &CurrentAdmin,
    id: &AdministratorId,
) -> Result<Option<Administrator>, AppError> {
    let target = admin.api.get_administrator(id).await?;
    Ok(target.filter(|target| admin.can_modify(target)))
}

// =============================================================================
// Handlers
// =============================================================================

/// Build the administrators router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(PATH, get(index))
        .route("/app/administrator/create", get(new).post(create))
        .route("/app/administrator/{id}", get(edit).post(update))
        .route(
            "/app/administrator/{id}/delete",
            get(confirm_delete).post(delete),
        )
}

/// Administrators list page (super admin and up).
///
/// GET /app/administrator?q=
#[instrument(skip(admin))]
async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    if let Err(redirect) = require(&admin, Action::ViewAdministrators) {
        return Ok(redirect.into_response());
    }

    let rows: Vec<AdministratorRow> = admin
        .api
        .list_administrators()
        .await?
        .into_iter()
        .map(|administrator| AdministratorRow {
            can_modify: admin.can_modify(&administrator),
            administrator,
        })
        .collect();
    let total = rows.len();
    let search = params.apply(rows, matches);

    Ok(render(&AdministratorsTemplate {
        admin: AdminView::new(&admin, PATH),
        query: params.query().to_string(),
        total,
        administrators: search.to_vec(),
        can_create: admin.can(Action::CreateAdministrator),
    })
    .into_response())
}

/// Empty create form (owner only).
///
/// GET /app/administrator/create
async fn new(RequireAdminAuth(admin): RequireAdminAuth) -> Response {
    if let Err(redirect) = require(&admin, Action::CreateAdministrator) {
        return redirect.into_response();
    }

    let form = AdministratorForm {
        role: Role::Admin.as_str().to_string(),
        ..AdministratorForm::default()
    };
    form_page(&admin, create_page(), form, Vec::new()).into_response()
}

/// Create an administrator.
///
/// POST /app/administrator/create
#[instrument(skip_all)]
async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    Form(form): Form<AdministratorForm>,
) -> Response {
    if let Err(redirect) = require(&admin, Action::CreateAdministrator) {
        return redirect.into_response();
    }

    match form.validate(&admin.role().below()) {
        Ok(input) => {
            let result = admin.api.create_administrator(&input).await;
            notice_page(&admin, PATH, result, CREATED).into_response()
        }
        Err(errors) => form_page(&admin, create_page(), form, errors).into_response(),
    }
}

/// Edit form for an administrator of lower rank.
///
/// GET /app/administrator/{id}
#[instrument(skip(admin))]
async fn edit(
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<AdministratorId>,
) -> Result<Response, AppError> {
    let Some(target) = modifiable(&admin, &id).await? else {
        return Ok(back_to_list());
    };

    let form = AdministratorForm::from_administrator(&target);
    Ok(form_page(&admin, edit_page(&target.id), form, Vec::new()).into_response())
}

/// Save an administrator's new data.
///
/// POST /app/administrator/{id}
#[instrument(skip_all, fields(administrator_id = %id))]
async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<AdministratorId>,
    Form(form): Form<AdministratorForm>,
) -> Result<Response, AppError> {
    let Some(target) = modifiable(&admin, &id).await? else {
        return Ok(back_to_list());
    };

    Ok(match form.validate(&admin.role().below()) {
        Ok(input) => {
            let result = admin.api.update_administrator(&target.id, &input).await;
            notice_page(&admin, PATH, result, EDITED).into_response()
        }
        Err(errors) => form_page(&admin, edit_page(&target.id), form, errors).into_response(),
    })
}

/// Ask before deleting an administrator.
///
/// GET /app/administrator/{id}/delete
#[instrument(skip(admin))]
async fn confirm_delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<AdministratorId>,
) -> Result<Response, AppError> {
    let Some(target) = modifiable(&admin, &id).await? else {
        return Ok(back_to_list());
    };

    Ok(confirm_page(
        &admin,
        PATH,
        format!(
            "Tem certeza que deseja eliminar o administrador (id: {})?",
            target.id
        ),
        format!("{PATH}/{}/delete", urlencoding::encode(target.id.as_str())),
    )
    .into_response())
}

/// Delete an administrator and acknowledge the outcome.
///
/// POST /app/administrator/{id}/delete
#[instrument(skip_all, fields(administrator_id = %id))]
async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<AdministratorId>,
) -> Result<Response, AppError> {
    let Some(target) = modifiable(&admin, &id).await? else {
        return Ok(back_to_list());
    };

    let result = admin.api.delete_administrator(&target.id).await;
    Ok(notice_page(&admin, PATH, result, DELETED).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> AdministratorForm {
        AdministratorForm {
            role: "ADMIN".to_string(),
            name: "Dave Crookman".to_string(),
            phone: "1234567890".to_string(),
            bank_account: "61234567".to_string(),
            password: "suasenhasuperforte".to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        let input = valid_form().validate(&Role::Owner.below()).unwrap();
        assert_eq!(input.role, Role::Admin);
        assert_eq!(input.bank_account, 61_234_567);
        assert_eq!(input.phone, "1234567890");
    }

    #[test]
    fn test_role_must_be_assignable() {
        let form = AdministratorForm {
            role: "SUPERSUPERADMIN".to_string(),
            ..valid_form()
        };
        let errors = form.validate(&Role::SuperSuperAdmin.below()).unwrap_err();
        assert_eq!(errors, vec!["Cargo inválido"]);

        let form = AdministratorForm {
            role: "ODONODAPORRATODA".to_string(),
            ..valid_form()
        };
        assert!(form.validate(&Role::Owner.below()).is_err());
    }

    #[test]
    fn test_field_rules() {
        let form = AdministratorForm {
            role: "ADMIN".to_string(),
            name: "x".repeat(129),
            phone: "0123456789".to_string(),
            bank_account: "1234".to_string(),
            password: "curta".to_string(),
        };
        let errors = form.validate(&Role::Owner.below()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Nome deve ter entre 1 e 128 caracteres",
                "Nº de telefone deve ter 10 caracteres",
                "Conta bancária deve ter 8 caracteres",
                "Senha deve ter entre 12 e 128 caracteres",
            ]
        );
    }

    #[test]
    fn test_required_fields() {
        let errors = AdministratorForm {
            role: "ADMIN".to_string(),
            ..AdministratorForm::default()
        }
        .validate(&Role::Owner.below())
        .unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Nome é obrigatório",
                "Nº de telefone é obrigatório",
                "Conta bancária é obrigatória",
                "Senha é obrigatória",
            ]
        );
    }

    #[test]
    fn test_validate_password_bounds() {
        assert!(validate_password(&"a".repeat(12)).is_ok());
        assert!(validate_password(&"a".repeat(128)).is_ok());
        assert!(validate_password(&"a".repeat(11)).is_err());
        assert!(validate_password(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_form_offers_only_lower_roles() {
        let admin = super::super::test_support::current(Role::SuperSuperAdmin);
        let html = form_page(&admin, create_page(), valid_form(), Vec::new()).0;
        assert!(html.contains(r#"value="ADMIN""#));
        assert!(html.contains(r#"value="SUPERADMIN""#));
        assert!(!html.contains(r#"value="SUPERSUPERADMIN""#));
    }
}
