use axum::response::Html;

use crate::html::{escape, layout, toast};
use crate::validator::FieldErrors;

use super::model::LoginForm;

fn field_error(errors: &FieldErrors, field: &str) -> String {
    errors
        .get(field)
        .map(|message| format!(r#"<p class="field-error">{}</p>"#, escape(message)))
        .unwrap_or_default()
}

/// The login page. The password is never echoed back.
pub fn login_page(form: &LoginForm, errors: &FieldErrors, banner: Option<&str>) -> Html<String> {
    let body = format!(
        r#"<section class="card">
<h1>Entrar</h1>
{banner}
<form method="post" action="/auth/login" novalidate>
<label for="email">E-mail</label><br>
<input id="email" name="email" type="email" value="{email}" autocomplete="username"><br>
{email_error}
<label for="password">Senha</label><br>
<input id="password" name="password" type="password" autocomplete="current-password"><br>
{password_error}
<button type="submit">Entrar</button>
</form>
</section>"#,
        banner = banner.map(toast).unwrap_or_default(),
        email = escape(&form.email),
        email_error = field_error(errors, "email"),
        password_error = field_error(errors, "password"),
    );
    layout("Entrar", None, &body)
}
