//! Server-rendered HTML helpers.
//!
//! Pages are plain strings: [`layout`] wraps a body with the shared header, and
//! every interpolated value goes through [`escape`].

use axum::response::Html;

use crate::middleware::auth::Session;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f5f5f4; color: #1c1917; }
header { display: flex; justify-content: space-between; align-items: center; padding: 1rem 2rem; background: #1c1917; color: #fafaf9; }
header a { color: #fbbf24; text-decoration: none; font-weight: 600; }
main { max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
table { width: 100%; border-collapse: collapse; background: white; }
th, td { text-align: left; padding: .5rem .75rem; border-bottom: 1px solid #e7e5e4; }
.card { background: white; border-radius: .5rem; padding: 1.5rem; margin-bottom: 1.5rem; box-shadow: 0 1px 2px rgba(0,0,0,.08); }
.toast { padding: .75rem 1rem; border-radius: .375rem; margin-bottom: 1rem; background: #fee2e2; color: #991b1b; }
.toast.ok { background: #dcfce7; color: #166534; }
.field-error { color: #b91c1c; font-size: .875rem; }
.stats { display: grid; grid-template-columns: repeat(auto-fill, minmax(140px, 1fr)); gap: 1rem; }
"#;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Transient error banner.
pub fn toast(message: &str) -> String {
    format!(r#"<div class="toast" role="alert">{}</div>"#, escape(message))
}

pub fn success_toast(message: &str) -> String {
    format!(r#"<div class="toast ok" role="status">{}</div>"#, escape(message))
}

fn nav(session: Option<&Session>) -> String {
    match session {
        Some(session) => format!(
            r#"<nav><a href="{}">Painel</a> · {} <form method="post" action="/auth/logout" style="display:inline"><button type="submit">Sair</button></form></nav>"#,
            session.role().dashboard_path(),
            escape(session.email()),
        ),
        None => r#"<nav><a href="/auth/login">Entrar</a></nav>"#.to_string(),
    }
}

pub fn layout(title: &str, session: Option<&Session>, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · BarberPro</title>
<style>{STYLE}</style>
</head>
<body>
<header><a href="/">BarberPro</a>{nav}</header>
<main>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
        nav = nav(session),
    ))
}
