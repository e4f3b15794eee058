use axum::response::Html;

use barberpro_backend::BackendError;
use barberpro_cli::health::HealthReport;

use crate::html::{escape, layout, success_toast, toast};
use crate::middleware::auth::Session;

pub fn landing(session: Option<&Session>) -> Html<String> {
    let call_to_action = match session {
        Some(session) => format!(
            r#"<a href="{}">Ir para o meu painel</a>"#,
            session.role().dashboard_path()
        ),
        None => r#"<a href="/auth/login">Entrar</a>"#.to_string(),
    };
    let body = format!(
        r#"<section class="card">
<h1>BarberPro</h1>
<p>Agendamentos, horários e serviços da sua barbearia em um só lugar.</p>
<p>{call_to_action}</p>
</section>
<p><a href="/test">Testar conexão com o servidor</a></p>"#
    );
    layout("Início", session, &body)
}

pub fn health(session: Option<&Session>, result: &Result<HealthReport, BackendError>) -> Html<String> {
    let details = match result {
        Ok(report) if report.healthy() => {
            success_toast("Conexão OK: todas as tabelas e dados padrão estão presentes.")
        }
        Ok(report) => {
            let items: String = report
                .issues
                .iter()
                .map(|issue| format!("<li><code>{}</code></li>", escape(&issue.to_string())))
                .collect();
            format!(
                r#"{banner}
<ul>{items}</ul>
<p>Execute <code>barberpro-cli health-check --fix</code> para corrigir.</p>"#,
                banner = toast("O banco de dados precisa de manutenção."),
            )
        }
        Err(err) => toast(&format!("Falha ao consultar o servidor: {err}")),
    };
    let body = format!(r#"<section class="card"><h1>Teste de conexão</h1>{details}</section>"#);
    layout("Teste de conexão", session, &body)
}
