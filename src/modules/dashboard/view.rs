use axum::response::Html;

use barberpro_models::{Appointment, Service, WorkingHours};

use crate::html::{escape, layout};
use crate::middleware::auth::Session;

use super::service::{AdminOverview, BarberAgenda, CustomerOverview};

const WEEKDAYS: [&str; 7] = [
    "Domingo", "Segunda", "Terça", "Quarta", "Quinta", "Sexta", "Sábado",
];

fn price(value: f64) -> String {
    format!("R$ {value:.2}").replace('.', ",")
}

fn services_table(services: &[Service]) -> String {
    if services.is_empty() {
        return "<p>Nenhum serviço cadastrado.</p>".to_string();
    }
    let rows: String = services
        .iter()
        .map(|s| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{} min</td><td>{}</td></tr>",
                escape(&s.name),
                price(s.price),
                s.duration_minutes,
                if s.is_active { "ativo" } else { "inativo" },
            )
        })
        .collect();
    format!(
        "<table><thead><tr><th>Serviço</th><th>Preço</th><th>Duração</th><th>Situação</th></tr></thead><tbody>{rows}</tbody></table>"
    )
}

fn appointments_table(appointments: &[Appointment], services: &[Service]) -> String {
    if appointments.is_empty() {
        return "<p>Nenhum agendamento.</p>".to_string();
    }
    let rows: String = appointments
        .iter()
        .map(|a| {
            let service = services
                .iter()
                .find(|s| s.id == a.service_id)
                .map(|s| escape(&s.name))
                .unwrap_or_else(|| "-".to_string());
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                a.appointment_date.format("%d/%m/%Y"),
                a.appointment_time.format("%H:%M"),
                service,
                a.status.as_str(),
                price(a.total_price),
                escape(a.notes.as_deref().unwrap_or("")),
            )
        })
        .collect();
    format!(
        "<table><thead><tr><th>Data</th><th>Hora</th><th>Serviço</th><th>Status</th><th>Total</th><th>Observações</th></tr></thead><tbody>{rows}</tbody></table>"
    )
}

fn hours_table(hours: &[WorkingHours]) -> String {
    if hours.is_empty() {
        return "<p>Nenhum horário definido.</p>".to_string();
    }
    let rows: String = hours
        .iter()
        .map(|h| {
            let day = WEEKDAYS
                .get(h.day_of_week as usize)
                .copied()
                .unwrap_or("?");
            let span = if h.is_available {
                format!("{} – {}", h.start_time.format("%H:%M"), h.end_time.format("%H:%M"))
            } else {
                "fechado".to_string()
            };
            let pause = match (h.break_start, h.break_end) {
                (Some(start), Some(end)) if h.is_available => {
                    format!("{} – {}", start.format("%H:%M"), end.format("%H:%M"))
                }
                _ => "-".to_string(),
            };
            format!("<tr><td>{day}</td><td>{span}</td><td>{pause}</td></tr>")
        })
        .collect();
    format!(
        "<table><thead><tr><th>Dia</th><th>Horário</th><th>Intervalo</th></tr></thead><tbody>{rows}</tbody></table>"
    )
}

pub fn admin(session: &Session, overview: &AdminOverview) -> Html<String> {
    let stats: String = overview
        .counts
        .iter()
        .map(|(table, count)| {
            format!(r#"<div class="card"><strong>{count}</strong><br>{table}</div>"#)
        })
        .collect();
    let body = format!(
        r#"<h1>Painel do administrador</h1>
<section class="stats">{stats}</section>
<section class="card"><h2>Catálogo de serviços</h2>{services}</section>"#,
        services = services_table(&overview.services),
    );
    layout("Administração", Some(session), &body)
}

pub fn barber(session: &Session, agenda: &BarberAgenda) -> Html<String> {
    let body = match &agenda.barber {
        None => "<h1>Agenda do barbeiro</h1>\n<p class=\"card\">Seu cadastro de barbeiro ainda não foi criado. Fale com o administrador.</p>".to_string(),
        Some(barber) => format!(
            r#"<h1>Agenda do barbeiro</h1>
<p>{specialty}</p>
<section class="card"><h2>Horários da semana</h2>{hours}</section>
<section class="card"><h2>Agendamentos</h2>{appointments}</section>"#,
            specialty = escape(barber.specialty.as_deref().unwrap_or("")),
            hours = hours_table(&agenda.hours),
            appointments = appointments_table(&agenda.appointments, &agenda.services),
        ),
    };
    layout("Barbeiro", Some(session), &body)
}

pub fn customer(session: &Session, overview: &CustomerOverview) -> Html<String> {
    let body = format!(
        r#"<h1>Olá, {email}</h1>
<section class="card"><h2>Meus agendamentos</h2>{appointments}</section>
<section class="card"><h2>Serviços disponíveis</h2>{services}</section>"#,
        email = escape(session.email()),
        appointments = appointments_table(&overview.appointments, &overview.services),
        services = services_table(&overview.services),
    );
    layout("Cliente", Some(session), &body)
}
