// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine l'état de App, sans autre logique que :
// - itérer la liste déjà triée
// - déduire une couleur du statut (StatusTone)
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Widgets : Block, Paragraph, List, Clear
// 3. Layout : découpage de l'espace en zones
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::models::{Setup, StatusTone};
use crate::notifications::{Notification, NotificationKind};

/// Message affiché quand aucun setup n'est disponible hors chargement
pub const EMPTY_STATE_MESSAGE: &str = "No data received. Is the backend running?";

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);
    render_setups(frame, app, chunks[1]);

    if app.is_on_waitlist() {
        render_waitlist_footer(frame, app, chunks[2]);
    } else {
        render_footer(frame, app, chunks[2]);
    }

    // La popup passe par-dessus tout le reste
    if let Some(notification) = app.notifications.current() {
        render_notification(frame, notification, app.notifications.len());
    }
}

/// Header (5 lignes), contenu, footer (4 lignes)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(4),
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header : titre, bouton refresh, dernière mise à jour
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(" LiquidScan ")
        .title_alignment(Alignment::Center);

    // Le "bouton" est grisé pendant un scan
    let button = if app.is_loading() {
        Span::styled(
            "[r] Scanning Markets...",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::styled(
            "[r] Refresh Scan",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
    };

    let text = vec![
        Line::from(Span::styled(
            "ICT Market Scanner 2.0 · Liquidity Sweep & Trend Detection (15m)",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(button),
        Line::from(Span::styled(
            format!("Last Updated: {}", app.last_updated().unwrap_or("Never")),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Contenu : liste des setups
// ============================================================================

/// Style du statut selon sa tonalité
fn tone_style(tone: StatusTone) -> Style {
    match tone {
        StatusTone::Ict => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        StatusTone::Uptrend => Style::default().fg(Color::Green),
        StatusTone::Downtrend => Style::default().fg(Color::Red),
        StatusTone::Neutral => Style::default().fg(Color::Gray),
    }
}

/// Une ligne de la liste pour un setup
fn setup_line(setup: &Setup) -> Line<'_> {
    let symbol_style = if setup.is_hot {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut spans = vec![
        Span::raw(if setup.is_hot { " ⚡ " } else { "   " }),
        Span::styled(format!("{:<10}", setup.display_symbol()), symbol_style),
        Span::styled(format!("{:<28}", setup.status), tone_style(setup.tone())),
        Span::styled(format!("{:>12}", setup.price), Style::default().fg(Color::White)),
        Span::styled(format!("  {:<10}", setup.time), Style::default().fg(Color::DarkGray)),
    ];

    if setup.is_hot {
        spans.push(Span::styled(
            " High Probability ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }

    Line::from(spans)
}

fn render_setups(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        " Active Setups ({} · {} hot) ",
        app.setups().len(),
        app.hot_count()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(title);

    if app.setups().is_empty() {
        // Pendant le premier scan on n'affiche pas l'état vide
        let message = if app.shows_empty_state() {
            Span::styled(EMPTY_STATE_MESSAGE, Style::default().fg(Color::Gray))
        } else {
            Span::styled("Scanning Markets...", Style::default().fg(Color::DarkGray))
        };

        let paragraph = Paragraph::new(vec![Line::from(""), Line::from(message)])
            .block(block)
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .setups()
        .iter()
        .enumerate()
        .map(|(index, setup)| {
            let mut item = ListItem::new(setup_line(setup));
            if index == app.selected_index {
                item = item.style(Style::default().add_modifier(Modifier::REVERSED));
            }
            item
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

// ============================================================================
// Footer : raccourcis, confirmation de quit, dernière erreur
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        Line::from(vec![
            Span::styled("[q]", key),
            Span::raw(" Quit  "),
            Span::styled("[↑↓ / j k]", key),
            Span::raw(" Navigate  "),
            Span::styled("[r]", key),
            Span::raw(" Refresh  "),
            Span::styled("[w]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Join Waitlist"),
        ])
    };

    // Échec de scan : discret, les données affichées restent les anciennes
    let status = match app.last_error() {
        Some(err) => Line::from(Span::styled(
            format!("Last scan failed, showing previous data ({})", err),
            Style::default().fg(Color::DarkGray),
        )),
        None => Line::from(""),
    };

    let paragraph = Paragraph::new(vec![shortcuts, status])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Footer en mode waitlist : champ email + bouton
fn render_waitlist_footer(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.waitlist;
    let submitting = form.is_submitting();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Join the Waitlist ");

    let button_style = if submitting {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    };

    let mut input = vec![
        Span::styled("Email: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(form.email.as_str(), Style::default().fg(Color::White)),
    ];
    if !submitting {
        input.push(Span::styled(
            "█",
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    input.push(Span::raw("   "));
    input.push(Span::styled(format!(" {} ", form.label), button_style));

    let help_line = Line::from(vec![
        Span::styled("[Enter]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(" Submit  "),
        Span::styled("[ESC]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw(" Close"),
    ]);

    let paragraph = Paragraph::new(vec![Line::from(input), help_line])
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Popup de notification
// ============================================================================

/// Zone centrée de `width` x `height` dans `area`
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_notification(frame: &mut Frame, notification: &Notification, pending: usize) {
    let area = centered_rect(60, 7, frame.size());

    let (title, color) = match notification.kind {
        NotificationKind::Success => (" Success ", Color::Green),
        NotificationKind::Failure => (" Error ", Color::Red),
    };

    let title = if pending > 1 {
        format!("{}(1/{}) ", title, pending)
    } else {
        title.to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .title(title);

    let text = vec![
        Line::from(notification.message.as_str()),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] OK",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    // Clear efface ce qui est dessous avant de dessiner la popup
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================
// CONCEPT RATATUI : TestBackend
// - Terminal en mémoire, on inspecte le buffer après draw()
// ============================================================================
