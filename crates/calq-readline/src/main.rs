//! Interactive terminal frontend for the calq client.
//!
//! Screen flow mirrors the product's pages: entry (login/register),
//! calculator, and profile. Each protected screen runs the authentication
//! gate before loading its own data; any authentication failure falls back
//! to the entry screen.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use calq_api::ApiClient;
use calq_app::{
    CalculatorController, DeleteOutcome, FormView, HistoryController, LoginController,
    ProfileEditor, Session, DELETE_CONFIRMATION,
};
use calq_core::api::{AuthApi, OperationsApi};
use calq_core::error::CalqError;
use calq_core::history::EMPTY_PLACEHOLDER;
use calq_core::operation::Operation;
use calq_core::profile::ProfileField;
use calq_infrastructure::{ConfigStorage, ProfileCache};

/// Characters forwarded to the expression buffer; everything else typed on
/// an expression line is ignored, the way unknown keys are.
const EXPRESSION_TOKENS: &str = "0123456789.+-*/()";

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        let commands = [
            "/ajuda",
            "/alternar",
            "/anterior",
            "/calculadora",
            "/deletar-conta",
            "/editar",
            "/estatisticas",
            "/historico",
            "/limpar",
            "/logout",
            "/pagina",
            "/perfil",
            "/proxima",
            "/sair",
        ];
        Self {
            commands: commands.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

type LineEditor = Editor<CliHelper, rustyline::history::DefaultHistory>;

/// Which screen the loop shows next.
enum Screen {
    Entry,
    Calculator,
    Profile,
    Quit,
}

/// One read from the editor, with the interrupt cases folded in.
enum Input {
    Line(String),
    Interrupted,
    Eof,
}

fn read_input(rl: &mut LineEditor, prompt: &str) -> Result<Input> {
    read_input_with_initial(rl, prompt, "")
}

fn read_input_with_initial(rl: &mut LineEditor, prompt: &str, initial: &str) -> Result<Input> {
    match rl.readline_with_initial(prompt, (initial, "")) {
        Ok(line) => {
            let trimmed = line.trim().to_string();
            if !trimmed.is_empty() {
                let _ = rl.add_history_entry(&line);
            }
            Ok(Input::Line(trimmed))
        }
        Err(rustyline::error::ReadlineError::Interrupted) => Ok(Input::Interrupted),
        Err(rustyline::error::ReadlineError::Eof) => Ok(Input::Eof),
        Err(err) => Err(err.into()),
    }
}

// ===== User-facing message helpers =====

fn show_error(message: &str) {
    println!("{}", message.red());
}

fn show_success(message: &str) {
    println!("{}", message.green());
}

fn show_info(message: &str) {
    println!("{}", message.bright_black());
}

/// The message shown to the user for a failed action.
fn user_message(err: &CalqError) -> String {
    match err {
        CalqError::Http { message, .. } => message.clone(),
        CalqError::SessionExpired => "Sessão expirada. Faça login novamente.".to_string(),
        CalqError::Validation(message) => message.clone(),
        CalqError::Network(message) => format!("Erro de conexão: {message}"),
        CalqError::MalformedResponse(_) => "Erro: formato de dados inválido".to_string(),
        other => other.to_string(),
    }
}

fn render_operations(operations: &[Operation]) {
    if operations.is_empty() {
        show_info(EMPTY_PLACEHOLDER);
        return;
    }

    for operation in operations {
        let [expression, result, when] = operation.display_lines();
        println!("  {}", expression);
        println!("  {}", result.bright_green());
        println!("  {}", when.bright_black());
        println!();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // ===== Backend Initialization =====
    let config = ConfigStorage::new()?.load()?;
    let api = Arc::new(ApiClient::new(&config)?);
    let auth: Arc<dyn AuthApi> = Arc::clone(&api) as Arc<dyn AuthApi>;
    let ops: Arc<dyn OperationsApi> = Arc::clone(&api) as Arc<dyn OperationsApi>;

    let mut session = Session::new(Arc::clone(&auth), ProfileCache::new()?);
    let login_controller = LoginController::new(Arc::clone(&auth));

    // ===== REPL Setup =====
    let mut rl: LineEditor = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Calculadora ===".bright_magenta().bold());
    show_info("Digite /ajuda para ver os comandos disponíveis.");
    println!();

    // ===== Screen Loop =====
    let mut screen = Screen::Entry;
    loop {
        screen = match screen {
            Screen::Entry => run_entry(&mut rl, &mut session, &login_controller).await?,
            Screen::Calculator => {
                run_calculator(&mut rl, &mut session, Arc::clone(&ops)).await?
            }
            Screen::Profile => {
                run_profile(&mut rl, &mut session, Arc::clone(&auth), Arc::clone(&ops)).await?
            }
            Screen::Quit => break,
        };
    }

    println!("{}", "Até logo!".bright_green());
    Ok(())
}

// ===== Entry screen (login / register) =====

async fn run_entry(
    rl: &mut LineEditor,
    session: &mut Session,
    controller: &LoginController,
) -> Result<Screen> {
    // A confirmed-valid cached profile skips the form entirely.
    if controller.startup_check(session).await {
        show_success("Sessão confirmada! Redirecionando...");
        return Ok(Screen::Calculator);
    }

    let mut view = FormView::default();
    let mut prefill_email = String::new();

    loop {
        match view {
            FormView::Login => show_info("— Login —"),
            FormView::Register => show_info("— Cadastro —"),
        }
        show_info(&format!("({} com /alternar; /sair encerra)", view.toggle_caption()));

        let email = match read_input_with_initial(rl, "Email: ", &prefill_email)? {
            Input::Line(line) if line == "/alternar" => {
                // Toggling clears any visible banner: just start the other
                // form fresh.
                view = view.toggle();
                continue;
            }
            Input::Line(line) if line == "/sair" => return Ok(Screen::Quit),
            Input::Line(line) if line == "/ajuda" => {
                show_info("Comandos: /alternar, /sair. Qualquer outro texto é o email.");
                continue;
            }
            Input::Line(line) => line,
            Input::Interrupted => continue,
            Input::Eof => return Ok(Screen::Quit),
        };

        if email.is_empty() {
            continue;
        }

        match view {
            FormView::Login => {
                let password = match read_input(rl, "Senha: ")? {
                    Input::Line(line) => line,
                    Input::Interrupted => continue,
                    Input::Eof => return Ok(Screen::Quit),
                };

                match controller.login(session, &email, &password).await {
                    Ok(_) => {
                        show_success("Login realizado com sucesso! Redirecionando...");
                        tokio::time::sleep(Duration::from_millis(1500)).await;
                        return Ok(Screen::Calculator);
                    }
                    Err(err) => show_error(&user_message(&err)),
                }
            }
            FormView::Register => {
                let name = match read_input(rl, "Nome: ")? {
                    Input::Line(line) => line,
                    Input::Interrupted => continue,
                    Input::Eof => return Ok(Screen::Quit),
                };
                let password = match read_input(rl, "Senha: ")? {
                    Input::Line(line) => line,
                    Input::Interrupted => continue,
                    Input::Eof => return Ok(Screen::Quit),
                };
                let confirmation = match read_input(rl, "Confirmar senha: ")? {
                    Input::Line(line) => line,
                    Input::Interrupted => continue,
                    Input::Eof => return Ok(Screen::Quit),
                };

                match controller
                    .register(&name, &email, &password, &confirmation)
                    .await
                {
                    Ok(profile) => {
                        show_success("Usuário registrado com sucesso! Você pode fazer login agora.");
                        view = FormView::Login;
                        prefill_email = profile.email;
                    }
                    Err(err) => show_error(&user_message(&err)),
                }
            }
        }
    }
}

// ===== Calculator screen =====

async fn run_calculator(
    rl: &mut LineEditor,
    session: &mut Session,
    ops: Arc<dyn OperationsApi>,
) -> Result<Screen> {
    // Authentication gate: must succeed before any screen data loads.
    if let Err(err) = session.authenticate().await {
        show_error(&user_message(&err));
        return Ok(Screen::Entry);
    }
    if let Some(header) = session.header_line() {
        println!("{}", header.bright_magenta());
    }

    let mut calculator = CalculatorController::new(Arc::clone(&ops));
    let mut history = HistoryController::new(Arc::clone(&ops));

    // Post-authentication hook: load the operation history.
    match history.refresh().await {
        Ok(()) => calculator.set_history(history.operations().to_vec()),
        Err(err) if err.is_session_expired() => {
            return expire_session(session, &err).await;
        }
        Err(err) => show_error(&user_message(&err)),
    }

    show_info("Digite a expressão e pressione Enter para calcular.");

    loop {
        let prompt = format!("{} ▸ ", calculator.value());
        let line = match read_input(rl, &prompt)? {
            Input::Line(line) => line,
            Input::Interrupted => {
                show_info("Digite /sair para encerrar.");
                continue;
            }
            Input::Eof => return Ok(Screen::Quit),
        };

        match line.as_str() {
            "/ajuda" => {
                show_info("Expressões: dígitos e + - * / ( ) .  |  Enter ou = calcula");
                show_info("c limpa o visor, < apaga o último caractere");
                show_info("Comandos: /historico /limpar /perfil /logout /sair");
            }
            "/sair" => return Ok(Screen::Quit),
            "/logout" => {
                session.logout().await;
                return Ok(Screen::Entry);
            }
            "/perfil" => return Ok(Screen::Profile),
            "/historico" => render_operations(calculator.history()),
            "/limpar" => {
                match clear_history(rl, &mut history).await? {
                    ClearOutcome::Cleared => calculator.set_history(Vec::new()),
                    ClearOutcome::SessionExpired(err) => {
                        return expire_session(session, &err).await;
                    }
                    ClearOutcome::Kept => {}
                }
            }
            "c" | "C" => calculator.clear(),
            "<" => {
                calculator.backspace();
            }
            _ => {
                // Expression input: feed tokens to the buffer; a line ending
                // in '=' (or an empty line) submits it.
                let (tokens, submit) = match line.strip_suffix('=') {
                    Some(rest) => (rest, true),
                    None => (line.as_str(), line.is_empty()),
                };

                for c in tokens.chars() {
                    if EXPRESSION_TOKENS.contains(c) {
                        calculator.append(c);
                    }
                }

                if submit {
                    match calculator.calculate().await {
                        Ok(operation) => {
                            show_success(&format!("= {}", operation.result));
                        }
                        Err(err) if err.is_session_expired() => {
                            return expire_session(session, &err).await;
                        }
                        Err(err) => show_error(&user_message(&err)),
                    }
                }
            }
        }
    }
}

enum ClearOutcome {
    Cleared,
    Kept,
    SessionExpired(CalqError),
}

/// Confirmation + destructive call for the clear-history action.
async fn clear_history(rl: &mut LineEditor, history: &mut HistoryController) -> Result<ClearOutcome> {
    show_info("Tem certeza que deseja limpar todo o histórico? Esta ação não pode ser desfeita.");
    let confirmed = match read_input(rl, "Confirmar? (sim/não): ")? {
        Input::Line(line) => matches!(line.as_str(), "sim" | "s"),
        _ => false,
    };

    match history.clear(confirmed).await {
        Ok(Some(deleted)) => {
            show_success(&format!(
                "Histórico limpo com sucesso! {deleted} operações foram removidas."
            ));
            show_info(EMPTY_PLACEHOLDER);
            Ok(ClearOutcome::Cleared)
        }
        Ok(None) => Ok(ClearOutcome::Kept),
        Err(err) if err.is_session_expired() => Ok(ClearOutcome::SessionExpired(err)),
        Err(err) => {
            show_error(&user_message(&err));
            Ok(ClearOutcome::Kept)
        }
    }
}

/// Session-expired handling shared by the protected screens: message,
/// short delay, forced logout, back to the entry screen.
async fn expire_session(session: &mut Session, err: &CalqError) -> Result<Screen> {
    show_error(&user_message(err));
    tokio::time::sleep(Duration::from_secs(2)).await;
    session.logout().await;
    Ok(Screen::Entry)
}

// ===== Profile screen =====

async fn run_profile(
    rl: &mut LineEditor,
    session: &mut Session,
    auth: Arc<dyn AuthApi>,
    ops: Arc<dyn OperationsApi>,
) -> Result<Screen> {
    // Authentication gate, then the screen's own loads.
    if let Err(err) = session.authenticate().await {
        show_error(&user_message(&err));
        return Ok(Screen::Entry);
    }

    let mut history = HistoryController::new(Arc::clone(&ops));
    let mut editor = ProfileEditor::new(Arc::clone(&auth));

    match history.refresh().await {
        Ok(()) => {}
        Err(err) if err.is_session_expired() => {
            return expire_session(session, &err).await;
        }
        Err(err) => show_error(&user_message(&err)),
    }

    render_profile(session, &history);

    loop {
        let line = match read_input(rl, "perfil ▸ ")? {
            Input::Line(line) => line,
            Input::Interrupted => {
                show_info("Digite /sair para encerrar.");
                continue;
            }
            Input::Eof => return Ok(Screen::Quit),
        };

        match line.as_str() {
            "/ajuda" => {
                show_info("Comandos: /editar nome|email, /historico, /proxima, /anterior,");
                show_info("/pagina N, /estatisticas, /limpar, /deletar-conta, /calculadora,");
                show_info("/logout, /sair");
            }
            "/sair" => return Ok(Screen::Quit),
            "/logout" => {
                session.logout().await;
                return Ok(Screen::Entry);
            }
            "/calculadora" => return Ok(Screen::Calculator),
            "/historico" => render_history_page(&history),
            "/proxima" => {
                history.next_page();
                render_history_page(&history);
            }
            "/anterior" => {
                history.prev_page();
                render_history_page(&history);
            }
            "/estatisticas" => render_stats(&history),
            "/limpar" => {
                if let ClearOutcome::SessionExpired(err) =
                    clear_history(rl, &mut history).await?
                {
                    return expire_session(session, &err).await;
                }
            }
            "/deletar-conta" => match delete_account(rl, session, &editor).await? {
                Some(next) => return Ok(next),
                None => {}
            },
            _ if line.starts_with("/pagina") => {
                match line.split_whitespace().nth(1).and_then(|n| n.parse().ok()) {
                    Some(page) => {
                        history.set_page(page);
                        render_history_page(&history);
                    }
                    None => show_error("Uso: /pagina N"),
                }
            }
            _ if line.starts_with("/editar") => {
                let field = match line.split_whitespace().nth(1) {
                    Some("nome") => ProfileField::Name,
                    Some("email") => ProfileField::Email,
                    _ => {
                        show_error("Uso: /editar nome|email");
                        continue;
                    }
                };

                if let Some(next) = edit_field(rl, session, &mut editor, field).await? {
                    return Ok(next);
                }
                render_profile(session, &history);
            }
            "" => render_profile(session, &history),
            _ => show_info("Comando desconhecido. Digite /ajuda."),
        }
    }
}

fn render_profile(session: &Session, history: &HistoryController) {
    let Some(profile) = session.profile() else {
        return;
    };

    println!();
    println!(
        "{}  {}",
        format!("({})", profile.avatar_initial()).bright_magenta().bold(),
        profile.name.bold()
    );
    println!("  Email: {}", profile.email);
    println!("  Membro desde: {}", profile.member_since());
    render_stats(history);
    println!();
}

fn render_stats(history: &HistoryController) {
    let stats = history.stats();
    println!(
        "  Operações: {} no total, {} hoje, {} na última semana",
        stats.total, stats.today, stats.last_week
    );
}

fn render_history_page(history: &HistoryController) {
    if history.is_empty() {
        show_info("Nenhuma operação encontrada.");
        return;
    }

    render_operations(history.page());
    if history.pager().has_multiple_pages() {
        show_info(&history.pager().status_line());
    }
}

/// Per-field edit flow: prompt with the current value pre-filled, then save
/// through the editor. Returns a screen change when the session expires.
async fn edit_field(
    rl: &mut LineEditor,
    session: &mut Session,
    editor: &mut ProfileEditor,
    field: ProfileField,
) -> Result<Option<Screen>> {
    if !editor.begin_edit(field) {
        show_error("Outro campo já está em edição.");
        return Ok(None);
    }

    let current = session
        .profile()
        .map(|p| field.value_of(p).to_string())
        .unwrap_or_default();
    let prompt = format!("{}: ", field.label());

    let value = match read_input_with_initial(rl, &prompt, &current)? {
        Input::Line(line) => line,
        Input::Interrupted | Input::Eof => {
            editor.cancel(session);
            show_info("Edição cancelada.");
            return Ok(None);
        }
    };

    if value == current {
        editor.cancel(session);
        show_info("Edição cancelada.");
        return Ok(None);
    }

    match editor.save(session, &value).await {
        Ok(_) => {
            show_success("Perfil atualizado com sucesso!");
            Ok(None)
        }
        Err(err) if err.is_session_expired() => {
            Ok(Some(expire_session(session, &err).await?))
        }
        Err(err) => {
            show_error(&user_message(&err));
            Ok(None)
        }
    }
}

/// Double-confirmation account deletion. Returns the next screen when the
/// account is gone (or the session expired), `None` otherwise.
async fn delete_account(
    rl: &mut LineEditor,
    session: &mut Session,
    editor: &ProfileEditor,
) -> Result<Option<Screen>> {
    show_error("⚠️  ATENÇÃO: Você está prestes a apagar sua conta permanentemente!");
    show_info("Esta ação irá deletar todos os seus dados e todo o histórico de operações,");
    show_info("e não poderá ser desfeita.");

    let first_confirm = match read_input(rl, "Tem certeza que deseja continuar? (sim/não): ")? {
        Input::Line(line) => matches!(line.as_str(), "sim" | "s"),
        _ => false,
    };

    let typed = if first_confirm {
        let prompt = format!(
            "Para confirmar a exclusão, digite \"{DELETE_CONFIRMATION}\" (em maiúsculas): "
        );
        match read_input(rl, &prompt)? {
            Input::Line(line) => line,
            _ => String::new(),
        }
    } else {
        String::new()
    };

    match editor.delete_account(session, first_confirm, &typed).await {
        Ok(DeleteOutcome::Deleted) => {
            show_success("Conta deletada com sucesso! Você será redirecionado para a página inicial.");
            Ok(Some(Screen::Entry))
        }
        Ok(DeleteOutcome::ConfirmationMismatch) => {
            show_error("Exclusão cancelada. Texto de confirmação incorreto.");
            Ok(None)
        }
        Ok(DeleteOutcome::Declined) => Ok(None),
        Err(err) if err.is_session_expired() => {
            Ok(Some(expire_session(session, &err).await?))
        }
        Err(err) => {
            show_error(&user_message(&err));
            Ok(None)
        }
    }
}
