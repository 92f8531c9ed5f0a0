use std::io::{BufRead, Write};
use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::actions::{self, DriverForm};
use crate::cli::args::{CliArgs, Command, DriverFormArgs, ListArgs};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::entities::{dashboard, drivers, new_drivers, trips};
use crate::fetcher::{ApiClient, ClientOptions, Envelope, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::output::{self, Document, OutputFormat};
use crate::pipeline::{normalize_record, ListSpec};
use crate::utils::{self, DisplayFormat};
use crate::view::{ListPage, Notice};

const DEFAULT_PER_PAGE: usize = 4;

/// Which listing a list command targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ListKind {
    Drivers,
    Trips,
    NewDrivers,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ListRequest {
    kind: ListKind,
    search: Option<String>,
    page: usize,
    per_page: usize,
}

#[derive(Clone, Debug, PartialEq)]
enum Action {
    Dashboard,
    List(ListRequest),
    ShowDriver(String),
    UpdateDriver { id: String, form: DriverForm },
    DeleteDriver { id: String, confirmed: bool },
}

#[derive(Clone, Debug)]
struct RunConfig {
    action: Action,
    client: ClientOptions,
    display: DisplayFormat,
    driver_envelope: Envelope,
    /// Page size of the driver list rendered after an update or delete.
    drivers_per_page: usize,
    output: Option<String>,
    output_format: OutputFormat,
    no_color: bool,
}

fn form_from_args(args: DriverFormArgs) -> DriverForm {
    DriverForm {
        full_name: args.full_name,
        contact_number: args.contact_number,
        email: args.email,
        status: args.status,
        make: args.make,
        model: args.model,
        number_plate: args.number_plate,
        salary: args.salary,
        bank_account: args.bank_account,
    }
}

fn list_request(kind: ListKind, list: ListArgs, configured: Option<usize>) -> ListRequest {
    ListRequest {
        kind,
        search: list.search,
        page: list.page.unwrap_or(1),
        per_page: list
            .per_page
            .or(configured)
            .unwrap_or(DEFAULT_PER_PAGE)
            .max(1),
    }
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let base_url = args
        .base_url
        .or(cfg.base_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    reqwest::Url::parse(base_url.trim()).map_err(|e| format!("invalid base URL '{base_url}': {e}"))?;
    let timeout_secs = args.timeout.or(cfg.timeout).unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err("invalid timeout, expected positive number of seconds".to_string());
    }
    let proxy = args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty());

    let date_format = args
        .date_format
        .or(cfg.date_format)
        .unwrap_or_else(|| utils::DEFAULT_DATE_FORMAT.to_string());
    utils::validate_date_format(&date_format)
        .map_err(|e| format!("invalid date format '{date_format}': {e}"))?;
    let currency_symbol = args
        .currency_symbol
        .or(cfg.currency_symbol)
        .unwrap_or_else(|| utils::DEFAULT_CURRENCY_SYMBOL.to_string());

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format_raw = args.output_format.or(cfg.output_format);
    let output_format = match output_format_raw.as_deref() {
        Some(raw) => OutputFormat::parse(raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected text, json or html"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    let config_envelope = match cfg.driver_envelope.as_deref() {
        Some(raw) => Some(
            Envelope::parse(raw)
                .ok_or_else(|| format!("invalid driver_envelope '{raw}', expected data or bare"))?,
        ),
        None => None,
    };

    let mut driver_envelope = config_envelope.unwrap_or(Envelope::DATA);
    let mut drivers_per_page = cfg.drivers_per_page.unwrap_or(DEFAULT_PER_PAGE).max(1);
    let action = match args.command {
        Some(Command::Dashboard) => Action::Dashboard,
        Some(Command::Drivers { list, envelope }) => {
            if let Some(raw) = envelope.as_deref() {
                driver_envelope = Envelope::parse(raw)
                    .ok_or_else(|| format!("invalid --envelope '{raw}', expected data or bare"))?;
            }
            Action::List(list_request(ListKind::Drivers, list, cfg.drivers_per_page))
        }
        Some(Command::Trips { list }) => {
            Action::List(list_request(ListKind::Trips, list, cfg.trips_per_page))
        }
        Some(Command::NewDrivers { list }) => Action::List(list_request(
            ListKind::NewDrivers,
            list,
            cfg.new_drivers_per_page,
        )),
        Some(Command::Driver { id }) => Action::ShowDriver(id.trim().to_string()),
        Some(Command::UpdateDriver { id, form, per_page }) => {
            drivers_per_page = per_page.unwrap_or(drivers_per_page).max(1);
            let form = form_from_args(form);
            if form.is_empty() {
                return Err("update-driver needs at least one field to change".to_string());
            }
            form.validate().map_err(|e| e.to_string())?;
            Action::UpdateDriver {
                id: id.trim().to_string(),
                form,
            }
        }
        Some(Command::DeleteDriver { id, yes, per_page }) => {
            drivers_per_page = per_page.unwrap_or(drivers_per_page).max(1);
            Action::DeleteDriver {
                id: id.trim().to_string(),
                confirmed: yes,
            }
        }
        None => return Err("no command given (try --help)".to_string()),
    };

    Ok(RunConfig {
        action,
        client: ClientOptions {
            base_url,
            timeout_secs,
            proxy,
        },
        display: DisplayFormat {
            currency_symbol,
            date_format,
        },
        driver_envelope,
        drivers_per_page,
        output,
        output_format,
        no_color,
    })
}

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "fleetdesk=debug,warn",
        _ => "fleetdesk=trace,debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::with_template(":: {spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn confirm(prompt: &str) -> Result<bool, String> {
    let mut stderr = std::io::stderr();
    write!(stderr, "{prompt} [y/N] ").map_err(|e| format!("failed to write prompt: {e}"))?;
    stderr
        .flush()
        .map_err(|e| format!("failed to write prompt: {e}"))?;
    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| format!("failed to read confirmation: {e}"))?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn list_setup(run: &RunConfig, request: &ListRequest) -> (ListSpec, crate::fetcher::Endpoint) {
    match request.kind {
        ListKind::Drivers => (
            drivers::list_spec(request.per_page),
            drivers::endpoint(run.driver_envelope),
        ),
        ListKind::Trips => (trips::list_spec(request.per_page), trips::endpoint()),
        ListKind::NewDrivers => (
            new_drivers::list_spec(request.per_page),
            new_drivers::endpoint(),
        ),
    }
}

fn drivers_page(run: &RunConfig) -> ListPage {
    ListPage::new(
        drivers::list_spec(run.drivers_per_page),
        drivers::endpoint(run.driver_envelope),
        run.display.clone(),
    )
}

fn list_document(page: &mut ListPage) -> Document {
    Document::List {
        list: page.render(),
        notice: page.take_notice(),
    }
}

async fn show_list(run: &RunConfig, client: &ApiClient, request: &ListRequest) -> Document {
    let (spec, endpoint) = list_setup(run, request);
    let mut page = ListPage::new(spec, endpoint, run.display.clone());
    let pb = spinner(&format!("loading {}", page.list().spec().title));
    page.refresh(client).await;
    pb.finish_and_clear();

    if let Some(query) = request.search.as_deref() {
        page.set_query(query);
    }
    if request.page != 1 && !page.go_to_page(request.page) {
        let last = page.list().pagination().total_pages();
        warn!(requested = request.page, last, "page out of range");
        if page.notice().is_none() {
            return Document::List {
                list: page.render(),
                notice: Some(Notice::error(format!(
                    "page {} is out of range (1-{last}), showing page 1",
                    request.page
                ))),
            };
        }
    }
    list_document(&mut page)
}

async fn show_dashboard(run: &RunConfig, client: &ApiClient) -> Document {
    let pb = spinner("loading dashboard");
    let fetched = client.fetch_document(dashboard::SUMMARY_PATH).await;
    pb.finish_and_clear();
    match fetched {
        Ok(doc) => Document::Dashboard {
            dashboard: dashboard::DashboardView::build(
                &dashboard::DashboardSummary::from_value(&doc),
                &run.display,
            ),
            notice: None,
        },
        Err(e) => {
            warn!(error = %e, "dashboard fetch failed");
            Document::Dashboard {
                dashboard: dashboard::DashboardView::empty(&run.display),
                notice: Some(Notice::error(format!("could not load dashboard: {e}"))),
            }
        }
    }
}

async fn show_driver(run: &RunConfig, client: &ApiClient, id: &str) -> Result<Document, String> {
    let pb = spinner(&format!("loading driver {id}"));
    let fetched = actions::get_driver(client, id).await;
    pb.finish_and_clear();
    let record = fetched.map_err(|e| format!("could not load driver {id}: {e}"))?;
    let row = normalize_record(&record, 0, &drivers::detail_schema(), &run.display);
    Ok(Document::Detail {
        title: format!("Driver {}", row.field("Name").unwrap_or(id)),
        id: row.id.clone(),
        status: row.derived_status.label.clone(),
        fields: row.display_fields,
    })
}

/// Loads the driver list, applies the mutation and renders the list as it
/// stands afterwards. A failed mutation still renders the kept rows.
async fn mutate_driver(
    run: &RunConfig,
    client: &ApiClient,
    id: &str,
    form: Option<&DriverForm>,
) -> (Document, Option<String>) {
    let mut page = drivers_page(run);
    let pb = spinner("loading drivers");
    page.refresh(client).await;
    pb.set_message(match form {
        Some(_) => format!("updating driver {id}"),
        None => format!("deleting driver {id}"),
    });
    let result = match form {
        Some(form) => page.update_driver(client, id, form).await,
        None => page.delete_driver(client, id).await,
    };
    pb.finish_and_clear();
    let failure = result.err().map(|e| e.to_string());
    (list_document(&mut page), failure)
}

async fn write_output(run: &RunConfig, doc: &Document) -> Result<(), String> {
    match run.output.as_ref() {
        Some(path) => {
            colored::control::set_override(false);
            let rendered = output::render(doc, run.output_format);
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .await
                .map_err(|e| format!("failed to open output file: {e}"))?;
            outfile
                .write_all(&rendered)
                .await
                .map_err(|e| format!("failed to write output file: {e}"))?;
            eprintln!(":: Saved     : {path}");
            Ok(())
        }
        None => {
            let rendered = output::render(doc, run.output_format);
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(&rendered)
                .await
                .map_err(|e| format!("failed to write output: {e}"))?;
            stdout
                .flush()
                .await
                .map_err(|e| format!("failed to write output: {e}"))
        }
    }
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color || run.output_format != OutputFormat::Text {
        colored::control::set_override(false);
    }
    let client = ApiClient::new(&run.client).map_err(|e| e.to_string())?;

    let (doc, failure) = match &run.action {
        Action::Dashboard => (show_dashboard(&run, &client).await, None),
        Action::List(request) => (show_list(&run, &client, request).await, None),
        Action::ShowDriver(id) => (show_driver(&run, &client, id).await?, None),
        Action::UpdateDriver { id, form } => mutate_driver(&run, &client, id, Some(form)).await,
        Action::DeleteDriver { id, confirmed } => {
            if !*confirmed {
                return Err("deletion not confirmed".to_string());
            }
            mutate_driver(&run, &client, id, None).await
        }
    };

    write_output(&run, &doc).await?;
    match failure {
        Some(message) => Err(message),
        None => Ok(()),
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };
    init_logging(args.verbose);

    let explicit_config = args.config.is_some();
    let config_path = match args.config.as_deref() {
        Some(path) => Some(config::expand_tilde(path)),
        None => config::default_config_path(),
    };
    if args.init_config {
        let path = config_path
            .as_ref()
            .ok_or_else(|| "cannot locate a home directory for the config file".to_string())?;
        config::ensure_default_config_file(path)?;
        eprintln!(":: Config    : {}", path.display());
        if args.command.is_none() {
            return Ok(());
        }
    }
    let cfg = match config_path.as_ref() {
        Some(path) => config::load_config(path, !explicit_config)?,
        None => ConfigFile::default(),
    };

    let mut run = build_run_config(args, cfg)?;
    if let Action::DeleteDriver { id, confirmed } = &mut run.action {
        if !*confirmed {
            *confirmed = confirm(&format!("Delete driver {id}?"))?;
            if !*confirmed {
                eprintln!(":: Aborted");
                return Ok(());
            }
        }
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}
