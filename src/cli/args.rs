use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "fleetdesk",
    version,
    about = "back-office console for a ride-hailing admin API",
    long_about = "Fleetdesk lists, searches and pages through drivers, trips and driver requests served by a ride-hailing admin REST API, and edits or deletes drivers.\n\nExamples:\n  fleetdesk dashboard\n  fleetdesk drivers --search dzire --page 2\n  fleetdesk trips -A json -o trips.json\n  fleetdesk delete-driver 65f1c0ffee --yes\n\nTip: Use --init-config to write ~/.fleetdesk/config.yml and keep CLI invocations short."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv). RUST_LOG takes precedence."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        global = true,
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        global = true,
        help_heading = "Output",
        help = "Write the rendered page to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        global = true,
        help_heading = "Output",
        help = "Output format (text, json, html)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.fleetdesk/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        global = true,
        help_heading = "Input",
        help = "Write a commented config template to the config path if none exists."
    )]
    pub init_config: bool,

    #[arg(
        short = 'b',
        long = "api",
        visible_alias = "base-url",
        value_name = "URL",
        global = true,
        help_heading = "HTTP",
        help = "Base URL of the admin API."
    )]
    pub base_url: Option<String>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        global = true,
        help_heading = "HTTP",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'p',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        global = true,
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,

    #[arg(
        long = "df",
        visible_alias = "date-format",
        value_name = "PATTERN",
        global = true,
        help_heading = "Display",
        help = "strftime pattern for short dates (default %-d/%-m/%Y)."
    )]
    pub date_format: Option<String>,

    #[arg(
        long = "cur",
        visible_alias = "currency",
        value_name = "SYMBOL",
        global = true,
        help_heading = "Display",
        help = "Currency symbol prefixed to amounts (default ₹)."
    )]
    pub currency_symbol: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Summary cards, revenue series, ongoing trips, salary status and drivers.
    Dashboard,

    /// Approved drivers.
    Drivers {
        #[command(flatten)]
        list: ListArgs,

        #[arg(
            long = "env",
            visible_alias = "envelope",
            value_name = "SHAPE",
            help_heading = "HTTP",
            help = "Response shape of the driver listing (data or bare)."
        )]
        envelope: Option<String>,
    },

    /// All rides.
    Trips {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Driver registration requests.
    #[command(visible_alias = "requests")]
    NewDrivers {
        #[command(flatten)]
        list: ListArgs,
    },

    /// One driver's full record.
    Driver {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Edit a driver; unset fields keep their current value.
    UpdateDriver {
        #[arg(value_name = "ID")]
        id: String,

        #[command(flatten)]
        form: DriverFormArgs,

        #[arg(
            long = "pp",
            visible_alias = "per-page",
            value_name = "N",
            help_heading = "List",
            help = "Rows per page of the driver list shown afterwards."
        )]
        per_page: Option<usize>,
    },

    /// Delete a driver and refetch the driver list.
    DeleteDriver {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(short = 'y', long = "yes", help = "Skip the confirmation prompt.")]
        yes: bool,

        #[arg(
            long = "pp",
            visible_alias = "per-page",
            value_name = "N",
            help_heading = "List",
            help = "Rows per page of the driver list shown afterwards."
        )]
        per_page: Option<usize>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[arg(
        short = 'q',
        long = "search",
        value_name = "QUERY",
        help_heading = "List",
        help = "Case-insensitive substring search over the page's search fields."
    )]
    pub search: Option<String>,

    #[arg(
        short = 'P',
        long = "page",
        value_name = "N",
        help_heading = "List",
        help = "1-based page to show."
    )]
    pub page: Option<usize>,

    #[arg(
        long = "pp",
        visible_alias = "per-page",
        value_name = "N",
        help_heading = "List",
        help = "Rows per page."
    )]
    pub per_page: Option<usize>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DriverFormArgs {
    #[arg(long = "name", value_name = "NAME", help_heading = "Driver")]
    pub full_name: Option<String>,

    #[arg(long = "phone", value_name = "PHONE", help_heading = "Driver")]
    pub contact_number: Option<String>,

    #[arg(long = "email", value_name = "EMAIL", help_heading = "Driver")]
    pub email: Option<String>,

    #[arg(
        long = "status",
        value_name = "STATUS",
        help_heading = "Driver",
        help = "on-duty or off-duty."
    )]
    pub status: Option<String>,

    #[arg(long = "make", value_name = "MAKE", help_heading = "Vehicle")]
    pub make: Option<String>,

    #[arg(long = "model", value_name = "MODEL", help_heading = "Vehicle")]
    pub model: Option<String>,

    #[arg(long = "plate", value_name = "PLATE", help_heading = "Vehicle")]
    pub number_plate: Option<String>,

    #[arg(long = "salary", value_name = "AMOUNT", help_heading = "Payroll")]
    pub salary: Option<String>,

    #[arg(long = "account", value_name = "NUMBER", help_heading = "Payroll")]
    pub bank_account: Option<String>,
}
