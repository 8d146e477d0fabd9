extern crate rangepick as lib;

use chrono::Local;
use flexi_logger::{FileSpec, Logger};
use lib::date::WeekStart;
use lib::events::Dispatcher;
use lib::picker::{DatePicker, DatePickerModal, Period};
use lib::ui::app::App;
use lib::ui::{theme, Outcome};
use nix::sys::{signal, termios};
use std::io::stdout;
use std::os::unix::io::AsRawFd;
use std::path::PathBuf;
use structopt::StructOpt;
use unsegen::base::Terminal;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "rp",
    author = "Julian Bigge <j.reedts@gmail.com>",
    about = "rangepick - pick a date range in the terminal."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,

    #[structopt(
        short = "p",
        long = "period",
        help = "initial preset: custom, current, 1year, 2years, 3years or 5years"
    )]
    pub period: Option<Period>,

    #[structopt(
        short = "v",
        long = "value",
        help = "initial value, e.g. \"01/03/2024 to 01/03/2025\""
    )]
    pub value: Option<String>,

    #[structopt(long = "iso", help = "print the applied range as ISO dates")]
    pub iso: bool,

    #[structopt(long = "sunday", help = "weeks start on sunday", conflicts_with = "monday")]
    pub sunday: bool,

    #[structopt(long = "monday", help = "weeks start on monday")]
    pub monday: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    // The picker owns the terminal, so logs only go to a file.
    logger = match args.log_file {
        Some(ref log_file) => logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message(),
        None => logger.do_not_log(),
    };

    let _logger = logger.start()?;

    let tty = std::io::stdin().as_raw_fd();
    let orig_attr = std::sync::Mutex::new(termios::tcgetattr(tty)?);

    std::panic::set_hook(Box::new(move |info| {
        // Switch to main terminal screen
        println!("{}{}", termion::screen::ToMainScreen, termion::cursor::Show);

        if let Ok(attr) = orig_attr.lock() {
            let _ = termios::tcsetattr(tty, termios::SetArg::TCSANOW, &attr);
        }

        println!("rangepick ran into a fatal error!");
        println!("Consider filing an issue with a log file and the backtrace below.");

        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let mut signals_to_wait = signal::SigSet::empty();
    signals_to_wait.add(signal::SIGWINCH);

    let mut config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    if args.sunday {
        config.week_start = WeekStart::Sunday;
    } else if args.monday {
        config.week_start = WeekStart::Monday;
    }

    let theme = theme::register(&config.theme);

    let modal = DatePickerModal::new(Local::now().date_naive())
        .week_start(config.week_start)
        .year_span(config.year_span)
        .period(args.period.unwrap_or(config.default_period));
    let picker = DatePicker::new(modal).default_value(args.value.as_deref().unwrap_or(""));

    let dispatcher = Dispatcher::from_config(&config, signals_to_wait);

    let outcome = {
        // Setup unsegen terminal
        let stdout = stdout();
        let term = Terminal::new(stdout.lock())?;

        let mut app = App::new(&config, theme, picker);
        app.run(dispatcher, term)?
    };

    match outcome {
        Outcome::Applied { start, end, .. } if args.iso => println!("{} {}", start, end),
        Outcome::Applied { display, .. } => println!("{}", display),
        Outcome::Cancelled => log::info!("Cancelled, nothing to print"),
    }

    Ok(())
}
