extern crate infinical as lib;

use chrono::{NaiveDate, Weekday};
use flexi_logger::{FileSpec, Logger};
use lib::calendar::{InfiniteCalendar, Layout};
use lib::events::Dispatcher;
use lib::ui::App;
use nix::sys::termios;
use std::io::stdout;
use std::path::PathBuf;
use structopt::StructOpt;
use unsegen::base::Terminal;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "ic",
    author = "reedts <j.reedts@gmail.com>",
    about = "Infinical - An infinitely scrolling TUI month calendar."
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

    #[structopt(
        short = "s",
        long = "show",
        help = "only show calendar non-interactively"
    )]
    pub show: bool,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,

    #[structopt(long = "layout", help = "one of headered, days or months")]
    pub layout: Option<Layout>,

    #[structopt(long = "week-start", help = "first day of the week, e.g. mon")]
    pub week_start: Option<Weekday>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    const STDOUT: std::os::unix::io::RawFd = 0;
    let orig_attr = std::sync::Mutex::new(termios::tcgetattr(STDOUT)?);

    std::panic::set_hook(Box::new(move |info| {
        // Switch to main terminal screen
        println!("{}{}", termion::screen::ToMainScreen, termion::cursor::Show);

        if let Ok(attr) = orig_attr.lock() {
            let _ = termios::tcsetattr(STDOUT, termios::SetArg::TCSANOW, &attr);
        }

        println!("Infinical ran into a fatal error!");
        println!(
            "Consider filing an issue with a log file and the backtrace below at {}",
            env!("CARGO_PKG_REPOSITORY")
        );

        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let mut config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    if let Some(layout) = args.layout {
        config.layout = layout;
    }
    if let Some(week_start) = args.week_start {
        config.week_start = week_start;
    }

    let calendar = InfiniteCalendar::from_config(&config)?
        .with_listener(|day: NaiveDate| log::info!(target: "ic", "Day pressed: {}", day));

    let dispatcher = Dispatcher::from_config(&config);
    // Setup unsegen terminal
    let stdout = stdout();
    let term = Terminal::new(stdout.lock())?;

    let mut app = App::new(&config, calendar);

    if args.show {
        app.show(dispatcher, term)?;
    } else {
        app.run(dispatcher, term)?;
    }

    Ok(())
}
