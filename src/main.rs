mod app;
mod help;
mod loader;
mod locale;
mod logging;
mod monthview;
mod range;
mod slots;
mod theme;
use crate::app::App;
use crate::loader::{ProgressiveMonthLoader, RangeInputs, DEFAULT_CAPPED_MONTHS};
use crate::locale::Locale;
use crate::logging::init_tracing;
use crate::monthview::MonthViewState;
use crate::range::DisabledPolicy;
use crate::slots::MarkedDates;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::ffi::OsString;
use time::{
    format_description::BorrowedFormatItem, macros::format_description, Date, OffsetDateTime,
};

static YMD_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Eq, PartialEq)]
struct RunOptions {
    min_date: Date,
    max_date: Date,
    allows_past_dates: bool,
    disabled: Vec<Date>,
    marked: Vec<Date>,
    selected: Option<Date>,
    capped_months: u16,
    locale: Locale,
    today: Option<Date>,
}

impl RunOptions {
    fn into_view(self, today: Date) -> MonthViewState<MarkedDates> {
        let policy = DisabledPolicy::new(today)
            .allows_past_dates(self.allows_past_dates)
            .disabled_dates(self.disabled);
        let loader = ProgressiveMonthLoader::new(
            RangeInputs {
                min_date: self.min_date,
                max_date: self.max_date,
                policy,
            },
            self.capped_months,
        );
        let mut view = MonthViewState::new(loader, self.marked.into_iter().collect::<MarkedDates>())
            .locale(self.locale);
        if let Some(date) = self.selected {
            view = view.selected(date);
        }
        view
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut min_date = None;
        let mut max_date = None;
        let mut allows_past_dates = true;
        let mut disabled = Vec::new();
        let mut marked = Vec::new();
        let mut selected = None;
        let mut capped_months = DEFAULT_CAPPED_MONTHS;
        let mut locale = Locale::default();
        let mut today = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('d') | Arg::Long("disable") => disabled.push(parse_date(parser.value()?)?),
                Arg::Short('m') | Arg::Long("mark") => marked.push(parse_date(parser.value()?)?),
                Arg::Short('s') | Arg::Long("select") => selected = Some(parse_date(parser.value()?)?),
                Arg::Short('P') | Arg::Long("no-past-dates") => allows_past_dates = false,
                Arg::Short('n') | Arg::Long("months") => capped_months = parser.value()?.parse()?,
                Arg::Short('L') | Arg::Long("locale") => locale = parser.value()?.parse()?,
                Arg::Long("today") => today = Some(parse_date(parser.value()?)?),
                Arg::Value(value) if min_date.is_none() => min_date = Some(parse_date(value)?),
                Arg::Value(value) if max_date.is_none() => max_date = Some(parse_date(value)?),
                _ => return Err(arg.unexpected()),
            }
        }
        let min_date = min_date.ok_or("missing <MIN-DATE> argument")?;
        let max_date = max_date.ok_or("missing <MAX-DATE> argument")?;
        Ok(Command::Run(RunOptions {
            min_date,
            max_date,
            allows_past_dates,
            disabled,
            marked,
            selected,
            capped_months,
            locale,
            today,
        }))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                init_tracing()?;
                let today = match opts.today {
                    Some(date) => date,
                    None => OffsetDateTime::now_local()
                        .context("failed to determine local date")?
                        .date(),
                };
                let picked = with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(opts.into_view(today))
                        .run(terminal)
                        .context("failed to run date picker")
                })?;
                if let Some(date) = picked {
                    println!("{date}");
                }
                Ok(())
            }
            Command::Help => {
                println!("Usage: monthpick [options] <MIN-DATE> <MAX-DATE>");
                println!();
                println!("Pick a date between MIN-DATE and MAX-DATE (both YYYY-MM-DD) from a");
                println!("scrollable month calendar.  The picked date is printed on exit.");
                println!();
                println!("Options:");
                println!("  -d, --disable <DATE>   Make the given date unpickable");
                println!("  -m, --mark <DATE>      Mark the given date as having open slots");
                println!("  -s, --select <DATE>    Start with the given date selected");
                println!("  -P, --no-past-dates    Make dates before today unpickable");
                println!("  -n, --months <N>       Months to show before loading the rest [default: {DEFAULT_CAPPED_MONTHS}]");
                println!("  -L, --locale <LOCALE>  Language for month names (en, de, fr, es, nl)");
                println!("      --today <DATE>     Treat the given date as today");
                println!("  -h, --help             Display this help message and exit");
                println!("  -V, --version          Show the program version and exit");
                println!();
                println!("Set {} to a file path to write logs there.", logging::LOG_FILE_VAR);
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn parse_date(value: OsString) -> Result<Date, lexopt::Error> {
    let value = value.string()?;
    match Date::parse(&value, &YMD_FMT) {
        Ok(d) => Ok(d),
        Err(e) => Err(lexopt::Error::ParsingFailed {
            value,
            error: Box::new(e),
        }),
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
