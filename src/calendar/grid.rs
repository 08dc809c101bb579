use chrono::{Datelike, Duration, Locale, NaiveDate, TimeZone, Utc, Weekday};
use derive_more::{Constructor, From};
use serde::Deserialize;
use serde_with::DeserializeFromStr;
use std::convert::TryFrom;
use std::fmt::Write;
use std::iter;
use std::str::FromStr;

use super::anchor::MonthAnchor;
use super::error::{Error, ErrorKind, Result};

/// Six full weeks, enough for any month under any week start.
pub const DAYS_PER_MONTH: usize = 42;
pub const DAYS_PER_WEEK: usize = 7;

const LABEL_FORMAT: &str = "%B,%d,%Y";
const LABEL_SEPARATOR: char = ',';

/// How one month is laid out as units of the calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// A month header followed by the month's day cells.
    Headered,
    /// Day cells only.
    Days,
    /// One unit per month carrying its own day block.
    Months,
}

impl Layout {
    /// Number of window units occupied by one month.
    pub const fn stride(&self) -> usize {
        match self {
            Layout::Headered => DAYS_PER_MONTH + 1,
            Layout::Days => DAYS_PER_MONTH,
            Layout::Months => 1,
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Headered
    }
}

impl FromStr for Layout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "headered" => Ok(Layout::Headered),
            "days" => Ok(Layout::Days),
            "months" => Ok(Layout::Months),
            _ => Err(Error::new(
                ErrorKind::ConfigParse,
                &format!("Layout '{}' not recognized", s),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, DeserializeFromStr)]
pub struct LabelLocale(pub Locale);

impl Default for LabelLocale {
    fn default() -> Self {
        LabelLocale(Locale::en_US)
    }
}

impl FromStr for LabelLocale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Locale::try_from(s).map(LabelLocale).map_err(|_| {
            Error::new(
                ErrorKind::UnknownLocale,
                &format!("Locale '{}' not recognized", s),
            )
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor)]
pub struct DayCell {
    date: NaiveDate,
    month_anchor: MonthAnchor,
}

impl DayCell {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn month_anchor(&self) -> MonthAnchor {
        self.month_anchor
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct MonthHeader {
    label: String,
}

impl MonthHeader {
    pub fn label(&self) -> &str {
        &self.label
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct CalendarMonth {
    label: String,
    days: [NaiveDate; DAYS_PER_MONTH],
    anchor: MonthAnchor,
}

impl CalendarMonth {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn days(&self) -> &[NaiveDate; DAYS_PER_MONTH] {
        &self.days
    }

    pub fn anchor(&self) -> MonthAnchor {
        self.anchor
    }

    pub fn cell(&self, slot: usize) -> DayCell {
        assert!(
            slot < DAYS_PER_MONTH,
            "slot {} is outside of the month block",
            slot
        );
        DayCell::new(self.days[slot], self.anchor)
    }

    pub fn cells(&self) -> impl Iterator<Item = DayCell> + '_ {
        self.days
            .iter()
            .map(move |&date| DayCell::new(date, self.anchor))
    }
}

/// A single unit of the calendar window. The variant is fixed when the
/// month is generated and never re-derived from the unit's position.
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum CalendarItem {
    Header(MonthHeader),
    Day(DayCell),
    Month(CalendarMonth),
}

impl CalendarItem {
    pub fn as_header(&self) -> Option<&MonthHeader> {
        match self {
            CalendarItem::Header(header) => Some(header),
            _ => None,
        }
    }

    pub fn as_day(&self) -> Option<&DayCell> {
        match self {
            CalendarItem::Day(cell) => Some(cell),
            _ => None,
        }
    }

    pub fn as_month(&self) -> Option<&CalendarMonth> {
        match self {
            CalendarItem::Month(month) => Some(month),
            _ => None,
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self, CalendarItem::Header(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOptions {
    pub week_start: Weekday,
    pub layout: Layout,
    pub locale: LabelLocale,
}

impl Default for GridOptions {
    fn default() -> Self {
        GridOptions {
            week_start: Weekday::Sun,
            layout: Layout::default(),
            locale: LabelLocale::default(),
        }
    }
}

/// "Month Year" in the given locale, e.g. "February 2024".
pub fn month_label(anchor: &MonthAnchor, locale: LabelLocale) -> Result<String> {
    let midnight = anchor.first_day()?.and_hms_opt(0, 0, 0).ok_or_else(|| {
        Error::new(ErrorKind::DateOutOfRange, "midnight is not representable")
    })?;

    let mut formatted = String::new();
    write!(
        &mut formatted,
        "{}",
        Utc.from_utc_datetime(&midnight)
            .format_localized(LABEL_FORMAT, locale.0)
    )?;

    match formatted.split(LABEL_SEPARATOR).collect::<Vec<_>>().as_slice() {
        [month, _day, year] if !month.is_empty() && !year.is_empty() => {
            Ok(format!("{} {}", month, year))
        }
        _ => Err(Error::new(
            ErrorKind::LabelFormat,
            &format!("unexpected formatted date '{}'", formatted),
        )),
    }
}

/// First day shown in the block of `anchor`: the latest `week_start` on or
/// before the first of the month.
pub fn first_visible_day(anchor: &MonthAnchor, week_start: Weekday) -> Result<NaiveDate> {
    let first = anchor.first_day()?;
    let offset = (DAYS_PER_WEEK as u32 + first.weekday().num_days_from_monday()
        - week_start.num_days_from_monday())
        % DAYS_PER_WEEK as u32;

    first
        .checked_sub_signed(Duration::days(offset as i64))
        .ok_or_else(|| Error::from(ErrorKind::DateOutOfRange).with_msg(&anchor.to_string()))
}

pub fn month_days(anchor: &MonthAnchor, week_start: Weekday) -> Result<[NaiveDate; DAYS_PER_MONTH]> {
    let start = first_visible_day(anchor, week_start)?;
    let mut days = [start; DAYS_PER_MONTH];

    for (offset, day) in days.iter_mut().enumerate() {
        *day = start
            .checked_add_signed(Duration::days(offset as i64))
            .ok_or_else(|| Error::from(ErrorKind::DateOutOfRange).with_msg(&anchor.to_string()))?;
    }

    Ok(days)
}

/// Units for one month in the configured layout.
pub fn generate(anchor: MonthAnchor, options: &GridOptions) -> Result<Vec<CalendarItem>> {
    let days = month_days(&anchor, options.week_start)?;
    let cells = days
        .iter()
        .map(move |&date| CalendarItem::from(DayCell::new(date, anchor)));

    let items: Vec<CalendarItem> = match options.layout {
        Layout::Headered => {
            let header = MonthHeader::new(month_label(&anchor, options.locale)?);
            iter::once(CalendarItem::from(header)).chain(cells).collect()
        }
        Layout::Days => cells.collect(),
        Layout::Months => vec![CalendarMonth::new(
            month_label(&anchor, options.locale)?,
            days,
            anchor,
        )
        .into()],
    };

    debug_assert_eq!(items.len(), options.layout.stride());
    log::debug!("Generated {} units for {}", items.len(), anchor);

    Ok(items)
}
