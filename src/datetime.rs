use std::fmt;

use time::{Date, Duration, PrimitiveDateTime, Time};

/// The packed DOS date and time fields of a CFFILE record.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DosTimestamp {
    /// Bits 9-15 are years since 1980, bits 5-8 the month, bits 0-4 the day.
    pub date: u16,
    /// Bits 11-15 are hours, bits 5-10 minutes, bits 0-4 seconds / 2.
    pub time: u16,
}

impl DosTimestamp {
    pub fn new(date: u16, time: u16) -> DosTimestamp {
        DosTimestamp { date, time }
    }

    /// Decodes the fields, or returns `None` if they do not name a real
    /// date and time.
    pub fn to_datetime(self) -> Option<PrimitiveDateTime> {
        let year = (self.date >> 9) as i32 + 1980;
        let month = (((self.date >> 5) & 0xf) as u8).try_into().ok()?;
        let day = (self.date & 0x1f) as u8;
        let date = Date::from_calendar_date(year, month, day).ok()?;

        let hour = (self.time >> 11) as u8;
        let minute = ((self.time >> 5) & 0x3f) as u8;
        let second = 2 * (self.time & 0x1f) as u8;
        let time = Time::from_hms(hour, minute, second).ok()?;

        Some(PrimitiveDateTime::new(date, time))
    }

    /// Encodes a datetime, clamping it to the years DOS can represent and
    /// rounding odd seconds up.
    pub fn from_datetime(mut datetime: PrimitiveDateTime) -> DosTimestamp {
        if datetime.year() < 1980 {
            return DosTimestamp::new(0x21, 0); // 1980-01-01 00:00:00
        } else if datetime.year() > 2107 {
            return DosTimestamp::new(0xff9f, 0xbf7d); // 2107-12-31 23:59:58
        }

        if datetime.second() % 2 != 0 {
            datetime += Duration::seconds(1);
        }

        let year = datetime.year() as u16;
        let month = datetime.month() as u16;
        let day = datetime.day() as u16;
        let hour = datetime.hour() as u16;
        let minute = datetime.minute() as u16;
        let second = datetime.second() as u16;
        DosTimestamp {
            date: ((year - 1980) << 9) | (month << 5) | day,
            time: (hour << 11) | (minute << 5) | (second / 2),
        }
    }
}

impl fmt::Display for DosTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(datetime) => write!(f, "{}", datetime),
            None => write!(
                f,
                "invalid (date 0x{:04x}, time 0x{:04x})",
                self.date, self.time
            ),
        }
    }
}
