use core::fmt;

use crate::constants::{STORE_COMPRESSION_METHOD, VERSION_MADE_BY, VERSION_NEEDED_TO_EXTRACT};
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike};

/// An entry of the archive as described by its central directory record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFileEntry {
    pub version_made_by: u16,
    pub version_needed: u16,
    pub general_purpose_flags: u16,
    pub compression_method: u16,
    pub last_mod_file_time: u16,
    pub last_mod_file_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name_as_bytes: Vec<u8>,
    pub offset: u32,
}

impl ArchiveFileEntry {
    /// A stored entry, as written by this crate.
    pub(crate) fn stored(
        file_name: &[u8],
        date_time: DosDateTime,
        crc32: u32,
        size: u32,
        offset: u32,
    ) -> Self {
        let (date, time) = date_time.ms_dos();
        Self {
            version_made_by: VERSION_MADE_BY,
            version_needed: VERSION_NEEDED_TO_EXTRACT,
            general_purpose_flags: 0,
            compression_method: STORE_COMPRESSION_METHOD,
            last_mod_file_time: time,
            last_mod_file_date: date,
            crc32,
            compressed_size: size,
            uncompressed_size: size,
            file_name_as_bytes: file_name.to_vec(),
            offset,
        }
    }

    pub fn file_name_len(&self) -> u16 {
        self.file_name_as_bytes.len() as u16
    }

    /// The entry name, with invalid UTF-8 sequences replaced.
    pub fn file_name(&self) -> String {
        String::from_utf8_lossy(&self.file_name_as_bytes).into_owned()
    }

    pub fn last_modified(&self) -> DosDateTime {
        DosDateTime::from_msdos(self.last_mod_file_date, self.last_mod_file_time)
    }

    /// `"major.minor"` from the low byte of a version field.
    fn format_version(version: u16) -> String {
        let version = version & 0xFF;
        format!("{}.{}", version / 10, version % 10)
    }
}

impl fmt::Display for ArchiveFileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self.compression_method {
            STORE_COMPRESSION_METHOD => "none (stored)".to_owned(),
            other => format!("unknown ({})", other),
        };
        let encryption = if self.general_purpose_flags & 1 != 0 {
            "encrypted"
        } else {
            "not encrypted"
        };

        let rows = [
            ("local header offset:", self.offset.to_string()),
            ("made by version:", Self::format_version(self.version_made_by)),
            ("needed to extract:", Self::format_version(self.version_needed)),
            ("flags:", format!("{:#018b}", self.general_purpose_flags)),
            ("compression method:", method),
            ("encryption:", encryption.to_owned()),
            ("modified (DOS date/time):", self.last_modified().to_string()),
            ("CRC-32:", format!("{:08x}", self.crc32)),
            ("compressed size:", format!("{} bytes", self.compressed_size)),
            ("uncompressed size:", format!("{} bytes", self.uncompressed_size)),
            ("name length:", format!("{} bytes", self.file_name_len())),
        ];

        writeln!(f, "{}", self.file_name())?;
        for (label, value) in rows {
            writeln!(f, "  {:<28}{}", label, value)?;
        }
        Ok(())
    }
}

const MIN_DOS_YEAR: u16 = 1980;
const MAX_DOS_YEAR: u16 = MIN_DOS_YEAR + 0x7F;

/// A timezone-less date and time, as stored in the MS-DOS fields of the archive.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DosDateTime {
    year: u16,
    month: u16,
    day: u16,
    hour: u16,
    minute: u16,
    second: u16,
}

impl Default for DosDateTime {
    /// 1980, January 1th, 12AM.
    fn default() -> Self {
        Self {
            year: 1980,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }
}

impl DosDateTime {
    pub fn new(year: u16, month: u16, day: u16, hour: u16, minute: u16, second: u16) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub fn from_chrono_datetime<Tz: TimeZone>(datetime: DateTime<Tz>) -> Self {
        Self::from_naive(datetime.naive_local())
    }

    pub fn from_naive(datetime: NaiveDateTime) -> Self {
        Self {
            year: datetime.year().clamp(0, u16::MAX as i32) as u16,
            month: datetime.month() as u16,
            day: datetime.day() as u16,
            hour: datetime.hour() as u16,
            minute: datetime.minute() as u16,
            second: datetime.second() as u16,
        }
    }

    /// The local wall-clock time.
    pub fn now() -> Self {
        Self::from_chrono_datetime(Local::now())
    }

    pub fn from_msdos(datepart: u16, timepart: u16) -> Self {
        let seconds = (timepart & 0b0000000000011111) << 1;
        let minutes = (timepart & 0b0000011111100000) >> 5;
        let hours = (timepart & 0b1111100000000000) >> 11;
        let days = datepart & 0b0000000000011111;
        let months = (datepart & 0b0000000111100000) >> 5;
        let years = (datepart & 0b1111111000000000) >> 9;

        Self {
            year: years + 1980,
            month: months,
            day: days,
            hour: hours,
            minute: minutes,
            second: seconds,
        }
    }

    /// Returns the `(date, time)` pair. Years are clamped to the 1980..=2107 range of the 7-bit
    /// year field.
    pub fn ms_dos(&self) -> (u16, u16) {
        let year = self.year.clamp(MIN_DOS_YEAR, MAX_DOS_YEAR) - MIN_DOS_YEAR;
        let date = self.day | (self.month << 5) | year << 9;
        let time = (self.second / 2) | (self.minute << 5) | self.hour << 11;
        (date, time)
    }

    pub fn to_time(&self) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)
            .and_then(|date| {
                date.and_hms_opt(self.hour as u32, self.minute as u32, self.second as u32)
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for DosDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// The (timezone-less) date and time that will be written in the archive alongside the files.
///
/// Use `FileDateTime::Zero` if the date and time are insignificant: 1980, January 1th, 12AM.
/// Use `FileDateTime::Custom` to pin a date and time, which makes the output reproducible.
/// Use `FileDateTime::Now` for the local wall-clock time when the archive is built.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum FileDateTime {
    Zero,
    Custom(DosDateTime),
    #[default]
    Now,
}

impl FileDateTime {
    /// Resolves to a fixed date and time. `Now` reads the clock on every call.
    pub fn resolve(&self) -> DosDateTime {
        match self {
            FileDateTime::Zero => DosDateTime::default(),
            FileDateTime::Custom(date_time) => *date_time,
            FileDateTime::Now => DosDateTime::now(),
        }
    }

    pub fn ms_dos(&self) -> (u16, u16) {
        self.resolve().ms_dos()
    }
}
