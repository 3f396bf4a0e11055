//! GPS position from the EXIF block of a JPEG photo.
//!
//! Only what a check-in needs is decoded: the GPS IFD pointer of IFD0 and the latitude and
//! longitude tags it points to. Any malformed or truncated input yields `None`.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

const MARKER_SOI: u16 = 0xFFD8;
const MARKER_SOS: u16 = 0xFFDA;
const MARKER_EOI: u16 = 0xFFD9;
const MARKER_APP1: u16 = 0xFFE1;

const TAG_GPS_IFD_POINTER: u16 = 0x8825;
const TAG_GPS_LATITUDE_REF: u16 = 0x0001;
const TAG_GPS_LATITUDE: u16 = 0x0002;
const TAG_GPS_LONGITUDE_REF: u16 = 0x0003;
const TAG_GPS_LONGITUDE: u16 = 0x0004;

const TYPE_RATIONAL: u16 = 5;

const IFD_ENTRY_SIZE: usize = 12;

/// A position in signed decimal degrees (south and west are negative).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Read the GPS position of a JPEG photo.
#[tracing::instrument(skip_all, fields(len = jpeg.len()))]
pub fn read_gps(jpeg: &[u8]) -> Option<GpsCoordinates> {
    if read_u16_be(jpeg, 0)? != MARKER_SOI {
        return None;
    }

    let mut offset = 2;
    while offset + 1 < jpeg.len() {
        let marker = read_u16_be(jpeg, offset)?;
        offset += 2;

        if marker == MARKER_SOS || marker == MARKER_EOI {
            break;
        }

        let length = read_u16_be(jpeg, offset)? as usize;
        offset += 2;

        if marker == MARKER_APP1 && jpeg.get(offset..offset + 4) == Some(b"Exif".as_slice()) {
            // the first APP1 holding EXIF settles it
            let coordinates = Tiff::new(jpeg, offset + 6)?.gps();
            tracing::debug!(?coordinates, "EXIF segment parsed");
            return coordinates;
        }

        offset += length.checked_sub(2)?;
    }

    None
}

fn read_u16_be(buf: &[u8], offset: usize) -> Option<u16> {
    buf.get(offset..offset + 2).map(BigEndian::read_u16)
}

/// A TIFF structure embedded in a larger buffer. Offsets found inside it are relative to its
/// header.
struct Tiff<'a> {
    buf: &'a [u8],
    start: usize,
    little_endian: bool,
}

impl<'a> Tiff<'a> {
    fn new(buf: &'a [u8], start: usize) -> Option<Self> {
        let little_endian = buf.get(start..start + 2)? == b"II";
        Some(Self {
            buf,
            start,
            little_endian,
        })
    }

    fn u16_at(&self, offset: usize) -> Option<u16> {
        let bytes = self.buf.get(offset..offset + 2)?;
        Some(if self.little_endian {
            LittleEndian::read_u16(bytes)
        } else {
            BigEndian::read_u16(bytes)
        })
    }

    fn u32_at(&self, offset: usize) -> Option<u32> {
        let bytes = self.buf.get(offset..offset + 4)?;
        Some(if self.little_endian {
            LittleEndian::read_u32(bytes)
        } else {
            BigEndian::read_u32(bytes)
        })
    }

    /// NUL-terminated ASCII of at most `count` bytes, trimmed.
    fn ascii_at(&self, offset: usize, count: usize) -> Option<String> {
        let bytes = self.buf.get(offset..offset.checked_add(count)?)?;
        let text: String = bytes
            .iter()
            .take_while(|b| **b != 0)
            .map(|b| *b as char)
            .collect();
        Some(text.trim().to_owned())
    }

    fn rationals_at(&self, offset: usize, count: usize) -> Option<Vec<f64>> {
        (0..count)
            .map(|i| {
                let numerator = self.u32_at(offset + i * 8)?;
                let denominator = self.u32_at(offset + i * 8 + 4)?;
                Some(if denominator == 0 {
                    0.0
                } else {
                    numerator as f64 / denominator as f64
                })
            })
            .collect()
    }

    /// Entries of the IFD at `ifd_offset`, relative to the TIFF header.
    fn ifd_entries(&self, ifd_offset: u32) -> Option<impl Iterator<Item = usize> + '_> {
        let ifd = self.start.checked_add(ifd_offset as usize)?;
        let count = self.u16_at(ifd)? as usize;
        Some((0..count).map(move |i| ifd + 2 + i * IFD_ENTRY_SIZE))
    }

    fn gps(&self) -> Option<GpsCoordinates> {
        let ifd0 = self.u32_at(self.start + 4)?;

        let mut gps_offset = None;
        for entry in self.ifd_entries(ifd0)? {
            if self.u16_at(entry)? == TAG_GPS_IFD_POINTER {
                gps_offset = self.u32_at(entry + 8);
                break;
            }
        }
        let gps_offset = gps_offset.filter(|offset| *offset != 0)?;

        let mut latitude_ref = String::new();
        let mut longitude_ref = String::new();
        let mut latitude = None;
        let mut longitude = None;

        for entry in self.ifd_entries(gps_offset)? {
            let tag = self.u16_at(entry)?;
            let field_type = self.u16_at(entry + 2)?;
            let count = self.u32_at(entry + 4)? as usize;

            let value_offset = entry + 8;
            let byte_length = type_size(field_type).saturating_mul(count);
            let value_offset = if byte_length > 4 {
                self.start + self.u32_at(value_offset)? as usize
            } else {
                value_offset
            };

            match (tag, field_type) {
                (TAG_GPS_LATITUDE_REF, _) => latitude_ref = self.ascii_at(value_offset, count)?,
                (TAG_GPS_LONGITUDE_REF, _) => longitude_ref = self.ascii_at(value_offset, count)?,
                (TAG_GPS_LATITUDE, TYPE_RATIONAL) => {
                    latitude = Some(self.rationals_at(value_offset, count)?)
                }
                (TAG_GPS_LONGITUDE, TYPE_RATIONAL) => {
                    longitude = Some(self.rationals_at(value_offset, count)?)
                }
                _ => {}
            }
        }

        if latitude_ref.is_empty() || longitude_ref.is_empty() {
            return None;
        }

        let latitude = dms_to_decimal(&latitude?, &latitude_ref)?;
        let longitude = dms_to_decimal(&longitude?, &longitude_ref)?;

        Some(GpsCoordinates {
            latitude,
            longitude,
        })
    }
}

/// Bytes per value of a TIFF field type. Unknown types count as 0.
fn type_size(field_type: u16) -> usize {
    match field_type {
        1 | 2 | 7 => 1,
        3 => 2,
        4 | 9 => 4,
        5 | 10 => 8,
        _ => 0,
    }
}

fn dms_to_decimal(dms: &[f64], reference: &str) -> Option<f64> {
    let [degrees, minutes, seconds] = dms else {
        return None;
    };

    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;
    let decimal = if reference == "S" || reference == "W" {
        -decimal
    } else {
        decimal
    };

    (!decimal.is_nan()).then_some(decimal)
}
