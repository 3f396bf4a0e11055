//! Names given to downloaded photos, archives and public job pages.

use std::path::Path;

pub const DEFAULT_INSTALLER: &str = "checkin";
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Make an installer name safe for a file name: every character outside `[A-Za-z0-9-]` becomes
/// `_`, twice for characters that take two UTF-16 code units. A missing or empty name falls back
/// to `"checkin"`.
///
/// ```
/// use checkin_archive::naming::sanitize_installer;
///
/// assert_eq!(sanitize_installer(Some("Jo Smith/Crew")), "Jo_Smith_Crew");
/// assert_eq!(sanitize_installer(None), "checkin");
/// ```
pub fn sanitize_installer(installer: Option<&str>) -> String {
    sanitize_installer_or(installer, DEFAULT_INSTALLER)
}

/// [`sanitize_installer`] with a custom fallback.
pub fn sanitize_installer_or(installer: Option<&str>, fallback: &str) -> String {
    let installer = match installer {
        Some(name) if !name.is_empty() => name,
        _ => fallback,
    };

    // one `_` per UTF-16 code unit, so a character outside the BMP becomes `__`
    let mut safe = String::with_capacity(installer.len());
    for c in installer.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            safe.push(c);
        } else {
            safe.extend(std::iter::repeat('_').take(c.len_utf16()));
        }
    }

    if safe.is_empty() {
        fallback.to_owned()
    } else {
        safe
    }
}

/// The extension of the last path component, dot included. `".jpg"` when there is none.
pub fn photo_extension(path: &str) -> String {
    photo_extension_or(path, DEFAULT_EXTENSION)
}

/// [`photo_extension`] with a custom fallback.
pub fn photo_extension_or(path: &str, fallback: &str) -> String {
    // `Path::extension` ignores a leading dot, as in ".hidden"
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() => format!(".{}", ext),
        _ => fallback.to_owned(),
    }
}

/// `"<installer>-<index + 1><ext>"`. `index` is the zero based position of the photo in the
/// request.
pub fn entry_name(installer: &str, index: usize, extension: &str) -> String {
    format!("{}-{}{}", installer, index + 1, extension)
}

/// `"<installer>-<timestamp digits>.zip"`. When the timestamp carries no digit, the current time
/// in epoch milliseconds is used instead.
///
/// ```
/// use checkin_archive::naming::archive_file_name;
///
/// assert_eq!(
///     archive_file_name("crew_7", Some("2024-05-06T07:08"), 0),
///     "crew_7-202405060708.zip"
/// );
/// assert_eq!(archive_file_name("crew_7", None, 1714979280000), "crew_7-1714979280000.zip");
/// ```
pub fn archive_file_name(installer: &str, timestamp: Option<&str>, now_millis: i64) -> String {
    let digits: String = timestamp
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        format!("{}-{}.zip", installer, now_millis)
    } else {
        format!("{}-{}.zip", installer, digits)
    }
}

/// Convert a string to a URL-friendly slug: lowercase, runs of anything outside `[a-z0-9]` become
/// a single `-`, no leading or trailing `-`.
///
/// ```
/// use checkin_archive::naming::slugify;
///
/// assert_eq!(slugify("  123 Main St. / Unit B "), "123-main-st-unit-b");
/// ```
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_separator = false;

    for c in value.trim().to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    slug
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn installer_keeps_dashes_and_ascii() {
        assert_eq!(sanitize_installer(Some("north-crew-2")), "north-crew-2");
        assert_eq!(sanitize_installer(Some("José")), "Jos_");
        assert_eq!(sanitize_installer(Some("")), "checkin");
        assert_eq!(sanitize_installer_or(None, "crew"), "crew");
    }

    #[test]
    fn installer_replacements_count_utf16_units() {
        assert_eq!(sanitize_installer(Some("Jo \u{1F4F7}")), "Jo___");
        assert_eq!(sanitize_installer(Some("\u{1F477}-2")), "__-2");
    }

    #[test]
    fn extensions() {
        assert_eq!(photo_extension("temp-photos/abc.png"), ".png");
        assert_eq!(photo_extension("temp-photos/abc.tar.gz"), ".gz");
        assert_eq!(photo_extension("temp-photos/abc"), ".jpg");
        assert_eq!(photo_extension("temp-photos.d/abc"), ".jpg");
        assert_eq!(photo_extension("temp-photos/.hidden"), ".jpg");
        assert_eq!(photo_extension_or("temp-photos/abc", ".jpeg"), ".jpeg");
    }

    #[test]
    fn entry_names_are_one_based() {
        assert_eq!(entry_name("checkin", 0, ".jpg"), "checkin-1.jpg");
        assert_eq!(entry_name("crew", 9, ".png"), "crew-10.png");
    }

    #[test]
    fn archive_name_falls_back_to_now() {
        assert_eq!(archive_file_name("checkin", Some("no digits"), 42), "checkin-42.zip");
        assert_eq!(archive_file_name("checkin", Some("1700000000"), 42), "checkin-1700000000.zip");
    }

    #[test]
    fn slugs() {
        assert_eq!(slugify("Denver/CO"), "denver-co");
        assert_eq!(slugify("--Hello,  World!--"), "hello-world");
        assert_eq!(slugify("ÉCOLE 42"), "cole-42");
        assert_eq!(slugify("///"), "");
    }
}
