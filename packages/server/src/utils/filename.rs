use chrono::NaiveDateTime;

/// Reasons an uploaded filename is rejected.
#[derive(Debug, PartialEq, Eq)]
pub enum FilenameError {
    /// Filename is empty, or empty after sanitizing.
    Empty,
    /// Filename has no extension, or its extension is not on the allow list.
    ExtensionNotAllowed,
}

impl FilenameError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Filename cannot be empty",
            Self::ExtensionNotAllowed => "File type is not allowed",
        }
    }
}

/// Strip path components and replace unsafe characters, keeping only
/// alphanumerics, `.`, `-` and `_`. Runs of other characters collapse to a
/// single underscore.
pub fn sanitize(original: &str) -> String {
    // Drop any client-supplied directory part first.
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original)
        .trim();

    let mut out = String::with_capacity(base.len());
    let mut last_was_sub = false;
    for c in base.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
            out.push(c);
            last_was_sub = false;
        } else if !last_was_sub {
            out.push('_');
            last_was_sub = true;
        }
    }

    // A leading dot would make the stored file hidden.
    out.trim_matches(['_', '.']).to_string()
}

/// Lowercase extension of a filename, if any.
pub fn extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Sanitize an uploaded filename and check its extension against the
/// configured allow list.
pub fn validate_upload(original: &str, allowed: &[String]) -> Result<String, FilenameError> {
    let clean = sanitize(original);
    if clean.is_empty() {
        return Err(FilenameError::Empty);
    }
    match extension(&clean) {
        Some(ext) if allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext)) => Ok(clean),
        _ => Err(FilenameError::ExtensionNotAllowed),
    }
}

/// Stored filename for a submission upload, namespaced so concurrent uploads
/// from different students never collide:
/// `{student_id}_{scope}_{YYYYMMDD_HHMMSS}_{sanitized}`.
pub fn stored_name(student_id: i32, scope: &str, at: NaiveDateTime, sanitized: &str) -> String {
    format!(
        "{student_id}_{scope}_{}_{sanitized}",
        at.format("%Y%m%d_%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn allowed() -> Vec<String> {
        ["py", "txt", "zip", "pdf"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitize("../../etc/passwd.txt"), "passwd.txt");
        assert_eq!(sanitize("C:\\Users\\me\\solution.py"), "solution.py");
    }

    #[test]
    fn sanitize_collapses_unsafe_runs() {
        assert_eq!(sanitize("my file (final).py"), "my_file_final_.py");
        assert_eq!(sanitize("résumé.pdf"), "r_sum_.pdf");
    }

    #[test]
    fn sanitize_drops_leading_dots() {
        assert_eq!(sanitize(".hidden.py"), "hidden.py");
    }

    #[test]
    fn validate_upload_enforces_allow_list() {
        assert_eq!(validate_upload("solution.py", &allowed()).unwrap(), "solution.py");
        assert_eq!(
            validate_upload("payload.exe", &allowed()),
            Err(FilenameError::ExtensionNotAllowed)
        );
        assert_eq!(
            validate_upload("noext", &allowed()),
            Err(FilenameError::ExtensionNotAllowed)
        );
        assert_eq!(validate_upload("  ", &allowed()), Err(FilenameError::Empty));
    }

    #[test]
    fn validate_upload_is_case_insensitive_on_extension() {
        assert_eq!(validate_upload("Report.PDF", &allowed()).unwrap(), "Report.PDF");
    }

    #[test]
    fn stored_name_is_namespaced() {
        let at = NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(9, 26, 53)
            .unwrap();
        assert_eq!(
            stored_name(7, "3", at, "solution.py"),
            "7_3_20260314_092653_solution.py"
        );
        assert_eq!(
            stored_name(7, "final", at, "capstone.zip"),
            "7_final_20260314_092653_capstone.zip"
        );
    }
}
